//! Trading pairs.
//!
//! Callers name pairs as `BASE/QUOTE` (`"BTC/USD"`); each exchange formats them
//! its own way (`btcusd`, `BTC_USD`, `btc`, ...).
//!
//! ```rust
//! use bitex_core::pair::Pair;
//!
//! let pair: Pair = "btc/usd".parse().unwrap();
//! assert_eq!(pair.to_string(), "BTC/USD");
//! assert_eq!(pair.joined_lower(""), "btcusd");
//! assert_eq!(pair.joined_upper("_"), "BTC_USD");
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

const SEPARATORS: [char; 3] = ['/', '-', '_'];

/// A base/quote currency pair, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    /// Base currency
    pub base: String,
    /// Quote currency
    pub quote: String,
}

impl Pair {
    /// Creates a pair; both codes are upper-cased.
    pub fn new(base: impl AsRef<str>, quote: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim().to_ascii_uppercase(),
            quote: quote.as_ref().trim().to_ascii_uppercase(),
        }
    }

    /// `base{sep}quote`, lower-case.
    pub fn joined_lower(&self, sep: &str) -> String {
        format!("{}{sep}{}", self.base, self.quote).to_ascii_lowercase()
    }

    /// `BASE{sep}QUOTE`, upper-case.
    pub fn joined_upper(&self, sep: &str) -> String {
        format!("{}{sep}{}", self.base, self.quote)
    }
}

impl FromStr for Pair {
    type Err = Error;

    /// Accepts `BASE/QUOTE`, `BASE-QUOTE` and `BASE_QUOTE`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(SEPARATORS);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None)
                if !base.trim().is_empty() && !quote.trim().is_empty() =>
            {
                Ok(Self::new(base, quote))
            }
            _ => Err(Error::invalid_request(format!(
                "invalid pair '{s}', expected BASE/QUOTE"
            ))),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
