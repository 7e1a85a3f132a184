//! Exact decimal strings.
//!
//! Exchanges send prices and sizes either as JSON strings or as JSON numbers.
//! Both are kept verbatim: `"0.1"` stays `"0.1"` and never round-trips through
//! `f64`. Comparison and arithmetic go through [`Decimal`].
//!
//! ```rust
//! use bitex_core::types::DecimalString;
//!
//! let price = DecimalString::parse("0.10").unwrap();
//! assert_eq!(price.as_str(), "0.10");
//! assert!(price.cmp_value(&DecimalString::parse("0.1").unwrap()).is_eq());
//! ```

use crate::error::{ParseError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A validated decimal number kept as the exact text the exchange sent.
///
/// Equality compares text, so `"1.0"` and `"1"` are different values.
/// Use [`cmp_value`](Self::cmp_value) for numeric ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecimalString {
    text: String,
    value: Decimal,
}

impl DecimalString {
    /// Validates `text` as a decimal number.
    ///
    /// Scientific notation (`"1e-5"`) is accepted and kept as written.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let trimmed = text.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| ParseError::invalid_value(format!("decimal '{text}'"), e.to_string()))?;
        Ok(Self {
            text: trimmed.to_string(),
            value,
        })
    }

    /// Zero, written as `"0"`.
    pub fn zero() -> Self {
        Self {
            text: "0".to_string(),
            value: Decimal::ZERO,
        }
    }

    /// Text as received.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Numeric value.
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Whether the value is numerically zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Numeric comparison, ignoring how the numbers were written.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for DecimalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for DecimalString {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Decimal> for DecimalString {
    fn from(value: Decimal) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }
}

impl PartialEq<&str> for DecimalString {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl Serialize for DecimalString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for DecimalString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_text_is_kept_verbatim() {
        let d = DecimalString::parse("0.10000000").unwrap();
        assert_eq!(d.as_str(), "0.10000000");
        assert_eq!(d.as_decimal(), dec!(0.1));
    }

    #[test]
    fn test_scientific_notation() {
        let d = DecimalString::parse("1e-5").unwrap();
        assert_eq!(d.as_str(), "1e-5");
        assert_eq!(d.as_decimal(), dec!(0.00001));
    }

    #[test]
    fn test_invalid() {
        assert!(DecimalString::parse("abc").is_err());
        assert!(DecimalString::parse("").is_err());
    }

    #[test]
    fn test_equality_is_textual_ordering_is_numeric() {
        let a = DecimalString::parse("1.0").unwrap();
        let b = DecimalString::parse("1").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.cmp_value(&b), Ordering::Equal);
        assert!(DecimalString::zero().is_zero());
    }

    #[test]
    fn test_serde_as_string() {
        let d = DecimalString::parse("6500.00").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""6500.00""#);
        let back: DecimalString = serde_json::from_str(r#""6500.00""#).unwrap();
        assert_eq!(back, d);
    }

    proptest! {
        #[test]
        fn prop_decimal_text_survives(int in 0u64..1_000_000_000, frac in 0u32..100_000_000) {
            let text = format!("{int}.{frac:08}");
            let d = DecimalString::parse(text.clone()).unwrap();
            prop_assert_eq!(d.as_str(), text.as_str());
            prop_assert_eq!(d.to_string(), text);
        }
    }
}
