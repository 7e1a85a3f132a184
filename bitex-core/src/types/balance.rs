//! Wallet record

use serde::Serialize;
use std::collections::BTreeMap;

use super::{DecimalString, Timestamp};

/// Available balance per currency.
///
/// Built with [`Wallet::from_balances`], which drops zero balances except for
/// the exchange's reference currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallet {
    /// Currency code -> available balance
    pub balances: BTreeMap<String, DecimalString>,
    /// Timestamp in milliseconds
    pub timestamp: Timestamp,
    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}

impl Wallet {
    /// Keeps an entry if its balance is non-zero or its currency is one of
    /// `reference`. A later entry for the same currency replaces an earlier one.
    pub fn from_balances<I>(balances: I, reference: &[&str], timestamp: Timestamp) -> Self
    where
        I: IntoIterator<Item = (String, DecimalString)>,
    {
        let balances = balances
            .into_iter()
            .filter(|(currency, amount)| {
                !amount.is_zero() || reference.contains(&currency.as_str())
            })
            .collect();
        Self {
            balances,
            timestamp,
            error: None,
        }
    }

    /// Balance for `currency`.
    pub fn get(&self, currency: &str) -> Option<&DecimalString> {
        self.balances.get(currency)
    }
}
