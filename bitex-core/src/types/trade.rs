//! Public trade records

use serde::Serialize;

use super::{DecimalString, Timestamp};

/// One public trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    /// Trade ID as reported by the exchange
    pub id: String,

    /// Execution price
    pub price: DecimalString,

    /// Executed quantity
    pub qty: DecimalString,

    /// Execution time in milliseconds
    pub time: Timestamp,

    /// Whether the buyer was the maker
    #[serde(rename = "isBuyerMaker")]
    pub is_buyer_maker: bool,

    /// Whether the trade was the best price match, where reported
    #[serde(rename = "isBestMatch")]
    pub is_best_match: Option<bool>,
}

/// Recent trades, in the exchange's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trades {
    /// Trades
    pub trades: Vec<Trade>,

    /// Timestamp in milliseconds
    pub timestamp: Timestamp,

    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}

impl Trades {
    /// Create a trade list
    pub fn new(trades: Vec<Trade>, timestamp: Timestamp) -> Self {
        Self {
            trades,
            timestamp,
            error: None,
        }
    }
}
