//! Order records: placements, status, cancellations and open orders.

use serde::Serialize;
use std::fmt;

use super::{DecimalString, Timestamp};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderSide {
    /// Lowercase name as most exchanges spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Limit order
    #[default]
    Limit,
    /// Market order
    Market,
}

/// A newly placed order, as returned by `bid` and `ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPlacement {
    /// Exchange order ID
    pub order_id: String,
    /// Limit price
    pub price: Option<DecimalString>,
    /// Order size
    pub size: Option<DecimalString>,
    /// Side
    pub side: OrderSide,
    /// Type
    pub order_type: OrderType,
    /// Timestamp in milliseconds
    pub timestamp: Timestamp,
    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}

/// Status of one order.
///
/// `state` keeps the exchange's wording (`"Open"`, `"Finished"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatus {
    /// Exchange order ID
    pub order_id: String,
    /// Price
    pub price: Option<DecimalString>,
    /// Size
    pub size: Option<DecimalString>,
    /// Side, if reported
    pub side: Option<OrderSide>,
    /// Type, if reported
    pub order_type: Option<OrderType>,
    /// Exchange-specific state
    pub state: String,
    /// Timestamp in milliseconds
    pub timestamp: Timestamp,
    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}

/// Result of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelledOrder {
    /// Exchange order ID
    pub order_id: String,
    /// Whether the exchange confirmed the cancellation
    pub successful: bool,
    /// Timestamp in milliseconds
    pub timestamp: Timestamp,
    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}

/// One resting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenOrder {
    /// Exchange order ID
    pub order_id: String,
    /// Pair, where reported
    pub pair: Option<String>,
    /// Price
    pub price: DecimalString,
    /// Remaining size
    pub size: DecimalString,
    /// Side
    pub side: OrderSide,
    /// Creation time in milliseconds
    pub timestamp: Timestamp,
}

/// All resting orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenOrders {
    /// Orders
    pub orders: Vec<OpenOrder>,
    /// Timestamp in milliseconds
    pub timestamp: Timestamp,
    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}
