//! Canonical records
//!
//! One record shape per facade verb. Every price, size and balance is a
//! [`DecimalString`], so values are relayed exactly as the exchange sent them.

pub mod balance;
pub mod decimal;
pub mod order;
pub mod orderbook;
pub mod ticker;
pub mod trade;

pub use balance::Wallet;
pub use decimal::DecimalString;
pub use order::{
    CancelledOrder, OpenOrder, OpenOrders, OrderPlacement, OrderSide, OrderStatus, OrderType,
};
pub use orderbook::{OrderBook, PriceLevel};
pub use ticker::Ticker;
pub use trade::{Trade, Trades};

use serde::Serialize;
use std::fmt;

/// Type alias for timestamps (milliseconds since Unix epoch)
pub type Timestamp = i64;

/// The logical call that produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Ticker
    Ticker,
    /// Order book
    OrderBook,
    /// Recent trades
    Trades,
    /// Buy order placement
    Bid,
    /// Sell order placement
    Ask,
    /// Order status
    OrderStatus,
    /// Cancellation
    CancelOrder,
    /// Open orders
    OpenOrders,
    /// Wallet balances
    Wallet,
}

impl Verb {
    /// Every verb.
    pub const ALL: [Verb; 9] = [
        Verb::Ticker,
        Verb::OrderBook,
        Verb::Trades,
        Verb::Bid,
        Verb::Ask,
        Verb::OrderStatus,
        Verb::CancelOrder,
        Verb::OpenOrders,
        Verb::Wallet,
    ];

    /// snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Ticker => "ticker",
            Verb::OrderBook => "order_book",
            Verb::Trades => "trades",
            Verb::Bid => "bid",
            Verb::Ask => "ask",
            Verb::OrderStatus => "order_status",
            Verb::CancelOrder => "cancel_order",
            Verb::OpenOrders => "open_orders",
            Verb::Wallet => "wallet",
        }
    }

    /// Whether the verb needs an authenticated request.
    pub fn is_private(&self) -> bool {
        !matches!(self, Verb::Ticker | Verb::OrderBook | Verb::Trades)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalRecord {
    /// Ticker
    Ticker(Ticker),
    /// Order book
    OrderBook(OrderBook),
    /// Trades
    Trades(Trades),
    /// Result of `bid`
    Bid(OrderPlacement),
    /// Result of `ask`
    Ask(OrderPlacement),
    /// Order status
    OrderStatus(OrderStatus),
    /// Cancellation
    CancelOrder(CancelledOrder),
    /// Open orders
    OpenOrders(OpenOrders),
    /// Wallet
    Wallet(Wallet),
}

impl CanonicalRecord {
    /// The verb this record answers.
    pub fn verb(&self) -> Verb {
        match self {
            Self::Ticker(_) => Verb::Ticker,
            Self::OrderBook(_) => Verb::OrderBook,
            Self::Trades(_) => Verb::Trades,
            Self::Bid(_) => Verb::Bid,
            Self::Ask(_) => Verb::Ask,
            Self::OrderStatus(_) => Verb::OrderStatus,
            Self::CancelOrder(_) => Verb::CancelOrder,
            Self::OpenOrders(_) => Verb::OpenOrders,
            Self::Wallet(_) => Verb::Wallet,
        }
    }

    /// Record timestamp in milliseconds.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Ticker(r) => r.timestamp,
            Self::OrderBook(r) => r.timestamp,
            Self::Trades(r) => r.timestamp,
            Self::Bid(r) | Self::Ask(r) => r.timestamp,
            Self::OrderStatus(r) => r.timestamp,
            Self::CancelOrder(r) => r.timestamp,
            Self::OpenOrders(r) => r.timestamp,
            Self::Wallet(r) => r.timestamp,
        }
    }
}
