//! # Unified REST Interface
//!
//! [`RestInterface`] is the verb set every exchange facade exposes. A facade maps
//! each verb to its exchange's endpoint and parameters, sends it through an
//! [`ApiClient`](crate::client::ApiClient), and normalizes the answer with the
//! exchange's [`ResponseFormatter`](crate::envelope::ResponseFormatter).
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               RestInterface                  │
//! ├──────────────────────────────────────────────┤
//! │  Public:  ticker, order_book, trades         │
//! │  Private: bid, ask, order_status,            │
//! │           open_orders, cancel_order, wallet  │
//! │  Discovery: supported_pairs                  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Verbs an exchange does not offer keep the default implementation, which
//! fails with [`Error::NotImplemented`] without sending anything.
//!
//! ```rust,no_run
//! use bitex_core::exchange::RestInterface;
//! use bitex_core::pair::Pair;
//!
//! async fn print_last(exchange: &dyn RestInterface) -> bitex_core::Result<()> {
//!     let pair: Pair = "BTC/USD".parse()?;
//!     let ticker = exchange.ticker(&pair).await?;
//!     println!("{}: {:?}", exchange.name(), ticker.last);
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::pair::Pair;
use crate::types::{
    CancelledOrder, DecimalString, OpenOrders, OrderBook, OrderPlacement, OrderStatus, Ticker,
    Trades, Verb, Wallet,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Uniform verbs over one exchange.
#[async_trait]
pub trait RestInterface: Send + Sync {
    /// Exchange name.
    fn name(&self) -> &'static str;

    /// Pair identifiers in the exchange's own spelling.
    async fn supported_pairs(&self) -> Result<BTreeSet<String>>;

    /// Ticker for `pair`.
    async fn ticker(&self, _pair: &Pair) -> Result<Ticker> {
        Err(unsupported(self.name(), Verb::Ticker))
    }

    /// Order book for `pair`, best prices first.
    async fn order_book(&self, _pair: &Pair) -> Result<OrderBook> {
        Err(unsupported(self.name(), Verb::OrderBook))
    }

    /// Recent public trades for `pair`.
    async fn trades(&self, _pair: &Pair) -> Result<Trades> {
        Err(unsupported(self.name(), Verb::Trades))
    }

    /// Places a limit buy order.
    async fn bid(
        &self,
        _pair: &Pair,
        _price: &DecimalString,
        _size: &DecimalString,
    ) -> Result<OrderPlacement> {
        Err(unsupported(self.name(), Verb::Bid))
    }

    /// Places a limit sell order.
    async fn ask(
        &self,
        _pair: &Pair,
        _price: &DecimalString,
        _size: &DecimalString,
    ) -> Result<OrderPlacement> {
        Err(unsupported(self.name(), Verb::Ask))
    }

    /// Status of one order.
    async fn order_status(&self, _order_id: &str) -> Result<OrderStatus> {
        Err(unsupported(self.name(), Verb::OrderStatus))
    }

    /// All resting orders.
    async fn open_orders(&self) -> Result<OpenOrders> {
        Err(unsupported(self.name(), Verb::OpenOrders))
    }

    /// Cancels one order.
    async fn cancel_order(&self, _order_id: &str) -> Result<CancelledOrder> {
        Err(unsupported(self.name(), Verb::CancelOrder))
    }

    /// Available balances.
    async fn wallet(&self) -> Result<Wallet> {
        Err(unsupported(self.name(), Verb::Wallet))
    }
}

fn unsupported(exchange: &str, verb: Verb) -> Error {
    Error::not_implemented(format!("{verb} is not implemented for {exchange}"))
}

/// Owned trait object.
pub type BoxedInterface = Box<dyn RestInterface>;

/// Shared trait object.
pub type ArcInterface = Arc<dyn RestInterface>;
