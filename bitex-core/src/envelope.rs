//! Response envelopes and the per-exchange formatter capability.
//!
//! A [`ResponseEnvelope`] wraps one [`RawResponse`] with the verb and call
//! arguments that produced it. Its canonical record is computed by the
//! exchange's [`ResponseFormatter`] on first access and cached for the
//! lifetime of the envelope.
//!
//! Decoding rules:
//! - a non-2xx status fails with [`Error::PublicDataFetch`] before any parsing
//! - the body is decoded with exact numbers; if that fails and the exchange has a
//!   [`RepairFn`], the repaired bytes are decoded instead
//! - a body that still does not decode fails with [`Error::MalformedResponse`]

use crate::error::{Error, Result};
use crate::http_client::RawResponse;
use crate::request::Params;
use crate::types::{
    CancelledOrder, CanonicalRecord, OpenOrders, OrderBook, OrderPlacement, OrderStatus, Ticker,
    Timestamp, Trades, Verb, Wallet,
};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Pre-parse repair hook. Returns `None` when it has nothing to fix.
pub type RepairFn = fn(&[u8]) -> Option<Vec<u8>>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strips a leading UTF-8 byte-order mark.
pub fn strip_utf8_bom(body: &[u8]) -> Option<Vec<u8>> {
    body.strip_prefix(UTF8_BOM).map(<[u8]>::to_vec)
}

/// Exchange-specific normalization of decoded responses.
///
/// Every verb defaults to [`Error::NotImplemented`]; an exchange overrides the
/// verbs it supports. Implementations only run on successful responses.
pub trait ResponseFormatter: Send + Sync + fmt::Debug {
    /// Exchange name, for error messages.
    fn exchange(&self) -> &'static str;

    /// Error for a verb this exchange does not offer.
    fn unsupported(&self, verb: Verb) -> Error {
        Error::not_implemented(format!("{verb} is not implemented for {}", self.exchange()))
    }

    /// Ticker
    fn ticker(&self, _envelope: &ResponseEnvelope) -> Result<Ticker> {
        Err(self.unsupported(Verb::Ticker))
    }

    /// Order book
    fn order_book(&self, _envelope: &ResponseEnvelope) -> Result<OrderBook> {
        Err(self.unsupported(Verb::OrderBook))
    }

    /// Recent trades
    fn trades(&self, _envelope: &ResponseEnvelope) -> Result<Trades> {
        Err(self.unsupported(Verb::Trades))
    }

    /// Buy order placement
    fn bid(&self, _envelope: &ResponseEnvelope) -> Result<OrderPlacement> {
        Err(self.unsupported(Verb::Bid))
    }

    /// Sell order placement
    fn ask(&self, _envelope: &ResponseEnvelope) -> Result<OrderPlacement> {
        Err(self.unsupported(Verb::Ask))
    }

    /// Order status
    fn order_status(&self, _envelope: &ResponseEnvelope) -> Result<OrderStatus> {
        Err(self.unsupported(Verb::OrderStatus))
    }

    /// Cancellation
    fn cancel_order(&self, _envelope: &ResponseEnvelope) -> Result<CancelledOrder> {
        Err(self.unsupported(Verb::CancelOrder))
    }

    /// Open orders
    fn open_orders(&self, _envelope: &ResponseEnvelope) -> Result<OpenOrders> {
        Err(self.unsupported(Verb::OpenOrders))
    }

    /// Wallet
    fn wallet(&self, _envelope: &ResponseEnvelope) -> Result<Wallet> {
        Err(self.unsupported(Verb::Wallet))
    }
}

/// One response, its origin, and its lazily computed canonical record.
pub struct ResponseEnvelope {
    verb: Verb,
    args: Params,
    response: RawResponse,
    formatter: Arc<dyn ResponseFormatter>,
    repair: Option<RepairFn>,
    received_at: Timestamp,
    json: OnceLock<Value>,
    record: OnceLock<CanonicalRecord>,
}

impl ResponseEnvelope {
    /// Wraps `response`, stamping it with the current time.
    pub fn new(
        verb: Verb,
        args: Params,
        response: RawResponse,
        formatter: Arc<dyn ResponseFormatter>,
    ) -> Self {
        Self {
            verb,
            args,
            response,
            formatter,
            repair: None,
            received_at: crate::time::milliseconds(),
            json: OnceLock::new(),
            record: OnceLock::new(),
        }
    }

    /// Sets the pre-parse repair hook.
    #[must_use]
    pub fn with_repair(mut self, repair: Option<RepairFn>) -> Self {
        self.repair = repair;
        self
    }

    /// Overrides the receive time.
    #[must_use]
    pub fn with_received_at(mut self, received_at: Timestamp) -> Self {
        self.received_at = received_at;
        self
    }

    /// The verb that produced this response.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Arguments of the originating call.
    pub fn args(&self) -> &Params {
        &self.args
    }

    /// Raw response.
    pub fn raw(&self) -> &RawResponse {
        &self.response
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.response.status
    }

    /// Whether the HTTP status is 2xx.
    pub fn is_success(&self) -> bool {
        self.response.is_success()
    }

    /// Receive time in milliseconds.
    pub fn received_at(&self) -> Timestamp {
        self.received_at
    }

    /// Fails with [`Error::PublicDataFetch`] on a non-2xx status.
    pub fn ensure_success(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::public_data_fetch(
                self.response.status,
                self.response.reason.clone(),
            ))
        }
    }

    /// Decoded body, with numbers kept exact. Decoded once.
    pub fn json(&self) -> Result<&Value> {
        if let Some(value) = self.json.get() {
            return Ok(value);
        }
        let value = self.decode()?;
        Ok(self.json.get_or_init(|| value))
    }

    fn decode(&self) -> Result<Value> {
        let body = &self.response.body;
        let err = match serde_json::from_slice::<Value>(body) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if let Some(repaired) = self.repair.and_then(|repair| repair(body)) {
            debug!(verb = %self.verb, "Applying response repair before decoding");
            return serde_json::from_slice::<Value>(&repaired)
                .map_err(|e| Error::malformed_response(e.to_string(), body));
        }
        Err(Error::malformed_response(err.to_string(), body))
    }

    /// The canonical record for this envelope's verb.
    ///
    /// Computed on first call; later calls return the cached record.
    pub fn formatted(&self) -> Result<&CanonicalRecord> {
        if let Some(record) = self.record.get() {
            return Ok(record);
        }
        self.ensure_success()?;
        let formatter = self.formatter.as_ref();
        let record = match self.verb {
            Verb::Ticker => CanonicalRecord::Ticker(formatter.ticker(self)?),
            Verb::OrderBook => CanonicalRecord::OrderBook(formatter.order_book(self)?),
            Verb::Trades => CanonicalRecord::Trades(formatter.trades(self)?),
            Verb::Bid => CanonicalRecord::Bid(formatter.bid(self)?),
            Verb::Ask => CanonicalRecord::Ask(formatter.ask(self)?),
            Verb::OrderStatus => CanonicalRecord::OrderStatus(formatter.order_status(self)?),
            Verb::CancelOrder => CanonicalRecord::CancelOrder(formatter.cancel_order(self)?),
            Verb::OpenOrders => CanonicalRecord::OpenOrders(formatter.open_orders(self)?),
            Verb::Wallet => CanonicalRecord::Wallet(formatter.wallet(self)?),
        };
        Ok(self.record.get_or_init(|| record))
    }

    fn mismatch(&self, wanted: Verb) -> Error {
        Error::invalid_request(format!(
            "envelope holds a {} response, not {wanted}",
            self.verb
        ))
    }
}

macro_rules! record_accessor {
    ($(#[$doc:meta] $name:ident => $variant:ident : $ty:ty),+ $(,)?) => {
        impl ResponseEnvelope {
            $(
                #[$doc]
                pub fn $name(&self) -> Result<$ty> {
                    match self.formatted()? {
                        CanonicalRecord::$variant(record) => Ok(record.clone()),
                        _ => Err(self.mismatch(Verb::$variant)),
                    }
                }
            )+
        }
    };
}

record_accessor! {
    /// Ticker record.
    ticker => Ticker: Ticker,
    /// Order book record.
    order_book => OrderBook: OrderBook,
    /// Trades record.
    trades => Trades: Trades,
    /// Result of a `bid` call.
    bid => Bid: OrderPlacement,
    /// Result of an `ask` call.
    ask => Ask: OrderPlacement,
    /// Order status record.
    order_status => OrderStatus: OrderStatus,
    /// Cancellation record.
    cancel_order => CancelOrder: CancelledOrder,
    /// Open orders record.
    open_orders => OpenOrders: OpenOrders,
    /// Wallet record.
    wallet => Wallet: Wallet,
}

impl fmt::Debug for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseEnvelope")
            .field("exchange", &self.formatter.exchange())
            .field("verb", &self.verb)
            .field("status", &self.response.status)
            .field("received_at", &self.received_at)
            .field("formatted", &self.record.get().is_some())
            .finish_non_exhaustive()
    }
}
