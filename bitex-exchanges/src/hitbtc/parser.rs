//! HitBTC response formatter.
//!
//! Accepts both API generations for order books: v1 sends `asks`/`bids` as
//! `[price, size]` pairs, v2 sends `ask`/`bid` as `{price, size}` objects.
//! Errors come back as `{"error": {"code", "message"}}`.

use bitex_core::envelope::{ResponseEnvelope, ResponseFormatter};
use bitex_core::parser_utils::{
    levels_from_objects, levels_from_pairs, optional_decimal, require_decimal, require_field,
    require_id, require_str, value_text,
};
use bitex_core::time::parse_iso8601;
use bitex_core::types::{OrderBook, Ticker, Trade, Trades, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;

const REFERENCE_CURRENCIES: &[&str] = &["BTC"];

/// Normalizes HitBTC responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitBtcFormatter;

fn body_error(data: &Value) -> Option<String> {
    let error = data.as_object()?.get("error")?;
    Some(
        error
            .get("message")
            .and_then(value_text)
            .unwrap_or_else(|| error.to_string()),
    )
}

fn as_array<'a>(data: &'a Value, what: &'static str) -> Result<&'a Vec<Value>> {
    data.as_array()
        .ok_or_else(|| ParseError::invalid_value(what, "expected an array").into())
}

impl ResponseFormatter for HitBtcFormatter {
    fn exchange(&self) -> &'static str {
        "HitBTC"
    }

    fn ticker(&self, envelope: &ResponseEnvelope) -> Result<Ticker> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut ticker = Ticker::new(envelope.received_at());
            ticker.error = Some(error);
            return Ok(ticker);
        }
        let timestamp = match data.get("timestamp").and_then(Value::as_str) {
            Some(text) => parse_iso8601(text)?,
            None => envelope.received_at(),
        };
        let mut ticker = Ticker::new(timestamp);
        ticker.bid = optional_decimal(data, "bid")?;
        ticker.ask = optional_decimal(data, "ask")?;
        ticker.high = optional_decimal(data, "high")?;
        ticker.low = optional_decimal(data, "low")?;
        ticker.last = optional_decimal(data, "last")?;
        ticker.volume = optional_decimal(data, "volume")?;
        Ok(ticker)
    }

    fn order_book(&self, envelope: &ResponseEnvelope) -> Result<OrderBook> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut book = OrderBook::new(Vec::new(), Vec::new(), envelope.received_at());
            book.error = Some(error);
            return Ok(book);
        }
        let (bids, asks) = if data.get("asks").is_some() {
            (
                levels_from_pairs(require_field(data, "bids")?, "bids")?,
                levels_from_pairs(require_field(data, "asks")?, "asks")?,
            )
        } else {
            (
                levels_from_objects(require_field(data, "bid")?, "bid", "price", "size")?,
                levels_from_objects(require_field(data, "ask")?, "ask", "price", "size")?,
            )
        };
        Ok(OrderBook::new(bids, asks, envelope.received_at()))
    }

    fn trades(&self, envelope: &ResponseEnvelope) -> Result<Trades> {
        let data = envelope.json()?;
        let mut trades = Trades::new(Vec::new(), envelope.received_at());
        if let Some(error) = body_error(data) {
            trades.error = Some(error);
            return Ok(trades);
        }
        trades.trades = as_array(data, "trades")?
            .iter()
            .map(|trade| -> Result<Trade> {
                Ok(Trade {
                    id: require_id(trade, "id")?,
                    price: require_decimal(trade, "price")?,
                    qty: require_decimal(trade, "quantity")?,
                    time: parse_iso8601(require_str(trade, "timestamp")?)?,
                    is_buyer_maker: require_str(trade, "side")? == "buy",
                    is_best_match: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(trades)
    }

    fn wallet(&self, envelope: &ResponseEnvelope) -> Result<Wallet> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut wallet = Wallet::from_balances([], &[], envelope.received_at());
            wallet.error = Some(error);
            return Ok(wallet);
        }
        let balances = as_array(data, "balance")?
            .iter()
            .map(|entry| {
                Ok((
                    require_str(entry, "currency")?.to_string(),
                    require_decimal(entry, "available")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Wallet::from_balances(
            balances,
            REFERENCE_CURRENCIES,
            envelope.received_at(),
        ))
    }
}
