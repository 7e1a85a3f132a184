//! Gate.io response formatter.

use bitex_core::envelope::{ResponseEnvelope, ResponseFormatter};
use bitex_core::parser_utils::{
    levels_from_pairs, optional_decimal, require_field, to_decimal_string, value_text,
};
use bitex_core::types::{OrderBook, Ticker, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;

const REFERENCE_CURRENCIES: &[&str] = &["BTC", "USD"];

/// Normalizes Gate.io responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateioFormatter;

/// `{"result": "false", "message": ..}` marks a failed call; `result` may be a
/// string or a bool.
fn body_error(data: &Value) -> Option<String> {
    let failed = match data.get("result") {
        Some(Value::Bool(ok)) => !ok,
        Some(Value::String(ok)) => ok == "false",
        _ => false,
    };
    failed.then(|| {
        data.get("message")
            .and_then(value_text)
            .unwrap_or_else(|| "request failed".to_string())
    })
}

impl ResponseFormatter for GateioFormatter {
    fn exchange(&self) -> &'static str {
        "Gate.io"
    }

    fn ticker(&self, envelope: &ResponseEnvelope) -> Result<Ticker> {
        let data = envelope.json()?;
        let mut ticker = Ticker::new(envelope.received_at());
        ticker.error = body_error(data);
        if ticker.error.is_none() {
            ticker.bid = optional_decimal(data, "highestBid")?;
            ticker.ask = optional_decimal(data, "lowestAsk")?;
            ticker.high = optional_decimal(data, "high24hr")?;
            ticker.low = optional_decimal(data, "low24hr")?;
            ticker.last = optional_decimal(data, "last")?;
            ticker.volume = optional_decimal(data, "quoteVolume")?;
        }
        Ok(ticker)
    }

    /// Asks arrive worst-first; [`OrderBook::new`] puts them best-first.
    fn order_book(&self, envelope: &ResponseEnvelope) -> Result<OrderBook> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut book = OrderBook::new(Vec::new(), Vec::new(), envelope.received_at());
            book.error = Some(error);
            return Ok(book);
        }
        let bids = levels_from_pairs(require_field(data, "bids")?, "bids")?;
        let asks = levels_from_pairs(require_field(data, "asks")?, "asks")?;
        Ok(OrderBook::new(bids, asks, envelope.received_at()))
    }

    fn wallet(&self, envelope: &ResponseEnvelope) -> Result<Wallet> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut wallet = Wallet::from_balances([], &[], envelope.received_at());
            wallet.error = Some(error);
            return Ok(wallet);
        }
        // An empty account reports `available` as an empty list.
        let balances = match require_field(data, "available")? {
            Value::Object(available) => available
                .iter()
                .map(|(currency, amount)| {
                    Ok((currency.to_uppercase(), to_decimal_string(amount, currency)?))
                })
                .collect::<Result<Vec<_>>>()?,
            Value::Array(empty) if empty.is_empty() => Vec::new(),
            _ => {
                return Err(ParseError::invalid_value("available", "expected an object").into());
            }
        };
        Ok(Wallet::from_balances(
            balances,
            REFERENCE_CURRENCIES,
            envelope.received_at(),
        ))
    }
}
