//! Coinone response formatter.
//!
//! Coinone's ticker carries no bid or ask; those fields stay `None`.

use bitex_core::envelope::{ResponseEnvelope, ResponseFormatter};
use bitex_core::parser_utils::{
    levels_from_objects, optional_decimal, parse_timestamp, require_array, require_decimal,
    require_field, value_text,
};
use bitex_core::time::seconds_to_ms;
use bitex_core::types::{OrderBook, Ticker, Timestamp, Trade, Trades, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;

/// Normalizes Coinone responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinoneFormatter;

fn body_error(data: &Value) -> Option<String> {
    if data.get("result").and_then(Value::as_str) != Some("error") {
        return None;
    }
    let code = data
        .get("errorCode")
        .and_then(value_text)
        .unwrap_or_else(|| "unknown".to_string());
    Some(format!("Coinone error code {code}"))
}

fn timestamp(data: &Value, fallback: Timestamp) -> Timestamp {
    parse_timestamp(data, "timestamp").map_or(fallback, seconds_to_ms)
}

impl ResponseFormatter for CoinoneFormatter {
    fn exchange(&self) -> &'static str {
        "Coinone"
    }

    fn ticker(&self, envelope: &ResponseEnvelope) -> Result<Ticker> {
        let data = envelope.json()?;
        let mut ticker = Ticker::new(timestamp(data, envelope.received_at()));
        ticker.error = body_error(data);
        if ticker.error.is_none() {
            ticker.high = optional_decimal(data, "high")?;
            ticker.low = optional_decimal(data, "low")?;
            ticker.last = optional_decimal(data, "last")?;
            ticker.volume = optional_decimal(data, "volume")?;
        }
        Ok(ticker)
    }

    fn order_book(&self, envelope: &ResponseEnvelope) -> Result<OrderBook> {
        let data = envelope.json()?;
        let ts = timestamp(data, envelope.received_at());
        if let Some(error) = body_error(data) {
            let mut book = OrderBook::new(Vec::new(), Vec::new(), ts);
            book.error = Some(error);
            return Ok(book);
        }
        let bids = levels_from_objects(require_field(data, "bid")?, "bid", "price", "qty")?;
        let asks = levels_from_objects(require_field(data, "ask")?, "ask", "price", "qty")?;
        Ok(OrderBook::new(bids, asks, ts))
    }

    fn trades(&self, envelope: &ResponseEnvelope) -> Result<Trades> {
        let data = envelope.json()?;
        let mut trades = Trades::new(Vec::new(), timestamp(data, envelope.received_at()));
        if let Some(error) = body_error(data) {
            trades.error = Some(error);
            return Ok(trades);
        }
        trades.trades = require_array(data, "completeOrders")?
            .iter()
            .map(|trade| -> Result<Trade> {
                let time = parse_timestamp(trade, "timestamp")
                    .ok_or_else(|| ParseError::timestamp("timestamp is not an integer"))?;
                Ok(Trade {
                    id: trade
                        .get("id")
                        .and_then(value_text)
                        .unwrap_or_else(|| time.to_string()),
                    price: require_decimal(trade, "price")?,
                    qty: require_decimal(trade, "qty")?,
                    time: seconds_to_ms(time),
                    is_buyer_maker: trade.get("is_ask").and_then(value_text).as_deref()
                        == Some("1"),
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
        let fields = data
            .as_object()
            .ok_or_else(|| ParseError::invalid_value("balance", "expected an object"))?;
        let balances = fields
            .iter()
            .filter(|(_, entry)| entry.get("avail").is_some())
            .map(|(currency, entry)| {
                Ok((currency.to_uppercase(), require_decimal(entry, "avail")?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Wallet::from_balances(balances, &["BTC"], envelope.received_at()))
    }
}
