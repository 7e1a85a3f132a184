//! Cryptopia response formatter.
//!
//! Payloads sit under `Data`; a `Success: false` body carries its reason in
//! `Message`. Cryptopia does not timestamp market data, so records use the
//! envelope's receive time.

use bitex_core::envelope::{ResponseEnvelope, ResponseFormatter};
use bitex_core::parser_utils::{
    levels_from_objects, optional_decimal, parse_timestamp, require_array, require_decimal,
    require_field, require_str, value_text,
};
use bitex_core::time::seconds_to_ms;
use bitex_core::types::{OrderBook, Ticker, Trade, Trades, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;

const REFERENCE_CURRENCIES: &[&str] = &["BTC"];

/// Normalizes Cryptopia responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptopiaFormatter;

fn body_error(data: &Value) -> Option<String> {
    if data.get("Success").and_then(Value::as_bool) != Some(false) {
        return None;
    }
    Some(
        data.get("Message")
            .and_then(value_text)
            .unwrap_or_else(|| "request was not successful".to_string()),
    )
}

impl ResponseFormatter for CryptopiaFormatter {
    fn exchange(&self) -> &'static str {
        "Cryptopia"
    }

    fn ticker(&self, envelope: &ResponseEnvelope) -> Result<Ticker> {
        let body = envelope.json()?;
        let mut ticker = Ticker::new(envelope.received_at());
        if let Some(error) = body_error(body) {
            ticker.error = Some(error);
            return Ok(ticker);
        }
        let data = require_field(body, "Data")?;
        ticker.bid = optional_decimal(data, "BidPrice")?;
        ticker.ask = optional_decimal(data, "AskPrice")?;
        ticker.high = optional_decimal(data, "High")?;
        ticker.low = optional_decimal(data, "Low")?;
        ticker.last = optional_decimal(data, "LastPrice")?;
        ticker.volume = optional_decimal(data, "Volume")?;
        Ok(ticker)
    }

    fn order_book(&self, envelope: &ResponseEnvelope) -> Result<OrderBook> {
        let body = envelope.json()?;
        if let Some(error) = body_error(body) {
            let mut book = OrderBook::new(Vec::new(), Vec::new(), envelope.received_at());
            book.error = Some(error);
            return Ok(book);
        }
        let data = require_field(body, "Data")?;
        let bids = levels_from_objects(require_field(data, "Buy")?, "Buy", "Price", "Volume")?;
        let asks = levels_from_objects(require_field(data, "Sell")?, "Sell", "Price", "Volume")?;
        Ok(OrderBook::new(bids, asks, envelope.received_at()))
    }

    fn trades(&self, envelope: &ResponseEnvelope) -> Result<Trades> {
        let body = envelope.json()?;
        let mut trades = Trades::new(Vec::new(), envelope.received_at());
        if let Some(error) = body_error(body) {
            trades.error = Some(error);
            return Ok(trades);
        }
        // Trades carry no id; the timestamp stands in for one.
        trades.trades = require_array(body, "Data")?
            .iter()
            .map(|trade| -> Result<Trade> {
                let time = parse_timestamp(trade, "Timestamp")
                    .ok_or_else(|| ParseError::timestamp("Timestamp is not an integer"))?;
                Ok(Trade {
                    id: time.to_string(),
                    price: require_decimal(trade, "Price")?,
                    qty: require_decimal(trade, "Amount")?,
                    time: seconds_to_ms(time),
                    is_buyer_maker: require_str(trade, "Type")? == "Buy",
                    is_best_match: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(trades)
    }

    fn wallet(&self, envelope: &ResponseEnvelope) -> Result<Wallet> {
        let body = envelope.json()?;
        if let Some(error) = body_error(body) {
            let mut wallet = Wallet::from_balances([], &[], envelope.received_at());
            wallet.error = Some(error);
            return Ok(wallet);
        }
        let balances = require_array(body, "Data")?
            .iter()
            .map(|entry| {
                Ok((
                    require_str(entry, "Symbol")?.to_string(),
                    require_decimal(entry, "Available")?,
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
