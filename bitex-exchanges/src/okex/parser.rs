//! OKEx response formatter.

use bitex_core::envelope::{ResponseEnvelope, ResponseFormatter};
use bitex_core::parser_utils::{
    levels_from_pairs, optional_decimal, parse_timestamp, require_field, require_id,
    to_decimal_string, value_text,
};
use bitex_core::time::seconds_to_ms;
use bitex_core::types::{OrderBook, Ticker, Trade, Trades, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;

const REFERENCE_CURRENCIES: &[&str] = &["BTC", "ETH", "LTC"];

/// Normalizes OKEx v1 responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct OkexFormatter;

/// `error_code` of a failed call, reported with HTTP 200.
fn body_error(data: &Value) -> Option<String> {
    data.get("error_code")
        .and_then(value_text)
        .map(|code| format!("OKEx error code {code}"))
}

impl ResponseFormatter for OkexFormatter {
    fn exchange(&self) -> &'static str {
        "OKEx"
    }

    fn ticker(&self, envelope: &ResponseEnvelope) -> Result<Ticker> {
        let data = envelope.json()?;
        let timestamp = parse_timestamp(data, "date")
            .map(seconds_to_ms)
            .unwrap_or_else(|| envelope.received_at());
        let mut ticker = Ticker::new(timestamp);
        if let Some(error) = body_error(data) {
            ticker.error = Some(error);
            return Ok(ticker);
        }

        let fields = require_field(data, "ticker")?;
        ticker.bid = optional_decimal(fields, "buy")?;
        ticker.ask = optional_decimal(fields, "sell")?;
        ticker.high = optional_decimal(fields, "high")?;
        ticker.low = optional_decimal(fields, "low")?;
        ticker.last = optional_decimal(fields, "last")?;
        ticker.volume = optional_decimal(fields, "vol")?;
        Ok(ticker)
    }

    fn order_book(&self, envelope: &ResponseEnvelope) -> Result<OrderBook> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut book = OrderBook::new(Vec::new(), Vec::new(), envelope.received_at());
            book.error = Some(error);
            return Ok(book);
        }
        // Asks arrive highest first; OrderBook::new reorders them.
        let bids = levels_from_pairs(require_field(data, "bids")?, "bids")?;
        let asks = levels_from_pairs(require_field(data, "asks")?, "asks")?;
        Ok(OrderBook::new(bids, asks, envelope.received_at()))
    }

    fn trades(&self, envelope: &ResponseEnvelope) -> Result<Trades> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut trades = Trades::new(Vec::new(), envelope.received_at());
            trades.error = Some(error);
            return Ok(trades);
        }
        let entries = data
            .as_array()
            .ok_or_else(|| ParseError::invalid_value("trades", "expected an array"))?;

        let trades = entries
            .iter()
            .map(|trade| -> Result<Trade> {
                Ok(Trade {
                    id: require_id(trade, "tid")?,
                    price: to_decimal_string(require_field(trade, "price")?, "price")?,
                    qty: to_decimal_string(require_field(trade, "amount")?, "amount")?,
                    time: parse_timestamp(trade, "date_ms")
                        .ok_or_else(|| ParseError::timestamp("date_ms is not an integer"))?,
                    is_buyer_maker: trade.get("type").and_then(Value::as_str) == Some("buy"),
                    is_best_match: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Trades::new(trades, envelope.received_at()))
    }

    fn wallet(&self, envelope: &ResponseEnvelope) -> Result<Wallet> {
        let data = envelope.json()?;
        if let Some(error) = body_error(data) {
            let mut wallet = Wallet::from_balances([], &[], envelope.received_at());
            wallet.error = Some(error);
            return Ok(wallet);
        }

        let free = require_field(require_field(require_field(data, "info")?, "funds")?, "free")?
            .as_object()
            .ok_or_else(|| ParseError::invalid_value("free", "expected an object"))?;
        let balances = free
            .iter()
            .filter(|(currency, _)| !currency.starts_with('1'))
            .map(|(currency, amount)| {
                Ok((currency.to_uppercase(), to_decimal_string(amount, currency)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Wallet::from_balances(
            balances,
            REFERENCE_CURRENCIES,
            envelope.received_at(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitex_core::http_client::RawResponse;
    use bitex_core::request::Params;
    use bitex_core::types::Verb;
    use std::sync::Arc;

    fn envelope(verb: Verb, body: &str) -> ResponseEnvelope {
        ResponseEnvelope::new(
            verb,
            Params::new(),
            RawResponse::new(200, body),
            Arc::new(OkexFormatter),
        )
            .with_received_at(1_500_000_000_000)
    }

    #[test]
    fn test_ticker() {
        let env = envelope(
            Verb::Ticker,
            r#"{"date":"1410431279","ticker":{"buy":"33.15","high":"34.15","last":"33.15","low":"32.05","sell":"33.16","vol":"10532696.39199642"}}"#,
        );
        let ticker = env.ticker().unwrap();
        assert_eq!(ticker.bid.unwrap(), "33.15");
        assert_eq!(ticker.ask.unwrap(), "33.16");
        assert_eq!(ticker.volume.unwrap(), "10532696.39199642");
        assert_eq!(ticker.timestamp, 1_410_431_279_000);
        assert!(ticker.error.is_none());
    }

    #[test]
    fn test_order_book_asks_reordered_best_first() {
        let env = envelope(
            Verb::OrderBook,
            r#"{"asks":[[792,5],[789.68,0.018],[788.99,0.042]],"bids":[[787.1,0.35],[787,12.071]]}"#,
        );
        let book = env.order_book().unwrap();
        assert_eq!(book.asks[0].price, "788.99");
        assert_eq!(book.asks[2].price, "792");
        assert_eq!(book.bids[0].price, "787.1");
        assert_eq!(book.timestamp, 1_500_000_000_000);
    }

    #[test]
    fn test_trades() {
        let env = envelope(
            Verb::Trades,
            r#"[{"amount":"0.025","date":1367130137,"date_ms":1367130137000,"price":"787.71","tid":230433,"type":"sell"},
                {"amount":"0.1","date":1367130140,"date_ms":1367130140000,"price":"787.8","tid":230434,"type":"buy"}]"#,
        );
        let trades = env.trades().unwrap().trades;
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, "230433");
        assert_eq!(trades[0].time, 1_367_130_137_000);
        assert!(!trades[0].is_buyer_maker);
        assert!(trades[1].is_buyer_maker);
        assert_eq!(trades[1].qty, "0.1");
    }

    #[test]
    fn test_wallet_filters_and_uppercases() {
        let env = envelope(
            Verb::Wallet,
            r#"{"info":{"funds":{"free":{"btc":"0","eth":"0","ltc":"0","usdt":"12.5","xrp":"0","1st":"9"}}},"result":true}"#,
        );
        let wallet = env.wallet().unwrap();
        let currencies: Vec<&str> = wallet.balances.keys().map(String::as_str).collect();
        assert_eq!(currencies, ["BTC", "ETH", "LTC", "USDT"]);
        assert_eq!(wallet.get("USDT").unwrap(), &"12.5");
    }

    #[test]
    fn test_error_code_reported_in_record() {
        let env = envelope(Verb::Wallet, r#"{"result":false,"error_code":10005}"#);
        let wallet = env.wallet().unwrap();
        assert_eq!(wallet.error.as_deref(), Some("OKEx error code 10005"));
        assert!(wallet.balances.is_empty());
    }

    #[test]
    fn test_unsupported_verbs() {
        let env = envelope(Verb::OpenOrders, "[]");
        assert!(env.open_orders().unwrap_err().is_not_implemented());
    }
}
