//! Bitstamp response formatter.
//!
//! Bitstamp reports most failures with HTTP 200 and either
//! `{"status": "error", "reason": ...}` or `{"error": ...}`; both end up in the
//! record's `error` field.

use bitex_core::envelope::{ResponseEnvelope, ResponseFormatter};
use bitex_core::parser_utils::{
    levels_from_pairs, optional_decimal, parse_timestamp, require_decimal, require_field,
    require_id, value_text,
};
use bitex_core::time::{parse_iso8601, seconds_to_ms};
use bitex_core::types::{
    CancelledOrder, OpenOrder, OpenOrders, OrderBook, OrderPlacement, OrderSide, OrderStatus,
    OrderType, Ticker, Timestamp, Trade, Trades, Wallet,
};
use bitex_core::{ParseError, Result};
use serde_json::Value;

const REFERENCE_CURRENCIES: &[&str] = &["BTC", "USD"];

/// Normalizes Bitstamp responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitstampFormatter;

fn body_error(data: &Value) -> Option<String> {
    let text = |value: &Value| value_text(value).unwrap_or_else(|| value.to_string());
    if data.get("status").and_then(Value::as_str) == Some("error") {
        return Some(data.get("reason").map_or_else(|| "unknown error".to_string(), text));
    }
    data.get("error").map(text)
}

/// `type` is `0` for buys and `1` for sells, as number or string.
fn side(data: &Value) -> Result<OrderSide> {
    match require_field(data, "type")?.as_u64().or_else(|| {
        data.get("type")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }) {
        Some(0) => Ok(OrderSide::Buy),
        Some(1) => Ok(OrderSide::Sell),
        _ => Err(ParseError::invalid_value("type", "expected 0 (buy) or 1 (sell)").into()),
    }
}

fn datetime(data: &Value, fallback: Timestamp) -> Timestamp {
    data.get("datetime")
        .and_then(Value::as_str)
        .and_then(|s| parse_iso8601(s).ok())
        .unwrap_or(fallback)
}

fn seconds(data: &Value, key: &str, fallback: Timestamp) -> Timestamp {
    parse_timestamp(data, key).map_or(fallback, seconds_to_ms)
}

impl BitstampFormatter {
    fn placement(envelope: &ResponseEnvelope, side: OrderSide) -> Result<OrderPlacement> {
        let data = envelope.json()?;
        let mut placement = OrderPlacement {
            order_id: String::new(),
            price: None,
            size: None,
            side,
            order_type: OrderType::Limit,
            timestamp: envelope.received_at(),
            error: body_error(data),
        };
        if placement.error.is_some() {
            return Ok(placement);
        }
        placement.order_id = require_id(data, "id")?;
        placement.price = optional_decimal(data, "price")?;
        placement.size = optional_decimal(data, "amount")?;
        placement.timestamp = datetime(data, envelope.received_at());
        Ok(placement)
    }
}

impl ResponseFormatter for BitstampFormatter {
    fn exchange(&self) -> &'static str {
        "Bitstamp"
    }

    fn ticker(&self, envelope: &ResponseEnvelope) -> Result<Ticker> {
        let data = envelope.json()?;
        let mut ticker = Ticker::new(seconds(data, "timestamp", envelope.received_at()));
        if let Some(error) = body_error(data) {
            ticker.error = Some(error);
            return Ok(ticker);
        }
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
        let timestamp = seconds(data, "timestamp", envelope.received_at());
        if let Some(error) = body_error(data) {
            let mut book = OrderBook::new(Vec::new(), Vec::new(), timestamp);
            book.error = Some(error);
            return Ok(book);
        }
        let bids = levels_from_pairs(require_field(data, "bids")?, "bids")?;
        let asks = levels_from_pairs(require_field(data, "asks")?, "asks")?;
        Ok(OrderBook::new(bids, asks, timestamp))
    }

    fn trades(&self, envelope: &ResponseEnvelope) -> Result<Trades> {
        let data = envelope.json()?;
        let Some(entries) = data.as_array() else {
            let mut trades = Trades::new(Vec::new(), envelope.received_at());
            trades.error = Some(body_error(data).unwrap_or_else(|| data.to_string()));
            return Ok(trades);
        };
        let trades = entries
            .iter()
            .map(|trade| -> Result<Trade> {
                Ok(Trade {
                    id: require_id(trade, "tid")?,
                    price: require_decimal(trade, "price")?,
                    qty: require_decimal(trade, "amount")?,
                    time: parse_timestamp(trade, "date")
                        .map(seconds_to_ms)
                        .ok_or_else(|| ParseError::timestamp("date is not an integer"))?,
                    is_buyer_maker: side(trade)? == OrderSide::Buy,
                    is_best_match: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Trades::new(trades, envelope.received_at()))
    }

    fn bid(&self, envelope: &ResponseEnvelope) -> Result<OrderPlacement> {
        Self::placement(envelope, OrderSide::Buy)
    }

    fn ask(&self, envelope: &ResponseEnvelope) -> Result<OrderPlacement> {
        Self::placement(envelope, OrderSide::Sell)
    }

    fn order_status(&self, envelope: &ResponseEnvelope) -> Result<OrderStatus> {
        let data = envelope.json()?;
        let mut status = OrderStatus {
            order_id: envelope.args().get("id").unwrap_or_default().to_string(),
            price: None,
            size: None,
            side: None,
            order_type: None,
            state: String::new(),
            timestamp: envelope.received_at(),
            error: body_error(data),
        };
        if status.error.is_none() {
            status.state = require_id(data, "status")?;
        }
        Ok(status)
    }

    fn cancel_order(&self, envelope: &ResponseEnvelope) -> Result<CancelledOrder> {
        let data = envelope.json()?;
        let error = body_error(data);
        let order_id = data
            .get("id")
            .and_then(value_text)
            .or_else(|| envelope.args().get("id").map(str::to_string))
            .unwrap_or_default();
        let successful =
            error.is_none() && (data.as_bool() == Some(true) || data.get("id").is_some());
        Ok(CancelledOrder {
            order_id,
            successful,
            timestamp: envelope.received_at(),
            error,
        })
    }

    fn open_orders(&self, envelope: &ResponseEnvelope) -> Result<OpenOrders> {
        let data = envelope.json()?;
        let mut open = OpenOrders {
            orders: Vec::new(),
            timestamp: envelope.received_at(),
            error: body_error(data),
        };
        let Some(entries) = data.as_array() else {
            if open.error.is_none() {
                return Err(ParseError::invalid_value("open_orders", "expected an array").into());
            }
            return Ok(open);
        };
        open.orders = entries
            .iter()
            .map(|order| -> Result<OpenOrder> {
                Ok(OpenOrder {
                    order_id: require_id(order, "id")?,
                    pair: order
                        .get("currency_pair")
                        .and_then(Value::as_str)
                        .map(|pair| pair.replace('/', "")),
                    price: require_decimal(order, "price")?,
                    size: require_decimal(order, "amount")?,
                    side: side(order)?,
                    timestamp: datetime(order, envelope.received_at()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(open)
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
            .keys()
            .filter_map(|key| {
                key.strip_suffix("_available")
                    .map(|currency| (currency.to_uppercase(), key))
            })
            .map(|(currency, key)| Ok((currency, require_decimal(data, key)?)))
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

    const RECEIVED: Timestamp = 1_520_000_000_000;

    fn envelope(verb: Verb, args: Params, body: &str) -> ResponseEnvelope {
        ResponseEnvelope::new(verb, args, RawResponse::new(200, body), Arc::new(BitstampFormatter))
            .with_received_at(RECEIVED)
    }

    #[test]
    fn test_ticker_keeps_exact_decimals() {
        let env = envelope(
            Verb::Ticker,
            Params::new(),
            r#"{"high": "11298.00", "last": "11067.29", "timestamp": "1517426386", "bid": "11054.09",
                "vwap": "10512.81", "volume": 14432.9870, "low": "9750.01", "ask": "11067.29", "open": "10180.97"}"#,
        );
        let ticker = env.ticker().unwrap();
        assert_eq!(ticker.bid.unwrap(), "11054.09");
        assert_eq!(ticker.high.unwrap(), "11298.00");
        assert_eq!(ticker.volume.unwrap(), "14432.9870");
        assert_eq!(ticker.timestamp, 1_517_426_386_000);
    }

    #[test]
    fn test_order_book_best_first() {
        let env = envelope(
            Verb::OrderBook,
            Params::new(),
            r#"{"timestamp": "1517426386", "bids": [["11050.00", "0.5"], ["11054.09", "1.2"]],
                "asks": [["11070.00", "2"], ["11067.29", "0.1"]]}"#,
        );
        let book = env.order_book().unwrap();
        assert_eq!(book.bids[0].price, "11054.09");
        assert_eq!(book.asks[0].price, "11067.29");
    }

    #[test]
    fn test_trades_type_zero_is_buy() {
        let env = envelope(
            Verb::Trades,
            Params::new(),
            r#"[{"date": "1517426380", "tid": 50126325, "price": "11067.29", "type": 0, "amount": "0.0231"},
                {"date": "1517426381", "tid": "50126326", "price": "11060.00", "type": "1", "amount": "1"}]"#,
        );
        let trades = env.trades().unwrap().trades;
        assert_eq!(trades[0].id, "50126325");
        assert!(trades[0].is_buyer_maker);
        assert!(!trades[1].is_buyer_maker);
        assert_eq!(trades[1].time, 1_517_426_381_000);
    }

    #[test]
    fn test_bid_placement() {
        let env = envelope(
            Verb::Bid,
            Params::new(),
            r#"{"price": "100.00", "amount": "0.5", "type": "0", "id": "1234", "datetime": "2018-01-31 19:19:46.123"}"#,
        );
        let bid = env.bid().unwrap();
        assert_eq!(bid.order_id, "1234");
        assert_eq!(bid.side, OrderSide::Buy);
        assert_eq!(bid.price.unwrap(), "100.00");
        assert!(bid.error.is_none());
    }

    #[test]
    fn test_error_reason_reported() {
        let env = envelope(
            Verb::Ask,
            Params::new(),
            r#"{"status": "error", "reason": {"__all__": ["Minimum order size is 5.0 EUR."]}}"#,
        );
        let ask = env.ask().unwrap();
        assert!(ask.error.unwrap().contains("Minimum order size"));
        assert!(ask.order_id.is_empty());
    }

    #[test]
    fn test_order_status_uses_call_args() {
        let env = envelope(
            Verb::OrderStatus,
            Params::new().with("id", "1234"),
            r#"{"status": "Finished", "transactions": []}"#,
        );
        let status = env.order_status().unwrap();
        assert_eq!(status.order_id, "1234");
        assert_eq!(status.state, "Finished");
    }

    #[test]
    fn test_cancel_order_v1_true() {
        let env = envelope(Verb::CancelOrder, Params::new().with("id", "77"), "true");
        let cancelled = env.cancel_order().unwrap();
        assert_eq!(cancelled.order_id, "77");
        assert!(cancelled.successful);

        let env = envelope(Verb::CancelOrder, Params::new().with("id", "78"), r#"{"error": "Order not found"}"#);
        let cancelled = env.cancel_order().unwrap();
        assert!(!cancelled.successful);
        assert_eq!(cancelled.error.as_deref(), Some("Order not found"));
    }

    #[test]
    fn test_open_orders() {
        let env = envelope(
            Verb::OpenOrders,
            Params::new(),
            r#"[{"id": "1", "datetime": "2018-01-31 19:19:46", "type": "1", "price": "12000.00", "amount": "0.1", "currency_pair": "BTC/USD"}]"#,
        );
        let open = env.open_orders().unwrap();
        assert_eq!(open.orders.len(), 1);
        assert_eq!(open.orders[0].pair.as_deref(), Some("BTCUSD"));
        assert_eq!(open.orders[0].side, OrderSide::Sell);
    }

    #[test]
    fn test_wallet_available_keys() {
        let env = envelope(
            Verb::Wallet,
            Params::new(),
            r#"{"btc_available": "0.00000000", "usd_available": "0.00", "eth_available": "1.5",
                "xrp_available": "0.0", "btc_balance": "1.0", "fee": "0.25"}"#,
        );
        let wallet = env.wallet().unwrap();
        let currencies: Vec<&str> = wallet.balances.keys().map(String::as_str).collect();
        assert_eq!(currencies, ["BTC", "ETH", "USD"]);
        assert_eq!(wallet.get("BTC").unwrap(), &"0.00000000");
    }
}
