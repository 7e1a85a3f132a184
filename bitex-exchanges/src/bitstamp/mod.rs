//! Bitstamp exchange implementation.
//!
//! Public calls are GETs, authenticated calls are POSTs with the signature in
//! the form body. Pairs are spelled `btcusd` in endpoint paths.

pub mod auth;
pub mod parser;

pub use auth::BitstampSigner;
pub use parser::BitstampFormatter;

use crate::listing::fetch_json;
use async_trait::async_trait;
use bitex_core::client::{ApiClient, ClientConfig};
use bitex_core::envelope::ResponseEnvelope;
use bitex_core::exchange::RestInterface;
use bitex_core::http_client::Transport;
use bitex_core::pair::Pair;
use bitex_core::request::{HttpMethod, Params};
use bitex_core::types::{
    CancelledOrder, DecimalString, OpenOrders, OrderBook, OrderPlacement, OrderStatus, Ticker,
    Trades, Verb, Wallet,
};
use bitex_core::{ParseError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Bitstamp facade.
#[derive(Debug)]
pub struct Bitstamp {
    client: ApiClient<BitstampSigner>,
    formatter: Arc<BitstampFormatter>,
}

impl Bitstamp {
    /// Creates a Bitstamp interface talking to the live API.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(BitstampSigner, config)?))
    }

    /// Creates a Bitstamp interface with a caller-supplied transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_client(ApiClient::with_transport(
            BitstampSigner,
            config,
            transport,
        )?))
    }

    fn from_client(client: ApiClient<BitstampSigner>) -> Self {
        Self {
            client,
            formatter: Arc::new(BitstampFormatter),
        }
    }

    /// Underlying client.
    pub fn client(&self) -> &ApiClient<BitstampSigner> {
        &self.client
    }

    /// Bitstamp's path spelling of `pair`, e.g. `btcusd`.
    pub fn symbol(pair: &Pair) -> String {
        pair.joined_lower("")
    }

    /// Sends `endpoint`, as a signed POST when `authenticate` is set and a
    /// plain GET otherwise.
    async fn request(
        &self,
        verb: Verb,
        endpoint: &str,
        params: Params,
        authenticate: bool,
    ) -> Result<ResponseEnvelope> {
        let method = if authenticate {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        };
        let descriptor = self
            .client
            .descriptor(endpoint)
            .method(method)
            .params(params.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .authenticated(authenticate)
            .build(&self.client.rules())?;
        self.client
            .fetch(verb, params, &descriptor, self.formatter.clone())
            .await
    }

    async fn place_order(
        &self,
        verb: Verb,
        side: &str,
        pair: &Pair,
        price: &DecimalString,
        size: &DecimalString,
    ) -> Result<ResponseEnvelope> {
        let params = Params::new()
            .with("amount", size.as_str())
            .with("price", price.as_str());
        let endpoint = format!("{side}/{}/", Self::symbol(pair));
        self.request(verb, &endpoint, params, true).await
    }
}

#[async_trait]
impl RestInterface for Bitstamp {
    fn name(&self) -> &'static str {
        "Bitstamp"
    }

    async fn supported_pairs(&self) -> Result<BTreeSet<String>> {
        let listing = fetch_json(&self.client, "trading-pairs-info/").await?;
        let entries = listing
            .as_array()
            .ok_or_else(|| ParseError::invalid_value("trading-pairs-info", "expected an array"))?;
        let pairs: BTreeSet<String> = entries
            .iter()
            .filter_map(|entry| entry.get("name").and_then(Value::as_str))
            .map(|name| name.replace('/', ""))
            .collect();
        debug!(count = pairs.len(), "Loaded Bitstamp trading pairs");
        Ok(pairs)
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker> {
        let endpoint = format!("ticker/{}/", Self::symbol(pair));
        self.request(Verb::Ticker, &endpoint, Params::new(), false)
            .await?
            .ticker()
    }

    async fn order_book(&self, pair: &Pair) -> Result<OrderBook> {
        let endpoint = format!("order_book/{}/", Self::symbol(pair));
        self.request(Verb::OrderBook, &endpoint, Params::new(), false)
            .await?
            .order_book()
    }

    async fn trades(&self, pair: &Pair) -> Result<Trades> {
        let endpoint = format!("transactions/{}/", Self::symbol(pair));
        self.request(Verb::Trades, &endpoint, Params::new(), false)
            .await?
            .trades()
    }

    async fn bid(
        &self,
        pair: &Pair,
        price: &DecimalString,
        size: &DecimalString,
    ) -> Result<OrderPlacement> {
        self.place_order(Verb::Bid, "buy", pair, price, size)
            .await?
            .bid()
    }

    async fn ask(
        &self,
        pair: &Pair,
        price: &DecimalString,
        size: &DecimalString,
    ) -> Result<OrderPlacement> {
        self.place_order(Verb::Ask, "sell", pair, price, size)
            .await?
            .ask()
    }

    async fn order_status(&self, order_id: &str) -> Result<OrderStatus> {
        // Order status only exists on the unversioned API.
        let endpoint = format!("{}/order_status/", self.client.api().address);
        let params = Params::new().with("id", order_id);
        self.request(Verb::OrderStatus, &endpoint, params, true)
            .await?
            .order_status()
    }

    async fn open_orders(&self) -> Result<OpenOrders> {
        self.request(Verb::OpenOrders, "open_orders/all/", Params::new(), true)
            .await?
            .open_orders()
    }

    async fn cancel_order(&self, order_id: &str) -> Result<CancelledOrder> {
        let params = Params::new().with("id", order_id);
        self.request(Verb::CancelOrder, "cancel_order/", params, true)
            .await?
            .cancel_order()
    }

    async fn wallet(&self) -> Result<Wallet> {
        self.request(Verb::Wallet, "balance/", Params::new(), true)
            .await?
            .wallet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Canned;
    use bitex_core::credentials::CredentialField;
    use bitex_core::signed_request::RequestBody;

    fn bitstamp(transport: &Arc<Canned>) -> Bitstamp {
        let config = ClientConfig::builder()
            .key("panda")
            .secret("shadow")
            .credential(CredentialField::UserId, "leeroy")
            .build();
        Bitstamp::with_transport(&config, transport.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_ticker_is_public_get() {
        let transport = Canned::ok(r#"{"last": "11067.29", "timestamp": "1517426386"}"#);
        let ticker = bitstamp(&transport).ticker(&Pair::new("BTC", "USD")).await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method(), HttpMethod::Get);
        assert_eq!(sent.url(), "https://www.bitstamp.net/api/v2/ticker/btcusd/");
        assert!(sent.body().is_empty());
        assert_eq!(ticker.last.unwrap(), "11067.29");
    }

    #[tokio::test]
    async fn test_bid_is_signed_post() {
        let transport = Canned::ok(r#"{"id": "99", "price": "100", "amount": "0.5", "type": "0"}"#);
        let price = DecimalString::parse("100").unwrap();
        let size = DecimalString::parse("0.5").unwrap();
        let bid = bitstamp(&transport)
            .bid(&Pair::new("BTC", "USD"), &price, &size)
            .await
            .unwrap();

        let sent = transport.last();
        assert_eq!(sent.method(), HttpMethod::Post);
        assert_eq!(sent.url(), "https://www.bitstamp.net/api/v2/buy/btcusd/");
        let RequestBody::Form(body) = sent.body() else {
            panic!("expected a form body");
        };
        assert!(body.starts_with("amount=0.5&price=100&key=panda&signature="));
        assert!(body.ends_with("&nonce=1"));
        assert_eq!(bid.order_id, "99");
    }

    #[tokio::test]
    async fn test_order_status_uses_unversioned_endpoint() {
        let transport = Canned::ok(r#"{"status": "Open", "transactions": []}"#);
        let status = bitstamp(&transport).order_status("42").await.unwrap();

        assert_eq!(transport.last().url(), "https://www.bitstamp.net/api/order_status/");
        assert_eq!(status.order_id, "42");
        assert_eq!(status.state, "Open");
    }

    #[tokio::test]
    async fn test_private_call_without_user_id_fails_before_sending() {
        let transport = Canned::ok("{}");
        let config = ClientConfig::builder().key("panda").secret("shadow").build();
        let bitstamp = Bitstamp::with_transport(&config, transport.clone()).unwrap();

        let err = bitstamp.wallet().await.unwrap_err();
        assert!(err.as_authentication().unwrap().contains("user_id"));
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_supported_pairs_strip_slash() {
        let transport = Canned::ok(
            r#"[{"name": "BTC/USD", "url_symbol": "btcusd"}, {"name": "ETH/EUR", "url_symbol": "etheur"}]"#,
        );
        let pairs = bitstamp(&transport).supported_pairs().await.unwrap();
        assert_eq!(pairs, BTreeSet::from(["BTCUSD".to_string(), "ETHEUR".to_string()]));
        assert_eq!(
            transport.last().url(),
            "https://www.bitstamp.net/api/v2/trading-pairs-info/"
        );
    }

    #[tokio::test]
    async fn test_http_error_is_public_data_fetch() {
        let transport = Canned::new(404, "Not Found");
        let err = bitstamp(&transport).ticker(&Pair::new("BTC", "XYZ")).await.unwrap_err();
        assert_eq!(err.as_public_data_fetch(), Some((404, "Not Found")));
    }
}
