//! Gate.io exchange implementation (API v2, `api2/1`).

pub mod auth;
pub mod parser;

pub use auth::GateioSigner;
pub use parser::GateioFormatter;

use crate::listing::fetch_json;
use async_trait::async_trait;
use bitex_core::client::{ApiClient, ClientConfig};
use bitex_core::envelope::ResponseEnvelope;
use bitex_core::exchange::RestInterface;
use bitex_core::http_client::Transport;
use bitex_core::pair::Pair;
use bitex_core::request::{HttpMethod, RequestDescriptor};
use bitex_core::types::{OrderBook, Ticker, Verb, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Gate.io facade.
#[derive(Debug)]
pub struct Gateio {
    client: ApiClient<GateioSigner>,
    formatter: Arc<GateioFormatter>,
}

impl Gateio {
    /// Creates a Gate.io interface talking to the live API.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(GateioSigner, config)?))
    }

    /// Creates a Gate.io interface with a caller-supplied transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_client(ApiClient::with_transport(
            GateioSigner,
            config,
            transport,
        )?))
    }

    fn from_client(client: ApiClient<GateioSigner>) -> Self {
        Self {
            client,
            formatter: Arc::new(GateioFormatter),
        }
    }

    /// Underlying client.
    pub fn client(&self) -> &ApiClient<GateioSigner> {
        &self.client
    }

    /// Gate.io spells pairs `base_quote` in lower case.
    pub fn symbol(pair: &Pair) -> String {
        pair.joined_lower("_")
    }

    async fn send(&self, verb: Verb, descriptor: &RequestDescriptor) -> Result<ResponseEnvelope> {
        self.client
            .fetch(verb, descriptor.params().clone(), descriptor, self.formatter.clone())
            .await
    }

    async fn market(&self, verb: Verb, method: &str, pair: &Pair) -> Result<ResponseEnvelope> {
        let descriptor = self
            .client
            .descriptor(format!("{method}/{}", Self::symbol(pair)))
            .build(&self.client.rules())?;
        self.send(verb, &descriptor).await
    }
}

#[async_trait]
impl RestInterface for Gateio {
    fn name(&self) -> &'static str {
        "Gate.io"
    }

    async fn supported_pairs(&self) -> Result<BTreeSet<String>> {
        let listing = fetch_json(&self.client, "pairs").await?;
        let pairs: BTreeSet<String> = listing
            .as_array()
            .ok_or_else(|| ParseError::invalid_value("pairs", "expected an array"))?
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect();
        debug!(count = pairs.len(), "Loaded Gate.io pairs");
        Ok(pairs)
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker> {
        self.market(Verb::Ticker, "ticker", pair).await?.ticker()
    }

    async fn order_book(&self, pair: &Pair) -> Result<OrderBook> {
        self.market(Verb::OrderBook, "orderBook", pair)
            .await?
            .order_book()
    }

    async fn wallet(&self) -> Result<Wallet> {
        let descriptor = self
            .client
            .descriptor("private/balances")
            .method(HttpMethod::Post)
            .authenticated(true)
            .build(&self.client.rules())?;
        self.send(Verb::Wallet, &descriptor).await?.wallet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Canned;

    fn gateio(transport: &Arc<Canned>) -> Gateio {
        let config = ClientConfig::builder().key("panda").secret("shadow").build();
        Gateio::with_transport(&config, transport.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_ticker_path() {
        let transport = Canned::ok(r#"{"result":"true","last":"0.1"}"#);
        gateio(&transport).ticker(&Pair::new("ETH", "BTC")).await.unwrap();
        assert_eq!(
            transport.last().url(),
            "https://api.gateio.io/api2/1/ticker/eth_btc"
        );
    }

    #[tokio::test]
    async fn test_wallet_signed_with_key_and_sign_headers() {
        let transport = Canned::ok(r#"{"result":"true","available":{"BTC":"1"}}"#);
        gateio(&transport).wallet().await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method(), HttpMethod::Post);
        assert_eq!(sent.url(), "https://api.gateio.io/api2/1/private/balances");
        assert_eq!(sent.header("KEY"), Some("panda"));
        assert_eq!(sent.header("SIGN").map(str::len), Some(128));
    }

    #[tokio::test]
    async fn test_supported_pairs() {
        let transport = Canned::ok(r#"["eth_btc","etc_usdt"]"#);
        let pairs = gateio(&transport).supported_pairs().await.unwrap();
        assert!(pairs.contains("eth_btc"));
        assert_eq!(pairs.len(), 2);
    }

    #[tokio::test]
    async fn test_trades_not_offered() {
        let transport = Canned::ok("[]");
        let err = gateio(&transport).trades(&Pair::new("ETH", "BTC")).await.unwrap_err();
        assert!(err.is_not_implemented());
        assert!(transport.is_empty());
    }
}
