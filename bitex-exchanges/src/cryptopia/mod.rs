//! Cryptopia exchange implementation.
//!
//! Public calls put the market in the path (`GetMarket/DOT_BTC`); private calls
//! are signed JSON POSTs. Responses may start with a UTF-8 byte-order mark,
//! which the signer's repair hook removes before decoding.

pub mod auth;
pub mod parser;

pub use auth::CryptopiaSigner;
pub use parser::CryptopiaFormatter;

use crate::listing::fetch_json;
use async_trait::async_trait;
use bitex_core::client::{ApiClient, ClientConfig};
use bitex_core::envelope::ResponseEnvelope;
use bitex_core::exchange::RestInterface;
use bitex_core::http_client::Transport;
use bitex_core::pair::Pair;
use bitex_core::request::HttpMethod;
use bitex_core::types::{OrderBook, Ticker, Trades, Verb, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Cryptopia facade.
#[derive(Debug)]
pub struct Cryptopia {
    client: ApiClient<CryptopiaSigner>,
    formatter: Arc<CryptopiaFormatter>,
}

impl Cryptopia {
    /// Creates a Cryptopia interface talking to the live API.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(CryptopiaSigner, config)?))
    }

    /// Creates a Cryptopia interface with a caller-supplied transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_client(ApiClient::with_transport(
            CryptopiaSigner,
            config,
            transport,
        )?))
    }

    fn from_client(client: ApiClient<CryptopiaSigner>) -> Self {
        Self {
            client,
            formatter: Arc::new(CryptopiaFormatter),
        }
    }

    /// Underlying client.
    pub fn client(&self) -> &ApiClient<CryptopiaSigner> {
        &self.client
    }

    /// Cryptopia spells markets `BASE_QUOTE`.
    pub fn symbol(pair: &Pair) -> String {
        pair.joined_upper("_")
    }

    async fn market(&self, verb: Verb, method: &str, pair: &Pair) -> Result<ResponseEnvelope> {
        let descriptor = self
            .client
            .descriptor(&format!("{method}/{}", Self::symbol(pair)))
            .build(&self.client.rules())?;
        self.client
            .fetch(verb, descriptor.params().clone(), &descriptor, self.formatter.clone())
            .await
    }
}

#[async_trait]
impl RestInterface for Cryptopia {
    fn name(&self) -> &'static str {
        "Cryptopia"
    }

    async fn supported_pairs(&self) -> Result<BTreeSet<String>> {
        let listing = fetch_json(&self.client, "GetTradePairs").await?;
        let entries = listing
            .get("Data")
            .and_then(Value::as_array)
            .ok_or_else(|| ParseError::invalid_value("Data", "expected an array"))?;
        let pairs: BTreeSet<String> = entries
            .iter()
            .filter_map(|entry| entry.get("Label").and_then(Value::as_str))
            .map(|label| label.replace('/', "_"))
            .collect();
        debug!(count = pairs.len(), "Loaded Cryptopia trade pairs");
        Ok(pairs)
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker> {
        self.market(Verb::Ticker, "GetMarket", pair).await?.ticker()
    }

    async fn order_book(&self, pair: &Pair) -> Result<OrderBook> {
        self.market(Verb::OrderBook, "GetMarketOrders", pair)
            .await?
            .order_book()
    }

    async fn trades(&self, pair: &Pair) -> Result<Trades> {
        self.market(Verb::Trades, "GetMarketHistory", pair)
            .await?
            .trades()
    }

    async fn wallet(&self) -> Result<Wallet> {
        let descriptor = self
            .client
            .descriptor("GetBalance")
            .method(HttpMethod::Post)
            .authenticated(true)
            .build(&self.client.rules())?;
        self.client
            .fetch(Verb::Wallet, descriptor.params().clone(), &descriptor, self.formatter.clone())
            .await?
            .wallet()
    }
}
