//! HitBTC exchange implementation (API v2).
//!
//! Symbols are upper-case and unseparated (`ETHBTC`). The wallet is an
//! authenticated GET; basic auth carries the credentials.

pub mod auth;
pub mod parser;

pub use auth::HitBtcSigner;
pub use parser::HitBtcFormatter;

use crate::listing::fetch_json;
use async_trait::async_trait;
use bitex_core::client::{ApiClient, ClientConfig};
use bitex_core::envelope::ResponseEnvelope;
use bitex_core::exchange::RestInterface;
use bitex_core::http_client::Transport;
use bitex_core::pair::Pair;
use bitex_core::request::RequestDescriptor;
use bitex_core::types::{OrderBook, Ticker, Trades, Verb, Wallet};
use bitex_core::{ParseError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// HitBTC facade.
#[derive(Debug)]
pub struct HitBtc {
    client: ApiClient<HitBtcSigner>,
    formatter: Arc<HitBtcFormatter>,
}

impl HitBtc {
    /// Creates a HitBTC interface talking to the live API.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(HitBtcSigner, config)?))
    }

    /// Creates a HitBTC interface with a caller-supplied transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_client(ApiClient::with_transport(
            HitBtcSigner,
            config,
            transport,
        )?))
    }

    fn from_client(client: ApiClient<HitBtcSigner>) -> Self {
        Self {
            client,
            formatter: Arc::new(HitBtcFormatter),
        }
    }

    /// Underlying client.
    pub fn client(&self) -> &ApiClient<HitBtcSigner> {
        &self.client
    }

    /// HitBTC symbol for `pair`, e.g. `ETHBTC`.
    pub fn symbol(pair: &Pair) -> String {
        pair.joined_upper("")
    }

    async fn send(&self, verb: Verb, descriptor: &RequestDescriptor) -> Result<ResponseEnvelope> {
        self.client
            .fetch(verb, descriptor.params().clone(), descriptor, self.formatter.clone())
            .await
    }

    async fn public(&self, verb: Verb, resource: &str, pair: &Pair) -> Result<ResponseEnvelope> {
        let descriptor = self
            .client
            .descriptor(format!("public/{resource}/{}", Self::symbol(pair)))
            .build(&self.client.rules())?;
        self.send(verb, &descriptor).await
    }
}

#[async_trait]
impl RestInterface for HitBtc {
    fn name(&self) -> &'static str {
        "HitBTC"
    }

    async fn supported_pairs(&self) -> Result<BTreeSet<String>> {
        let listing = fetch_json(&self.client, "public/symbol").await?;
        let pairs: BTreeSet<String> = listing
            .as_array()
            .ok_or_else(|| ParseError::invalid_value("symbol", "expected an array"))?
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_str))
            .map(ToString::to_string)
            .collect();
        debug!(count = pairs.len(), "Loaded HitBTC symbols");
        Ok(pairs)
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker> {
        self.public(Verb::Ticker, "ticker", pair).await?.ticker()
    }

    async fn order_book(&self, pair: &Pair) -> Result<OrderBook> {
        self.public(Verb::OrderBook, "orderbook", pair)
            .await?
            .order_book()
    }

    async fn trades(&self, pair: &Pair) -> Result<Trades> {
        self.public(Verb::Trades, "trades", pair).await?.trades()
    }

    async fn wallet(&self) -> Result<Wallet> {
        let descriptor = self
            .client
            .descriptor("trading/balance")
            .authenticated(true)
            .build(&self.client.rules())?;
        self.send(Verb::Wallet, &descriptor).await?.wallet()
    }
}
