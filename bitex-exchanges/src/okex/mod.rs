//! OKEx exchange implementation.
//!
//! Spot REST API v1. Market data is public; the wallet is an authenticated
//! POST signed with the sorted-parameter MD5 scheme (see [`auth`]).

pub mod auth;
pub mod parser;

pub use auth::OkexSigner;
pub use parser::OkexFormatter;

use async_trait::async_trait;
use bitex_core::client::{ApiClient, ClientConfig};
use bitex_core::envelope::ResponseEnvelope;
use bitex_core::exchange::RestInterface;
use bitex_core::http_client::Transport;
use bitex_core::pair::Pair;
use bitex_core::request::{HttpMethod, RequestDescriptor};
use bitex_core::types::{OrderBook, Ticker, Trades, Verb, Wallet};
use bitex_core::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Spot pairs listed on OKEx, in its own spelling.
const SUPPORTED_PAIRS: &[&str] = &[
    "bch_btc", "bch_usdt", "btc_usdt", "etc_btc", "etc_eth", "etc_usdt", "eth_btc", "eth_usdt",
    "ltc_btc", "ltc_eth", "ltc_usdt", "xrp_btc", "xrp_usdt",
];

/// OKEx facade.
#[derive(Debug)]
pub struct Okex {
    client: ApiClient<OkexSigner>,
    formatter: Arc<OkexFormatter>,
}

impl Okex {
    /// Creates an OKEx interface talking to the live API.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(OkexSigner, config)?))
    }

    /// Creates an OKEx interface with a caller-supplied transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_client(ApiClient::with_transport(OkexSigner, config, transport)?))
    }

    fn from_client(client: ApiClient<OkexSigner>) -> Self {
        Self {
            client,
            formatter: Arc::new(OkexFormatter),
        }
    }

    /// Underlying client.
    pub fn client(&self) -> &ApiClient<OkexSigner> {
        &self.client
    }

    /// OKEx spells pairs `base_quote` in lower case.
    pub fn symbol(pair: &Pair) -> String {
        pair.joined_lower("_")
    }

    async fn market(&self, verb: Verb, endpoint: &str, pair: &Pair) -> Result<ResponseEnvelope> {
        let descriptor = self
            .client
            .descriptor(endpoint)
            .param("symbol", Self::symbol(pair))
            .build(&self.client.rules())?;
        self.send(verb, &descriptor).await
    }

    async fn send(&self, verb: Verb, descriptor: &RequestDescriptor) -> Result<ResponseEnvelope> {
        self.client
            .fetch(verb, descriptor.params().clone(), descriptor, self.formatter.clone())
            .await
    }
}

#[async_trait]
impl RestInterface for Okex {
    fn name(&self) -> &'static str {
        "OKEx"
    }

    async fn supported_pairs(&self) -> Result<BTreeSet<String>> {
        Ok(SUPPORTED_PAIRS.iter().map(ToString::to_string).collect())
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker> {
        self.market(Verb::Ticker, "ticker.do", pair).await?.ticker()
    }

    async fn order_book(&self, pair: &Pair) -> Result<OrderBook> {
        self.market(Verb::OrderBook, "depth.do", pair).await?.order_book()
    }

    async fn trades(&self, pair: &Pair) -> Result<Trades> {
        self.market(Verb::Trades, "trades.do", pair).await?.trades()
    }

    async fn wallet(&self) -> Result<Wallet> {
        let descriptor = self
            .client
            .descriptor("userinfo.do")
            .method(HttpMethod::Post)
            .authenticated(true)
            .build(&self.client.rules())?;
        self.send(Verb::Wallet, &descriptor).await?.wallet()
    }
}
