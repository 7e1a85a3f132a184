//! Coinone exchange implementation.
//!
//! Market data is keyed by the `currency` parameter (the base currency in lower
//! case, always quoted in KRW). Only the wallet is authenticated.

pub mod auth;
pub mod parser;

pub use auth::CoinoneSigner;
pub use parser::CoinoneFormatter;

use async_trait::async_trait;
use bitex_core::Result;
use bitex_core::client::{ApiClient, ClientConfig};
use bitex_core::envelope::ResponseEnvelope;
use bitex_core::exchange::RestInterface;
use bitex_core::http_client::Transport;
use bitex_core::pair::Pair;
use bitex_core::request::{HttpMethod, Params};
use bitex_core::types::{OrderBook, Ticker, Trades, Verb, Wallet};
use std::collections::BTreeSet;
use std::sync::Arc;

const SUPPORTED_CURRENCIES: &[&str] =
    &["btc", "bch", "eth", "etc", "xrp", "qtum", "iota", "ltc", "btg"];

/// Coinone facade.
#[derive(Debug)]
pub struct Coinone {
    client: ApiClient<CoinoneSigner>,
    formatter: Arc<CoinoneFormatter>,
}

impl Coinone {
    /// Creates a Coinone interface talking to the live API.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(CoinoneSigner, config)?))
    }

    /// Creates a Coinone interface with a caller-supplied transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_client(ApiClient::with_transport(
            CoinoneSigner,
            config,
            transport,
        )?))
    }

    fn from_client(client: ApiClient<CoinoneSigner>) -> Self {
        Self {
            client,
            formatter: Arc::new(CoinoneFormatter),
        }
    }

    /// Underlying client.
    pub fn client(&self) -> &ApiClient<CoinoneSigner> {
        &self.client
    }

    /// Coinone only names the base currency.
    pub fn symbol(pair: &Pair) -> String {
        pair.base.to_ascii_lowercase()
    }

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

    async fn market(&self, verb: Verb, endpoint: &str, pair: &Pair) -> Result<ResponseEnvelope> {
        let params = Params::new().with("currency", Self::symbol(pair));
        self.request(verb, endpoint, params, false).await
    }
}

#[async_trait]
impl RestInterface for Coinone {
    fn name(&self) -> &'static str {
        "Coinone"
    }

    async fn supported_pairs(&self) -> Result<BTreeSet<String>> {
        Ok(SUPPORTED_CURRENCIES.iter().map(ToString::to_string).collect())
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker> {
        self.market(Verb::Ticker, "ticker/", pair).await?.ticker()
    }

    async fn order_book(&self, pair: &Pair) -> Result<OrderBook> {
        self.market(Verb::OrderBook, "orderbook/", pair).await?.order_book()
    }

    async fn trades(&self, pair: &Pair) -> Result<Trades> {
        self.market(Verb::Trades, "trades/", pair).await?.trades()
    }

    async fn wallet(&self) -> Result<Wallet> {
        self.request(Verb::Wallet, "v2/account/balance/", Params::new(), true)
            .await?
            .wallet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Canned;
    use bitex_core::types::DecimalString;

    fn coinone(transport: &Arc<Canned>) -> Coinone {
        let config = ClientConfig::builder().key("panda").secret("shadow").build();
        Coinone::with_transport(&config, transport.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_ticker_uses_currency_param() {
        let transport = Canned::ok(r#"{"result":"success","errorCode":"0","last":"419000.0","timestamp":"1416895635"}"#);
        let ticker = coinone(&transport).ticker(&Pair::new("BTC", "KRW")).await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method(), HttpMethod::Get);
        assert_eq!(sent.url(), "https://api.coinone.co.kr/ticker/?currency=btc");
        assert_eq!(ticker.last.unwrap(), "419000.0");
    }

    #[tokio::test]
    async fn test_wallet_is_signed_post() {
        let transport = Canned::ok(r#"{"result":"success","errorCode":"0","krw":{"avail":"10","balance":"10"}}"#);
        let wallet = coinone(&transport).wallet().await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method(), HttpMethod::Post);
        assert_eq!(sent.url(), "https://api.coinone.co.kr/v2/account/balance/");
        assert!(sent.header("X-COINONE-PAYLOAD").is_some());
        assert!(sent.header("X-COINONE-SIGNATURE").is_some());
        assert_eq!(wallet.get("KRW").map(DecimalString::as_str), Some("10"));
    }

    #[tokio::test]
    async fn test_order_verbs_send_nothing() {
        let transport = Canned::ok("{}");
        let price = DecimalString::parse("1").unwrap();
        let err = coinone(&transport)
            .bid(&Pair::new("BTC", "KRW"), &price, &price)
            .await
            .unwrap_err();

        assert!(err.is_not_implemented());
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_supported_pairs_are_static() {
        let transport = Canned::ok("{}");
        let pairs = coinone(&transport).supported_pairs().await.unwrap();
        assert!(pairs.contains("qtum"));
        assert!(transport.is_empty());
    }
}
