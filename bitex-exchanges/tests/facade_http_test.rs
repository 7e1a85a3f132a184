//! End-to-end facade tests through the real HTTP transport.
//!
//! Each test points a facade at a local `MockServer` via the address override,
//! so requests are signed, sent and normalized exactly as in production.

use bitex_core::client::ClientConfig;
use bitex_core::credentials::CredentialField;
use bitex_core::exchange::RestInterface;
use bitex_core::pair::Pair;
use bitex_exchanges::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .key("panda")
        .secret("shadow")
        .credential(CredentialField::UserId, "leeroy")
        .address(server.uri())
        .build()
}

#[tokio::test]
async fn test_bitstamp_ticker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/ticker/btcusd/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"high":"11300.00","last":"11067.29","timestamp":"1517426386","bid":"11060.01",
                "vwap":"10665.41","volume":"14823.88","low":"9991.00","ask":"11067.29","open":"10188.00"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let bitstamp = Bitstamp::new(&config(&server)).unwrap();
    let ticker = bitstamp.ticker(&Pair::new("BTC", "USD")).await.unwrap();

    assert_eq!(ticker.bid.unwrap(), "11060.01");
    assert_eq!(ticker.volume.unwrap(), "14823.88");
    assert_eq!(ticker.timestamp, 1_517_426_386_000);
}

#[tokio::test]
async fn test_bitstamp_wallet_is_signed_form_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/balance/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("key=panda"))
        .and(body_string_contains("nonce=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"btc_available":"0.00000000","usd_available":"12.50","eth_available":"0.00000000"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let bitstamp = Bitstamp::new(&config(&server)).unwrap();
    let wallet = bitstamp.wallet().await.unwrap();

    let currencies: Vec<&str> = wallet.balances.keys().map(String::as_str).collect();
    assert_eq!(currencies, ["BTC", "USD"]);
}

#[tokio::test]
async fn test_concurrent_calls_use_distinct_nonces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/balance/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"btc_available":"1"}"#))
        .expect(16)
        .mount(&server)
        .await;

    let bitstamp = Arc::new(Bitstamp::new(&config(&server)).unwrap());
    let mut calls = JoinSet::new();
    for _ in 0..16 {
        let bitstamp = bitstamp.clone();
        calls.spawn(async move { bitstamp.wallet().await });
    }
    while let Some(result) = calls.join_next().await {
        result.unwrap().unwrap();
    }

    let nonces: BTreeSet<u64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|request| {
            let body = String::from_utf8_lossy(&request.body).into_owned();
            body.split('&')
                .find_map(|pair| pair.strip_prefix("nonce=").map(str::to_string))
        })
        .map(|nonce| nonce.parse().unwrap())
        .collect();
    assert_eq!(nonces, (1..=16).collect::<BTreeSet<u64>>());
}

#[tokio::test]
async fn test_coinone_ticker_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ticker/"))
        .and(query_param("currency", "eth"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"result":"success","errorCode":"0","timestamp":"1517426386","high":"1300000","low":"1200000",
                "last":"1250000","volume":"9021.1"}"#,
        ))
        .mount(&server)
        .await;

    let coinone = Coinone::new(&config(&server)).unwrap();
    let ticker = coinone.ticker(&Pair::new("ETH", "KRW")).await.unwrap();
    assert!(ticker.bid.is_none());
    assert_eq!(ticker.last.unwrap(), "1250000");
}

#[tokio::test]
async fn test_cryptopia_bom_is_stripped() {
    let server = MockServer::start().await;
    let mut body = b"\xEF\xBB\xBF".to_vec();
    body.extend_from_slice(
        br#"{"Success":true,"Message":null,"Data":{"BidPrice":0.1,"AskPrice":0.2,"High":0.3,"Low":0.05,"LastPrice":0.15,"Volume":10}}"#,
    );
    Mock::given(method("GET"))
        .and(path("/GetMarket/DOT_BTC"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;

    let cryptopia = Cryptopia::new(&config(&server)).unwrap();
    let ticker = cryptopia.ticker(&Pair::new("DOT", "BTC")).await.unwrap();
    assert_eq!(ticker.last.unwrap(), "0.15");
}

#[tokio::test]
async fn test_hitbtc_wallet_sends_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/trading/balance"))
        .and(header("authorization", "Basic cGFuZGE6c2hhZG93"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"currency":"BTC","available":"0","reserved":"0"},{"currency":"ETH","available":"2.5","reserved":"0"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let hitbtc = HitBtc::new(&config(&server)).unwrap();
    let wallet = hitbtc.wallet().await.unwrap();
    assert_eq!(wallet.balances.len(), 2);
}

#[tokio::test]
async fn test_gateio_server_error_is_public_data_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/orderBook/eth_btc"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateio = Gateio::new(&config(&server)).unwrap();
    let err = gateio
        .order_book(&Pair::new("ETH", "BTC"))
        .await
        .unwrap_err();
    assert_eq!(err.as_public_data_fetch(), Some((500, "Internal Server Error")));
}

#[tokio::test]
async fn test_okex_malformed_body_keeps_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ticker.do"))
        .and(query_param("symbol", "ltc_btc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let okex = Okex::new(&config(&server)).unwrap();
    let err = okex.ticker(&Pair::new("LTC", "BTC")).await.unwrap_err();
    let details = err.as_malformed_response().unwrap();
    assert!(details.body.contains("maintenance"));
}

#[tokio::test]
async fn test_unsupported_verb_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let okex = Okex::new(&config(&server)).unwrap();
    let err = okex.open_orders().await.unwrap_err();
    assert!(err.is_not_implemented());
}
