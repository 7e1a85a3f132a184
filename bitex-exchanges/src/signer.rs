//! Runtime selection of a signing strategy by exchange name.
//!
//! ```rust
//! use bitex_core::signed_request::SigningStrategy;
//! use bitex_exchanges::Signer;
//!
//! let signer: Signer = "kraken".parse().unwrap();
//! assert_eq!(signer.exchange(), "Kraken");
//! assert_eq!(signer.default_api().address, "https://api.kraken.com");
//! ```

use crate::bitfinex::BitfinexSigner;
use crate::bithumb::BithumbSigner;
use crate::bitstamp::BitstampSigner;
use crate::bittrex::BittrexSigner;
use crate::ccex::CcexSigner;
use crate::coincheck::CoincheckSigner;
use crate::coinone::CoinoneSigner;
use crate::cryptopia::CryptopiaSigner;
use crate::exmo::ExmoSigner;
use crate::gateio::GateioSigner;
use crate::gdax::GdaxSigner;
use crate::gemini::GeminiSigner;
use crate::hitbtc::HitBtcSigner;
use crate::itbit::ItbitSigner;
use crate::kraken::KrakenSigner;
use crate::okcoin::OkcoinSigner;
use crate::okex::OkexSigner;
use crate::poloniex::PoloniexSigner;
use crate::quadrigacx::QuadrigaCxSigner;
use crate::quoine::QuoineSigner;
use crate::rocktrading::RockTradingSigner;
use crate::vaultoro::VaultoroSigner;
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::envelope::RepairFn;
use bitex_core::nonce::NonceKind;
use bitex_core::request::{RequestDescriptor, SigningRules};
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};
use bitex_core::{Error, Result};
use std::str::FromStr;

macro_rules! signers {
    ($($variant:ident($signer:ident)),+ $(,)?) => {
        /// Every supported signing strategy.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Signer {
            $(
                #[allow(missing_docs)]
                $variant($signer),
            )+
        }

        impl Signer {
            /// All strategies, alphabetically.
            pub const ALL: &'static [Signer] = &[$(Signer::$variant($signer)),+];

            fn strategy(&self) -> &dyn SigningStrategy {
                match self {
                    $(Signer::$variant(signer) => signer,)+
                }
            }
        }
    };
}

signers! {
    Bitfinex(BitfinexSigner),
    Bithumb(BithumbSigner),
    Bitstamp(BitstampSigner),
    Bittrex(BittrexSigner),
    Ccex(CcexSigner),
    Coincheck(CoincheckSigner),
    Coinone(CoinoneSigner),
    Cryptopia(CryptopiaSigner),
    Exmo(ExmoSigner),
    Gateio(GateioSigner),
    Gdax(GdaxSigner),
    Gemini(GeminiSigner),
    HitBtc(HitBtcSigner),
    Itbit(ItbitSigner),
    Kraken(KrakenSigner),
    Okcoin(OkcoinSigner),
    Okex(OkexSigner),
    Poloniex(PoloniexSigner),
    QuadrigaCx(QuadrigaCxSigner),
    Quoine(QuoineSigner),
    RockTrading(RockTradingSigner),
    Vaultoro(VaultoroSigner),
}

/// Lower-case alphanumerics only, so `Gate.io`, `gateio` and `GATE-IO` match.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl Signer {
    /// Looks up a strategy by exchange name, ignoring case and punctuation.
    /// `rocktrading` is accepted for The Rock Trading.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        if wanted == "rocktrading" {
            return Some(Signer::RockTrading(RockTradingSigner));
        }
        Self::ALL
            .iter()
            .copied()
            .find(|signer| normalize(signer.exchange()) == wanted)
    }
}

impl FromStr for Signer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
            .ok_or_else(|| Error::invalid_request(format!("unknown exchange '{s}'")))
    }
}

impl SigningStrategy for Signer {
    fn exchange(&self) -> &'static str {
        self.strategy().exchange()
    }

    fn default_api(&self) -> ApiSettings {
        self.strategy().default_api()
    }

    fn required_fields(&self) -> &'static [CredentialField] {
        self.strategy().required_fields()
    }

    fn nonce_kind(&self) -> NonceKind {
        self.strategy().nonce_kind()
    }

    fn rules(&self) -> SigningRules {
        self.strategy().rules()
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        self.strategy().sign(api, descriptor, credentials, ctx)
    }

    fn unsigned(&self, api: &ApiSettings, descriptor: &RequestDescriptor) -> SignedRequest {
        self.strategy().unsigned(api, descriptor)
    }

    fn response_repair(&self) -> Option<RepairFn> {
        self.strategy().response_repair()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, KEY, TIMESTAMP_MS};
    use bitex_core::nonce::Nonce;
    use bitex_core::request::HttpMethod;
    use bitex_core::signed_request::RequestBody;
    use std::collections::BTreeMap;

    /// Satisfies every strategy: all identity fields set, and a secret that is
    /// also valid base64.
    fn full_credentials() -> CredentialSet {
        CredentialSet::new(KEY, "c2hhZG93")
            .with(CredentialField::UserId, "leeroy")
            .with(CredentialField::ClientId, "jenkins")
            .with(CredentialField::Passphrase, "hunter2")
    }

    fn sign_at(signer: Signer, nonce: u64) -> SignedRequest {
        let descriptor = fixture::descriptor(&signer, HttpMethod::Post);
        signer
            .sign(
                &signer.default_api(),
                &descriptor,
                &full_credentials(),
                &SigningContext::at(Nonce::new(nonce), TIMESTAMP_MS),
            )
            .unwrap()
    }

    #[test]
    fn test_every_name_resolves() {
        assert_eq!(Signer::ALL.len(), 22);
        for signer in Signer::ALL {
            assert_eq!(Signer::from_name(signer.exchange()), Some(*signer));
        }
        assert_eq!(Signer::from_name("gateio"), Some(Signer::Gateio(GateioSigner)));
        assert_eq!(
            Signer::from_name("rocktrading"),
            Some(Signer::RockTrading(RockTradingSigner))
        );
        assert!("mtgox".parse::<Signer>().unwrap_err().is_invalid_request());
    }

    #[test]
    fn test_signing_is_deterministic() {
        for signer in Signer::ALL {
            let a = sign_at(*signer, 100);
            let b = sign_at(*signer, 100);
            assert_eq!(a.url(), b.url(), "{}", signer.exchange());
            assert_eq!(a.headers(), b.headers(), "{}", signer.exchange());
            assert_eq!(a.body(), b.body(), "{}", signer.exchange());
        }
    }

    /// Field names that may legitimately change with the nonce.
    fn is_nonce_dependent(name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        ["nonce", "sign", "payload", "auth"].iter().any(|part| name.contains(part))
    }

    fn query_pairs(query: &str) -> BTreeMap<String, String> {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key.to_string(), value.to_string())
            })
            .collect()
    }

    fn json_fields(text: &str) -> Option<BTreeMap<String, String>> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text).ok()?;
        Some(object.into_iter().map(|(k, v)| (k, v.to_string())).collect())
    }

    fn header_fields(request: &SignedRequest) -> BTreeMap<String, String> {
        request
            .headers()
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_string(), value.to_str().unwrap().to_string())
            })
            .collect()
    }

    /// Same field names on both sides; values differ only under nonce-dependent names.
    fn assert_only_nonce_fields_differ(
        exchange: &str,
        what: &str,
        a: &BTreeMap<String, String>,
        b: &BTreeMap<String, String>,
    ) {
        assert_eq!(
            a.keys().collect::<Vec<_>>(),
            b.keys().collect::<Vec<_>>(),
            "{exchange}: {what} fields"
        );
        for (name, value) in a {
            if b[name] != *value {
                assert!(
                    is_nonce_dependent(name),
                    "{exchange}: {what} '{name}' changed with the nonce"
                );
            }
        }
    }

    #[test]
    fn test_nonce_changes_only_nonce_dependent_fields() {
        // HitBTC and the MD5 scheme send no nonce; GDAX signs the timestamp instead.
        for signer in Signer::ALL.iter().filter(|s| {
            !matches!(
                s,
                Signer::HitBtc(_) | Signer::Gdax(_) | Signer::Okex(_) | Signer::Okcoin(_)
            )
        })
        {
            let exchange = signer.exchange();
            let a = sign_at(*signer, 100);
            let b = sign_at(*signer, 101);
            assert_eq!(a.method(), b.method(), "{exchange}");

            let (path_a, query_a) = a.url().split_once('?').unwrap_or((a.url(), ""));
            let (path_b, query_b) = b.url().split_once('?').unwrap_or((b.url(), ""));
            assert_eq!(path_a, path_b, "{exchange}: endpoint path");
            assert_only_nonce_fields_differ(
                exchange,
                "query",
                &query_pairs(query_a),
                &query_pairs(query_b),
            );

            let headers_a = header_fields(&a);
            let headers_b = header_fields(&b);
            assert_only_nonce_fields_differ(exchange, "header", &headers_a, &headers_b);
            assert_eq!(headers_a.get("content-type"), headers_b.get("content-type"), "{exchange}");

            match (a.body(), b.body()) {
                (RequestBody::Form(x), RequestBody::Form(y)) => {
                    let (x, y) = (query_pairs(x), query_pairs(y));
                    assert_only_nonce_fields_differ(exchange, "form", &x, &y);
                }
                (RequestBody::Json(x), RequestBody::Json(y)) => {
                    match (json_fields(x), json_fields(y)) {
                        (Some(x), Some(y)) => {
                            assert_only_nonce_fields_differ(exchange, "json", &x, &y);
                        }
                        // An opaque body must repeat one of the nonce-dependent headers.
                        _ if x != y => assert!(
                            headers_a
                                .iter()
                                .any(|(name, value)| value == x && is_nonce_dependent(name)),
                            "{exchange}: opaque body changed with the nonce"
                        ),
                        _ => {}
                    }
                }
                (x, y) => assert_eq!(x, y, "{exchange}: body"),
            }

            assert!(
                a.url() != b.url() || headers_a != headers_b || a.body() != b.body(),
                "{exchange} ignored the nonce"
            );
        }
    }

    #[test]
    fn test_unsigned_requests_carry_no_credentials() {
        for signer in Signer::ALL {
            let descriptor = RequestDescriptor::builder("ticker")
                .param("pair", "btcusd")
                .build(&signer.rules())
                .unwrap();
            let request = signer.unsigned(&signer.default_api(), &descriptor);

            assert!(request.headers().is_empty(), "{}", signer.exchange());
            assert!(request.basic_auth().is_none(), "{}", signer.exchange());
            assert!(!request.url().contains(KEY), "{}", signer.exchange());
            assert!(request.body().is_empty(), "{}", signer.exchange());
        }
    }

    #[test]
    fn test_delegates_strategy_settings() {
        let exmo = Signer::from_name("exmo").unwrap();
        assert_eq!(exmo.nonce_kind(), NonceKind::Milliseconds);

        let bitstamp = Signer::from_name("Bitstamp").unwrap();
        assert_eq!(bitstamp.required_fields(), &[CredentialField::UserId]);

        let cryptopia = Signer::from_name("Cryptopia").unwrap();
        assert!(cryptopia.response_repair().is_some());
    }

    proptest::proptest! {
        #[test]
        fn prop_lookup_ignores_case_and_punctuation(
            index in 0..Signer::ALL.len(),
            upper in proptest::collection::vec(proptest::bool::ANY, 32),
            sep in "[ ._-]?",
        ) {
            let signer = Signer::ALL[index];
            let mangled: String = signer
                .exchange()
                .chars()
                .zip(upper.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect::<String>()
                + &sep;
            proptest::prop_assert_eq!(Signer::from_name(&mangled), Some(signer));
        }
    }
}
