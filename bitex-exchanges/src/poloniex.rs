//! Poloniex request signing.
//!
//! Private calls all go to `/tradingApi` with the endpoint as the `command`
//! form field; public calls go to `/public?command=<endpoint>`.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{HttpMethod, ParamOrdering, Params, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Poloniex signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoloniexSigner;

impl SigningStrategy for PoloniexSigner {
    fn exchange(&self) -> &'static str {
        "Poloniex"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://poloniex.com", None)
    }

    fn rules(&self) -> SigningRules {
        SigningRules::new(ParamOrdering::Preserve, &["nonce", "command"])
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let key = credentials.require(CredentialField::Key)?;
        let secret = credentials.require(CredentialField::Secret)?;

        let body = descriptor
            .params()
            .clone()
            .with("nonce", ctx.nonce.to_string())
            .with("command", descriptor.endpoint())
            .urlencode();
        let signature = hmac_sign(
            &body,
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha512,
            DigestFormat::Hex,
        )?;

        Ok(SignedRequest::new(HttpMethod::Post, format!("{}/tradingApi", api.address))
            .with_header("Key", key.expose_secret())?
            .with_header("Sign", &signature)?
            .with_body(RequestBody::Form(body)))
    }

    fn unsigned(&self, api: &ApiSettings, descriptor: &RequestDescriptor) -> SignedRequest {
        let mut query = Params::new().with("command", descriptor.endpoint());
        query.extend(descriptor.params().iter());
        SignedRequest::new(HttpMethod::Get, format!("{}/public", api.address))
            .with_query(&query.urlencode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, KEY, SECRET};

    #[test]
    fn test_golden_signature() {
        let request = fixture::sign(&PoloniexSigner, HttpMethod::Post, &fixture::credentials());

        let body = "param_1=abc&nonce=100&command=testing%2Fsignature";
        let signature = hex::encode(fixture::hmac_sha512(SECRET.as_bytes(), body.as_bytes()));

        assert_eq!(request.url(), "https://poloniex.com/tradingApi");
        assert_eq!(request.header("Key"), Some(KEY));
        assert_eq!(request.header("Sign"), Some(signature.as_str()));
        assert_eq!(request.body(), &RequestBody::Form(body.to_string()));
    }

    #[test]
    fn test_public_command() {
        let descriptor = RequestDescriptor::builder("returnTicker")
            .build(&PoloniexSigner.rules())
            .unwrap();
        let request = PoloniexSigner.unsigned(&PoloniexSigner.default_api(), &descriptor);
        assert_eq!(request.url(), "https://poloniex.com/public?command=returnTicker");
    }
}
