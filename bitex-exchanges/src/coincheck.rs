//! Coincheck request signing: HMAC-SHA256 (hex) of `nonce + url`, where the
//! url includes the query string.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::RequestDescriptor;
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};

/// Coincheck signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoincheckSigner;

impl SigningStrategy for CoincheckSigner {
    fn exchange(&self) -> &'static str {
        "Coincheck"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://coincheck.com", Some("api"))
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

        let nonce = ctx.nonce.to_string();
        let request = SignedRequest::unsigned(api, descriptor);
        let signature = hmac_sign(
            format!("{nonce}{}", request.url()),
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha256,
            DigestFormat::Hex,
        )?;

        request
            .with_header("ACCESS-NONCE", &nonce)?
            .with_header("ACCESS-KEY", key.expose_secret())?
            .with_header("ACCESS-SIGNATURE", &signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, KEY, NONCE, SECRET};
    use bitex_core::request::HttpMethod;

    #[test]
    fn test_golden_signature() {
        let request = fixture::sign(&CoincheckSigner, HttpMethod::Get, &fixture::credentials());

        let message = "100https://coincheck.com/api/testing/signature?param_1=abc";
        let signature = hex::encode(fixture::hmac_sha256(SECRET.as_bytes(), message.as_bytes()));

        assert_eq!(request.url(), "https://coincheck.com/api/testing/signature?param_1=abc");
        assert_eq!(request.header("ACCESS-NONCE"), Some(NONCE));
        assert_eq!(request.header("ACCESS-KEY"), Some(KEY));
        assert_eq!(request.header("ACCESS-SIGNATURE"), Some(signature.as_str()));
    }
}
