//! Vaultoro request signing.
//!
//! Private endpoints live under `/1/`; the full URL, with `apikey` and
//! `nonce` leading the query, is signed with HMAC-SHA256 (hex).

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, Params, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};

/// Vaultoro signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VaultoroSigner;

impl SigningStrategy for VaultoroSigner {
    fn exchange(&self) -> &'static str {
        "Vaultoro"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.vaultoro.com", None)
    }

    fn rules(&self) -> SigningRules {
        SigningRules::new(ParamOrdering::Preserve, &["nonce", "apikey"])
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

        let mut query = Params::new()
            .with("apikey", key.expose_secret())
            .with("nonce", ctx.nonce.to_string());
        query.extend(descriptor.params().iter());
        let url = format!("{}/1/{}?{}", api.address, descriptor.endpoint(), query.urlencode());
        let signature = hmac_sign(
            &url,
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha256,
            DigestFormat::Hex,
        )?;

        SignedRequest::new(descriptor.method(), url).with_header("X-Signature", &signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, SECRET};
    use bitex_core::request::HttpMethod;

    #[test]
    fn test_golden_signature() {
        let request = fixture::sign(&VaultoroSigner, HttpMethod::Get, &fixture::credentials());

        let url = "https://api.vaultoro.com/1/testing/signature?apikey=panda&nonce=100&param_1=abc";
        let signature = hex::encode(fixture::hmac_sha256(SECRET.as_bytes(), url.as_bytes()));

        assert_eq!(request.url(), url);
        assert_eq!(request.header("X-Signature"), Some(signature.as_str()));
    }

    #[test]
    fn test_public_url_has_no_prefix() {
        let descriptor =
            RequestDescriptor::builder("markets").build(&VaultoroSigner.rules()).unwrap();
        let request = VaultoroSigner.unsigned(&VaultoroSigner.default_api(), &descriptor);
        assert_eq!(request.url(), "https://api.vaultoro.com/markets");
    }
}
