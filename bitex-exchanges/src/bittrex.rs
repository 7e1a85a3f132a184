//! Bittrex request signing.
//!
//! Key and nonce are prepended to the query string, and the complete URL is
//! signed with HMAC-SHA512 (hex) into the `apisign` header.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, Params, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};

/// Bittrex signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BittrexSigner;

impl SigningStrategy for BittrexSigner {
    fn exchange(&self) -> &'static str {
        "Bittrex"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://bittrex.com/api", Some("v1.1"))
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

        let request = SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_query(&query.urlencode());
        let signature = hmac_sign(
            request.url(),
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha512,
            DigestFormat::Hex,
        )?;
        request.with_header("apisign", &signature)
    }
}
