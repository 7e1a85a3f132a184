//! Bitstamp authentication.
//!
//! The signature is HMAC-SHA256 of `nonce + user_id + key`, upper-case hex.
//! It travels in the form body next to `key` and `nonce`.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Bitstamp signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitstampSigner;

impl SigningStrategy for BitstampSigner {
    fn exchange(&self) -> &'static str {
        "Bitstamp"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://www.bitstamp.net/api", Some("v2"))
    }

    fn required_fields(&self) -> &'static [CredentialField] {
        &[CredentialField::UserId]
    }

    fn rules(&self) -> SigningRules {
        SigningRules::new(ParamOrdering::Preserve, &["nonce", "key", "signature"])
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let key = credentials.require(CredentialField::Key)?.expose_secret();
        let secret = credentials.require(CredentialField::Secret)?;
        let user_id = credentials.require(CredentialField::UserId)?.expose_secret();

        let nonce = ctx.nonce.to_string();
        let signature = hmac_sign(
            format!("{nonce}{user_id}{key}"),
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha256,
            DigestFormat::UpperHex,
        )?;
        let body = descriptor
            .params()
            .clone()
            .with("key", key)
            .with("signature", signature)
            .with("nonce", nonce);

        Ok(SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_body(RequestBody::Form(body.urlencode())))
    }
}
