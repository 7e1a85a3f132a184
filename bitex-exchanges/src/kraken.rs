//! Kraken request signing.
//!
//! `API-Sign` is the base64 HMAC-SHA512, keyed with the base64-decoded secret,
//! of `uri_path + SHA256(nonce + postdata)`. The nonce is the first field of
//! the form body.

use bitex_core::Result;
use bitex_core::auth::{
    DigestFormat, HashAlgorithm, decode_base64_secret, encode_bytes, hash_raw, hmac_raw,
};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{HttpMethod, Params, RequestDescriptor};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Kraken signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KrakenSigner;

impl SigningStrategy for KrakenSigner {
    fn exchange(&self) -> &'static str {
        "Kraken"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.kraken.com", Some("0"))
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let key = credentials.require(CredentialField::Key)?;
        let secret =
            decode_base64_secret(credentials.require(CredentialField::Secret)?.expose_secret())?;

        let nonce = ctx.nonce.to_string();
        let mut postdata = Params::new().with("nonce", nonce.as_str());
        postdata.extend(descriptor.params().iter());
        let postdata = postdata.urlencode();

        let uri = api.uri(descriptor.endpoint());
        let mut message = uri.into_bytes();
        message.extend(hash_raw(format!("{nonce}{postdata}").as_bytes(), HashAlgorithm::Sha256));
        let signature = encode_bytes(
            &hmac_raw(&message, &secret, HashAlgorithm::Sha512)?,
            DigestFormat::Base64,
        );

        Ok(SignedRequest::new(HttpMethod::Post, api.url(descriptor.endpoint()))
            .with_header("API-Key", key.expose_secret())?
            .with_header("API-Sign", &signature)?
            .with_body(RequestBody::Form(postdata)))
    }
}
