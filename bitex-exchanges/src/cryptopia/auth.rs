//! Cryptopia request signing.
//!
//! Every private call is a POST with a JSON body. The signed string is
//! `key + "POST" + lower(url-encoded url) + nonce + base64(md5(body))`; the
//! HMAC-SHA256 key is the base64-decoded secret, whose padding is optional.

use bitex_core::Result;
use bitex_core::auth::{
    DigestFormat, HashAlgorithm, decode_base64_secret, encode_bytes, hash, hmac_raw,
};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::envelope::{RepairFn, strip_utf8_bom};
use bitex_core::request::{HttpMethod, RequestDescriptor};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Cryptopia signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CryptopiaSigner;

impl SigningStrategy for CryptopiaSigner {
    fn exchange(&self) -> &'static str {
        "Cryptopia"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://www.cryptopia.co.nz/Api", None)
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let key = credentials.require(CredentialField::Key)?.expose_secret();
        let secret =
            decode_base64_secret(credentials.require(CredentialField::Secret)?.expose_secret())?;

        let url = api.url(descriptor.endpoint());
        let body = descriptor.params().to_json_spaced();
        let content_md5 = hash(&body, HashAlgorithm::Md5, DigestFormat::Base64);
        let nonce = ctx.nonce.to_string();
        let message = format!(
            "{key}POST{}{nonce}{content_md5}",
            urlencoding::encode(&url).to_lowercase()
        );
        let signature = encode_bytes(
            &hmac_raw(message.as_bytes(), &secret, HashAlgorithm::Sha256)?,
            DigestFormat::Base64,
        );

        Ok(SignedRequest::new(HttpMethod::Post, url)
            .with_header("Authorization", &format!("amx {key}:{signature}:{nonce}"))?
            .with_header("Content-Type", "application/json; charset=utf-8")?
            .with_body(RequestBody::Json(body)))
    }

    /// Cryptopia prefixes some bodies with a UTF-8 byte-order mark.
    fn response_repair(&self) -> Option<RepairFn> {
        Some(strip_utf8_bom)
    }
}
