//! itBit request signing.
//!
//! The message is the compact JSON array `[method, url, body, nonce, timestamp]`
//! prefixed with the nonce and hashed with SHA-256; the url bytes followed by
//! that digest are signed with HMAC-SHA512 and sent base64-encoded as
//! `Authorization: <user_id>:<signature>`. Bodies are JSON for POST and PUT
//! and empty otherwise, with GET and DELETE parameters in the query string.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, encode_bytes, hash_raw, hmac_raw};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::RequestDescriptor;
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// itBit signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItbitSigner;

impl SigningStrategy for ItbitSigner {
    fn exchange(&self) -> &'static str {
        "itBit"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.itbit.com", Some("v1"))
    }

    fn required_fields(&self) -> &'static [CredentialField] {
        &[CredentialField::UserId]
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let secret = credentials.require(CredentialField::Secret)?;
        let user_id = credentials.require(CredentialField::UserId)?;

        let method = descriptor.method();
        let (request, body) = if method.has_body() {
            let body = descriptor.params().to_json_spaced();
            let request = SignedRequest::new(method, api.url(descriptor.endpoint()))
                .with_body(RequestBody::Json(body.clone()));
            (request, body)
        } else {
            (SignedRequest::unsigned(api, descriptor), String::new())
        };

        let nonce = ctx.nonce.to_string();
        let timestamp = ctx.timestamp_ms.to_string();
        let message = serde_json::to_string(&[
            method.as_str(),
            request.url(),
            body.as_str(),
            nonce.as_str(),
            timestamp.as_str(),
        ])?;
        let mut signed = request.url().as_bytes().to_vec();
        signed.extend(hash_raw(format!("{nonce}{message}").as_bytes(), HashAlgorithm::Sha256));
        let signature = encode_bytes(
            &hmac_raw(&signed, secret.expose_secret_bytes(), HashAlgorithm::Sha512)?,
            DigestFormat::Base64,
        );

        request
            .with_header("Authorization", &format!("{}:{signature}", user_id.expose_secret()))?
            .with_header("X-Auth-Timestamp", &timestamp)?
            .with_header("X-Auth-Nonce", &nonce)?
            .with_header("Content-Type", "application/json")
    }
}
