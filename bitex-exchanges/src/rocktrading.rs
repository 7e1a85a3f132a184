//! The Rock Trading request signing: HMAC-SHA512 (hex) of `nonce + url`.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::RequestDescriptor;
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// The Rock Trading signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RockTradingSigner;

impl SigningStrategy for RockTradingSigner {
    fn exchange(&self) -> &'static str {
        "The Rock Trading"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.therocktrading.com", Some("v1"))
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

        let request = if descriptor.method().has_body() {
            SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
                .with_body(RequestBody::Json(descriptor.params().to_json_spaced()))
        } else {
            SignedRequest::unsigned(api, descriptor)
        };

        let nonce = ctx.nonce.to_string();
        let signature = hmac_sign(
            format!("{nonce}{}", request.url()),
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha512,
            DigestFormat::Hex,
        )?;

        request
            .with_header("X-TRT-KEY", key.expose_secret())?
            .with_header("X-TRT-NONCE", &nonce)?
            .with_header("X-TRT-SIGN", &signature)
    }
}
