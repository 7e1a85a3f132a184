//! Coinone authentication (API v2).
//!
//! The request parameters, `access_token` and `nonce` are serialized to JSON
//! and base64-encoded; that payload is both the body and the
//! `X-COINONE-PAYLOAD` header. The signature is HMAC-SHA512 (hex) of the
//! payload keyed with the upper-cased secret.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, base64_encode, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, Params, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Coinone signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoinoneSigner;

impl SigningStrategy for CoinoneSigner {
    fn exchange(&self) -> &'static str {
        "Coinone"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.coinone.co.kr", None)
    }

    fn rules(&self) -> SigningRules {
        SigningRules::new(ParamOrdering::Preserve, &["nonce", "access_token"])
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

        let mut payload = Params::new()
            .with("access_token", key.expose_secret())
            .with("nonce", ctx.nonce.to_string());
        payload.extend(descriptor.params().iter());
        let payload = base64_encode(payload.to_json_spaced());
        let signature = hmac_sign(
            &payload,
            secret.expose_secret().to_uppercase(),
            HashAlgorithm::Sha512,
            DigestFormat::Hex,
        )?;

        // Coinone expects the base64 payload under a JSON content type.
        Ok(SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_header("X-COINONE-PAYLOAD", &payload)?
            .with_header("X-COINONE-SIGNATURE", &signature)?
            .with_body(RequestBody::Json(payload)))
    }
}
