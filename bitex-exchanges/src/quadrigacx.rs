//! QuadrigaCX request signing: HMAC-SHA256 (hex) of `nonce + client_id + key`,
//! injected into the JSON body next to the nonce and key.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// QuadrigaCX signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadrigaCxSigner;

impl SigningStrategy for QuadrigaCxSigner {
    fn exchange(&self) -> &'static str {
        "QuadrigaCX"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.quadrigacx.com", Some("v2"))
    }

    fn required_fields(&self) -> &'static [CredentialField] {
        &[CredentialField::ClientId]
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
        let client_id = credentials.require(CredentialField::ClientId)?.expose_secret();

        let nonce = ctx.nonce.to_string();
        let signature = hmac_sign(
            format!("{nonce}{client_id}{key}"),
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha256,
            DigestFormat::Hex,
        )?;
        let body = descriptor
            .params()
            .clone()
            .with("nonce", nonce)
            .with("key", key)
            .with("signature", signature);

        Ok(SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_body(RequestBody::Json(body.to_json_spaced())))
    }
}
