//! Bithumb request signing.
//!
//! The signed message is `/endpoint NUL urlencoded-body NUL nonce`, where the
//! body repeats the endpoint as its first field. The HMAC-SHA512 hex digest is
//! base64-encoded once more before it goes into `Api-Sign`.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, base64_encode, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::nonce::NonceKind;
use bitex_core::request::{ParamOrdering, Params, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Bithumb signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BithumbSigner;

impl SigningStrategy for BithumbSigner {
    fn exchange(&self) -> &'static str {
        "Bithumb"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.bithumb.com", None)
    }

    fn nonce_kind(&self) -> NonceKind {
        NonceKind::Milliseconds
    }

    fn rules(&self) -> SigningRules {
        SigningRules::new(ParamOrdering::Preserve, &["endpoint"])
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

        let path = format!("/{}", descriptor.endpoint());
        let mut body = Params::new().with("endpoint", path.as_str());
        body.extend(descriptor.params().iter());
        let body = body.urlencode();

        let nonce = ctx.nonce.to_string();
        let message = format!("{path}\0{body}\0{nonce}");
        let digest = hmac_sign(
            message,
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha512,
            DigestFormat::Hex,
        )?;

        Ok(
            SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
                .with_header("Api-Key", key.expose_secret())?
                .with_header("Api-Sign", &base64_encode(digest))?
                .with_header("Api-Nonce", &nonce)?
                .with_body(RequestBody::Form(body)),
        )
    }
}
