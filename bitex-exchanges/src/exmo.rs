//! Exmo request signing: the form body `params&nonce=<ms>` is signed with
//! HMAC-SHA512 (hex) into `Sign`.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::nonce::NonceKind;
use bitex_core::request::RequestDescriptor;
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Exmo signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExmoSigner;

impl SigningStrategy for ExmoSigner {
    fn exchange(&self) -> &'static str {
        "Exmo"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.exmo.com", None)
    }

    fn nonce_kind(&self) -> NonceKind {
        NonceKind::Milliseconds
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        form_signed(api, descriptor, credentials, ctx, ("Key", "Sign"))
    }
}

/// Form body with a trailing nonce, HMAC-SHA512 (hex) over the encoded body.
///
/// `headers` names the key and signature headers.
pub(crate) fn form_signed(
    api: &ApiSettings,
    descriptor: &RequestDescriptor,
    credentials: &CredentialSet,
    ctx: &SigningContext,
    headers: (&'static str, &'static str),
) -> Result<SignedRequest> {
    let key = credentials.require(CredentialField::Key)?;
    let secret = credentials.require(CredentialField::Secret)?;

    let body = descriptor
        .params()
        .clone()
        .with("nonce", ctx.nonce.to_string())
        .urlencode();
    let signature = hmac_sign(
        &body,
        secret.expose_secret_bytes(),
        HashAlgorithm::Sha512,
        DigestFormat::Hex,
    )?;

    Ok(
        SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_header(headers.0, key.expose_secret())?
            .with_header(headers.1, &signature)?
            .with_body(RequestBody::Form(body)),
    )
}
