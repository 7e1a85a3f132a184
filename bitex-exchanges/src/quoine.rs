//! Quoine request signing with an HS256 JWT in `X-Quoine-Auth`.
//!
//! Quoine versions its API through the `X-Quoine-API-Version` header, so the
//! configured version never appears in the URL.

use bitex_core::Result;
use bitex_core::auth::jwt_sign;
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{Params, RequestDescriptor};
use bitex_core::signed_request::{
    RequestBody, SignedRequest, SigningContext, SigningStrategy, append_query,
};

/// Quoine signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoineSigner;

impl QuoineSigner {
    fn path(descriptor: &RequestDescriptor) -> String {
        let path = format!("/{}", descriptor.endpoint());
        if descriptor.method().has_body() {
            path
        } else {
            append_query(&path, &descriptor.params().urlencode())
        }
    }
}

impl SigningStrategy for QuoineSigner {
    fn exchange(&self) -> &'static str {
        "Quoine"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.quoine.com", Some("2"))
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

        let path = Self::path(descriptor);
        let claims = Params::new()
            .with("path", path.as_str())
            .with("nonce", ctx.nonce.to_string())
            .with("token_id", key.expose_secret());
        let token = jwt_sign(&claims, secret.expose_secret_bytes())?;

        let mut request = SignedRequest::new(descriptor.method(), format!("{}{path}", api.address))
            .with_header("X-Quoine-Auth", &token)?
            .with_header("X-Quoine-API-Version", api.version.as_deref().unwrap_or("2"))?;
        if descriptor.method().has_body() {
            request = request.with_body(RequestBody::Json(descriptor.params().to_json_spaced()));
        }
        Ok(request)
    }

    fn unsigned(&self, api: &ApiSettings, descriptor: &RequestDescriptor) -> SignedRequest {
        SignedRequest::new(
            descriptor.method(),
            format!("{}{}", api.address, Self::path(descriptor)),
        )
    }
}
