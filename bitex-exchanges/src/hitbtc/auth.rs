//! HitBTC authentication (API v2): HTTP basic auth with the key as user name
//! and the secret as password. No nonce is sent.

use bitex_core::Result;
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::RequestDescriptor;
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// HitBTC signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitBtcSigner;

impl SigningStrategy for HitBtcSigner {
    fn exchange(&self) -> &'static str {
        "HitBTC"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.hitbtc.com/api", Some("2"))
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        _ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let key = credentials.require(CredentialField::Key)?;
        let secret = credentials.require(CredentialField::Secret)?;

        let request = SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_basic_auth(key, secret);
        let params = descriptor.params().urlencode();
        Ok(if descriptor.method().has_body() {
            request.with_body(RequestBody::Form(params))
        } else {
            request.with_query(&params)
        })
    }
}
