//! OKEx authentication.
//!
//! OKEx and OKCoin share one scheme: `api_key` joins the parameters, the
//! sorted `k=v` string gets `&secret_key=<secret>` appended, and its MD5 in
//! upper-case hex becomes the `sign` parameter. POST sends everything as a
//! form body, GET as the query string.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hash};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Descriptor rules of the MD5 scheme.
pub(crate) const MD5_RULES: SigningRules =
    SigningRules::new(ParamOrdering::Sorted, &["api_key", "sign"]);

/// OKEx signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OkexSigner;

impl SigningStrategy for OkexSigner {
    fn exchange(&self) -> &'static str {
        "OKEx"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://www.okex.com/api", Some("v1"))
    }

    fn rules(&self) -> SigningRules {
        MD5_RULES
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        _ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        md5_signed(api, descriptor, credentials)
    }
}

/// Signs `descriptor` with the sorted-parameter MD5 scheme.
pub(crate) fn md5_signed(
    api: &ApiSettings,
    descriptor: &RequestDescriptor,
    credentials: &CredentialSet,
) -> Result<SignedRequest> {
    let key = credentials.require(CredentialField::Key)?;
    let secret = credentials.require(CredentialField::Secret)?;

    let params = descriptor
        .params()
        .clone()
        .with("api_key", key.expose_secret())
        .sorted();
    let sign = hash(
        format!("{}&secret_key={}", params.raw_query(), secret.expose_secret()),
        HashAlgorithm::Md5,
        DigestFormat::UpperHex,
    );
    let params = params.with("sign", sign);

    let request = SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()));
    Ok(if descriptor.method().has_body() {
        request.with_body(RequestBody::Form(params.urlencode()))
    } else {
        request.with_query(&params.urlencode())
    })
}
