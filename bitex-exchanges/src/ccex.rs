//! C-CEX request signing.
//!
//! Every call goes through one script: private calls to `api.html`, public ones
//! to `api_pub.html`, with the endpoint passed as the `a` query parameter.
//! Private URLs are signed with HMAC-SHA512 (hex) into `apisign`.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, Params, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};

/// C-CEX signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CcexSigner;

impl SigningStrategy for CcexSigner {
    fn exchange(&self) -> &'static str {
        "C-CEX"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://c-cex.com/t", None)
    }

    fn rules(&self) -> SigningRules {
        SigningRules::new(ParamOrdering::Preserve, &["nonce", "apikey", "a"])
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

        let mut query = Params::new()
            .with("a", descriptor.endpoint())
            .with("apikey", key.expose_secret())
            .with("nonce", ctx.nonce.to_string());
        query.extend(descriptor.params().iter());

        let request = SignedRequest::new(descriptor.method(), format!("{}/api.html", api.address))
            .with_query(&query.urlencode());
        let signature = hmac_sign(
            request.url(),
            secret.expose_secret_bytes(),
            HashAlgorithm::Sha512,
            DigestFormat::Hex,
        )?;
        request.with_header("apisign", &signature)
    }

    fn unsigned(&self, api: &ApiSettings, descriptor: &RequestDescriptor) -> SignedRequest {
        let mut query = Params::new().with("a", descriptor.endpoint());
        query.extend(descriptor.params().iter());
        SignedRequest::new(descriptor.method(), format!("{}/api_pub.html", api.address))
            .with_query(&query.urlencode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, SECRET};
    use bitex_core::request::HttpMethod;

    #[test]
    fn test_golden_signature() {
        let request = fixture::sign(&CcexSigner, HttpMethod::Get, &fixture::credentials());

        let url = "https://c-cex.com/t/api.html?a=testing%2Fsignature&apikey=panda&nonce=100&param_1=abc";
        let signature = hex::encode(fixture::hmac_sha512(SECRET.as_bytes(), url.as_bytes()));

        assert_eq!(request.url(), url);
        assert_eq!(request.header("apisign"), Some(signature.as_str()));
    }

    #[test]
    fn test_public_call_uses_public_script() {
        let descriptor = RequestDescriptor::builder("getmarkets")
            .build(&CcexSigner.rules())
            .unwrap();
        let request = CcexSigner.unsigned(&CcexSigner.default_api(), &descriptor);
        assert_eq!(request.url(), "https://c-cex.com/t/api_pub.html?a=getmarkets");
        assert!(request.headers().is_empty());
    }
}
