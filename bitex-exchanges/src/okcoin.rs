//! OKCoin request signing. Same sorted-parameter MD5 scheme as OKEx.

use crate::okex::auth::{MD5_RULES, md5_signed};
use bitex_core::Result;
use bitex_core::config::ApiSettings;
use bitex_core::credentials::CredentialSet;
use bitex_core::request::{RequestDescriptor, SigningRules};
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};

/// OKCoin signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OkcoinSigner;

impl SigningStrategy for OkcoinSigner {
    fn exchange(&self) -> &'static str {
        "OKCoin"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://www.okcoin.com/api", Some("v1"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;
    use bitex_core::request::HttpMethod;

    #[test]
    fn test_golden_signature() {
        let request = fixture::sign(&OkcoinSigner, HttpMethod::Post, &fixture::credentials());
        assert_eq!(request.url(), "https://www.okcoin.com/api/v1/testing/signature");

        let body = request.body().as_text().unwrap();
        assert!(body.contains("api_key=panda"));
        assert!(body.contains("param_1=abc"));
        assert!(body.contains("&sign="));
    }
}
