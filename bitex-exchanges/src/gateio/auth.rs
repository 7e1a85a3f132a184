//! Gate.io request signing: the form body with a trailing nonce is signed with
//! HMAC-SHA512 (hex) into the `SIGN` header.

use crate::exmo::form_signed;
use bitex_core::Result;
use bitex_core::config::ApiSettings;
use bitex_core::credentials::CredentialSet;
use bitex_core::request::RequestDescriptor;
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};

/// Gate.io signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateioSigner;

impl SigningStrategy for GateioSigner {
    fn exchange(&self) -> &'static str {
        "Gate.io"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.gateio.io/api2", Some("1"))
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        form_signed(api, descriptor, credentials, ctx, ("KEY", "SIGN"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, KEY, SECRET};
    use bitex_core::request::HttpMethod;
    use bitex_core::signed_request::RequestBody;

    #[test]
    fn test_golden_signature() {
        let request = fixture::sign(&GateioSigner, HttpMethod::Post, &fixture::credentials());

        let body = "param_1=abc&nonce=100";
        let signature = hex::encode(fixture::hmac_sha512(SECRET.as_bytes(), body.as_bytes()));

        assert_eq!(request.url(), "https://api.gateio.io/api2/1/testing/signature");
        assert_eq!(request.header("KEY"), Some(KEY));
        assert_eq!(request.header("SIGN"), Some(signature.as_str()));
        assert_eq!(request.body(), &RequestBody::Form(body.to_string()));
    }
}
