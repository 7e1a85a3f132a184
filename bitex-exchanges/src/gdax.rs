//! GDAX request signing.
//!
//! The prehash string is `timestamp + METHOD + request path + body`, signed
//! with HMAC-SHA256 under the base64-decoded secret and sent base64-encoded.
//! The request path includes the query string for GET and DELETE calls; POST
//! and PUT carry the parameters as a JSON body. A passphrase is required.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, decode_base64_secret, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::RequestDescriptor;
use bitex_core::signed_request::{
    RequestBody, SignedRequest, SigningContext, SigningStrategy, append_query,
};

/// GDAX signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GdaxSigner;

impl SigningStrategy for GdaxSigner {
    fn exchange(&self) -> &'static str {
        "GDAX"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.gdax.com", None)
    }

    fn required_fields(&self) -> &'static [CredentialField] {
        &[CredentialField::Passphrase]
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let key = credentials.require(CredentialField::Key)?;
        let secret =
            decode_base64_secret(credentials.require(CredentialField::Secret)?.expose_secret())?;
        let passphrase = credentials.require(CredentialField::Passphrase)?;

        let method = descriptor.method();
        let (path, body) = if method.has_body() {
            (
                api.uri(descriptor.endpoint()),
                RequestBody::Json(descriptor.params().to_json_spaced()),
            )
        } else {
            (
                append_query(&api.uri(descriptor.endpoint()), &descriptor.params().urlencode()),
                RequestBody::Empty,
            )
        };

        let timestamp = (ctx.timestamp_ms / 1000).to_string();
        let message = format!(
            "{timestamp}{}{path}{}",
            method.as_str(),
            body.as_text().unwrap_or_default()
        );
        let signature = hmac_sign(message, &secret, HashAlgorithm::Sha256, DigestFormat::Base64)?;

        Ok(SignedRequest::new(method, format!("{}{path}", api.address))
            .with_header("CB-ACCESS-KEY", key.expose_secret())?
            .with_header("CB-ACCESS-SIGN", &signature)?
            .with_header("CB-ACCESS-TIMESTAMP", &timestamp)?
            .with_header("CB-ACCESS-PASSPHRASE", passphrase.expose_secret())?
            .with_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, KEY};
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD_NO_PAD;
    use bitex_core::request::HttpMethod;

    fn credentials() -> CredentialSet {
        fixture::credentials_with(CredentialField::Passphrase, "woloho")
    }

    #[test]
    fn test_golden_signature_post() {
        let request = fixture::sign(&GdaxSigner, HttpMethod::Post, &credentials());

        let secret = STANDARD_NO_PAD.decode("shadow").unwrap();
        let message = r#"1POST/testing/signature{"param_1": "abc"}"#;
        let signature = fixture::b64(fixture::hmac_sha256(&secret, message.as_bytes()));

        assert_eq!(request.url(), "https://api.gdax.com/testing/signature");
        assert_eq!(request.header("CB-ACCESS-KEY"), Some(KEY));
        assert_eq!(request.header("CB-ACCESS-SIGN"), Some(signature.as_str()));
        assert_eq!(request.header("CB-ACCESS-TIMESTAMP"), Some("1"));
        assert_eq!(request.header("CB-ACCESS-PASSPHRASE"), Some("woloho"));
        assert_eq!(request.body(), &RequestBody::Json(r#"{"param_1": "abc"}"#.to_string()));
    }

    #[test]
    fn test_get_signs_query_in_path() {
        let request = fixture::sign(&GdaxSigner, HttpMethod::Get, &credentials());

        let secret = STANDARD_NO_PAD.decode("shadow").unwrap();
        let message = "1GET/testing/signature?param_1=abc";
        let signature = fixture::b64(fixture::hmac_sha256(&secret, message.as_bytes()));

        assert_eq!(request.url(), "https://api.gdax.com/testing/signature?param_1=abc");
        assert_eq!(request.header("CB-ACCESS-SIGN"), Some(signature.as_str()));
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_passphrase_is_required() {
        assert_eq!(GdaxSigner.required_fields(), &[CredentialField::Passphrase]);
        assert!(fixture::credentials()
            .check_auth_requirements(GdaxSigner.required_fields())
            .is_err());
    }
}
