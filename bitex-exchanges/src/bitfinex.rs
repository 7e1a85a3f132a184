//! Bitfinex request signing, API v1 and v2.
//!
//! The API version configured for the client selects the scheme:
//!
//! - **v1**: a JSON payload `{request, nonce, ...params}` is base64-encoded and
//!   sent in `X-BFX-PAYLOAD`; the signature is HMAC-SHA384 (hex) of that base64
//!   text.
//! - **v2**: HMAC-SHA384 (hex) of `/api/v2/<endpoint> + nonce + json(params)`,
//!   with the JSON sent as the body.

use bitex_core::Result;
use bitex_core::auth::{DigestFormat, HashAlgorithm, base64_encode, hmac_sign};
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::request::{ParamOrdering, Params, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};

/// Bitfinex signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitfinexSigner;

impl SigningStrategy for BitfinexSigner {
    fn exchange(&self) -> &'static str {
        "Bitfinex"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.bitfinex.com", Some("v1"))
    }

    fn rules(&self) -> SigningRules {
        SigningRules::new(ParamOrdering::Preserve, &["nonce", "request"])
    }

    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        if api.version.as_deref() == Some("v2") {
            return sign_v2(api, descriptor, credentials, ctx);
        }
        sign_payload(api, descriptor, credentials, ctx, &V1_HEADERS)
    }
}

/// Header names of a payload-signed request.
#[derive(Debug)]
pub(crate) struct PayloadHeaders {
    pub key: &'static str,
    pub payload: &'static str,
    pub signature: &'static str,
}

const V1_HEADERS: PayloadHeaders = PayloadHeaders {
    key: "X-BFX-APIKEY",
    payload: "X-BFX-PAYLOAD",
    signature: "X-BFX-SIGNATURE",
};

/// Base64 JSON payload signed with HMAC-SHA384, all carried in headers.
pub(crate) fn sign_payload(
    api: &ApiSettings,
    descriptor: &RequestDescriptor,
    credentials: &CredentialSet,
    ctx: &SigningContext,
    headers: &PayloadHeaders,
) -> Result<SignedRequest> {
    let key = credentials.require(CredentialField::Key)?;
    let secret = credentials.require(CredentialField::Secret)?;

    let mut payload = Params::new()
        .with("request", api.uri(descriptor.endpoint()))
        .with("nonce", ctx.nonce.to_string());
    payload.extend(descriptor.params().iter());
    let payload = base64_encode(payload.to_json_spaced());
    let signature = hmac_sign(
        &payload,
        secret.expose_secret_bytes(),
        HashAlgorithm::Sha384,
        DigestFormat::Hex,
    )?;

    SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
        .with_header(headers.key, key.expose_secret())?
        .with_header(headers.payload, &payload)?
        .with_header(headers.signature, &signature)
}

fn sign_v2(
    api: &ApiSettings,
    descriptor: &RequestDescriptor,
    credentials: &CredentialSet,
    ctx: &SigningContext,
) -> Result<SignedRequest> {
    let key = credentials.require(CredentialField::Key)?;
    let secret = credentials.require(CredentialField::Secret)?;

    let nonce = ctx.nonce.to_string();
    let body = descriptor.params().to_json_spaced();
    let message = format!("/api{}{nonce}{body}", api.uri(descriptor.endpoint()));
    let signature = hmac_sign(
        message,
        secret.expose_secret_bytes(),
        HashAlgorithm::Sha384,
        DigestFormat::Hex,
    )?;

    Ok(
        SignedRequest::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_header("bfx-apikey", key.expose_secret())?
            .with_header("bfx-signature", &signature)?
            .with_header("bfx-nonce", &nonce)?
            .with_header("content-type", "application/json")?
            .with_body(RequestBody::Json(body)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, KEY, NONCE, SECRET};
    use bitex_core::request::HttpMethod;

    #[test]
    fn test_v1_golden_signature() {
        let request = fixture::sign(&BitfinexSigner, HttpMethod::Post, &fixture::credentials());

        let json = r#"{"request": "/v1/testing/signature", "nonce": "100", "param_1": "abc"}"#;
        let payload = fixture::b64(json);
        let signature = hex::encode(fixture::hmac_sha384(SECRET.as_bytes(), payload.as_bytes()));

        assert_eq!(request.url(), "https://api.bitfinex.com/v1/testing/signature");
        assert_eq!(request.header("X-BFX-APIKEY"), Some(KEY));
        assert_eq!(request.header("X-BFX-PAYLOAD"), Some(payload.as_str()));
        assert_eq!(request.header("X-BFX-SIGNATURE"), Some(signature.as_str()));
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_v2_golden_signature() {
        let api = ApiSettings::new("https://api.bitfinex.com", Some("v2"));
        let request =
            fixture::sign_with(&BitfinexSigner, &api, HttpMethod::Post, &fixture::credentials());

        let body = r#"{"param_1": "abc"}"#;
        let message = format!("/api/v2/testing/signature{NONCE}{body}");
        let signature = hex::encode(fixture::hmac_sha384(SECRET.as_bytes(), message.as_bytes()));

        assert_eq!(request.url(), "https://api.bitfinex.com/v2/testing/signature");
        assert_eq!(request.header("bfx-apikey"), Some(KEY));
        assert_eq!(request.header("bfx-signature"), Some(signature.as_str()));
        assert_eq!(request.header("bfx-nonce"), Some(NONCE));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body(), &RequestBody::Json(body.to_string()));
    }

    #[test]
    fn test_v1_payload_matches_a_json_dumps_ordering() {
        let request = fixture::sign(&BitfinexSigner, HttpMethod::Post, &fixture::credentials());

        let fields = [
            r#""request": "/v1/testing/signature""#,
            r#""nonce": "100""#,
            r#""param_1": "abc""#,
        ];
        let orderings = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let accepted: Vec<String> = orderings
            .iter()
            .map(|order| {
                let joined = order.map(|i| fields[i]).join(", ");
                fixture::b64(&format!("{{{joined}}}"))
            })
            .collect();

        let payload = request.header("X-BFX-PAYLOAD").unwrap().to_string();
        assert!(accepted.contains(&payload), "unexpected payload {payload}");
    }
}
