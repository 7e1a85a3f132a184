//! Gemini request signing. Same payload scheme as Bitfinex v1 under
//! `X-GEMINI-*` headers.

use crate::bitfinex::{PayloadHeaders, sign_payload};
use bitex_core::Result;
use bitex_core::config::ApiSettings;
use bitex_core::credentials::CredentialSet;
use bitex_core::request::{ParamOrdering, RequestDescriptor, SigningRules};
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};

const HEADERS: PayloadHeaders = PayloadHeaders {
    key: "X-GEMINI-APIKEY",
    payload: "X-GEMINI-PAYLOAD",
    signature: "X-GEMINI-SIGNATURE",
};

/// Gemini signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeminiSigner;

impl SigningStrategy for GeminiSigner {
    fn exchange(&self) -> &'static str {
        "Gemini"
    }

    fn default_api(&self) -> ApiSettings {
        ApiSettings::new("https://api.gemini.com", Some("v1"))
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
        sign_payload(api, descriptor, credentials, ctx, &HEADERS)
    }
}
