//! Golden request shared by the signer tests, plus reference digests computed
//! straight from the hash crates.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bitex_core::Result;
use bitex_core::config::ApiSettings;
use bitex_core::credentials::{CredentialField, CredentialSet};
use bitex_core::http_client::{RawResponse, Transport};
use bitex_core::nonce::Nonce;
use bitex_core::request::{HttpMethod, RequestDescriptor};
use bitex_core::signed_request::{SignedRequest, SigningContext, SigningStrategy};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use std::sync::{Arc, Mutex};

pub const KEY: &str = "panda";
pub const SECRET: &str = "shadow";
pub const NONCE: &str = "100";
pub const TIMESTAMP_MS: i64 = 1_000;
pub const ENDPOINT: &str = "testing/signature";

pub fn credentials() -> CredentialSet {
    CredentialSet::new(KEY, SECRET)
}

pub fn credentials_with(field: CredentialField, value: &str) -> CredentialSet {
    credentials().with(field, value)
}

pub fn context() -> SigningContext {
    SigningContext::at(Nonce::new(100), TIMESTAMP_MS)
}

pub fn descriptor(strategy: &dyn SigningStrategy, method: HttpMethod) -> RequestDescriptor {
    RequestDescriptor::builder(ENDPOINT)
        .method(method)
        .param("param_1", "abc")
        .authenticated(true)
        .build(&strategy.rules())
        .unwrap()
}

/// Signs the golden request with `strategy`'s default API settings.
pub fn sign(
    strategy: &dyn SigningStrategy,
    method: HttpMethod,
    credentials: &CredentialSet,
) -> SignedRequest {
    sign_with(strategy, &strategy.default_api(), method, credentials)
}

pub fn sign_with(
    strategy: &dyn SigningStrategy,
    api: &ApiSettings,
    method: HttpMethod,
    credentials: &CredentialSet,
) -> SignedRequest {
    strategy
        .sign(api, &descriptor(strategy, method), credentials, &context())
        .unwrap()
}

fn mac<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = <M as KeyInit>::new_from_slice(secret).unwrap();
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

pub fn hmac_sha256(secret: &[u8], message: &[u8]) -> Vec<u8> {
    mac::<Hmac<Sha256>>(secret, message)
}

pub fn hmac_sha384(secret: &[u8], message: &[u8]) -> Vec<u8> {
    mac::<Hmac<Sha384>>(secret, message)
}

pub fn hmac_sha512(secret: &[u8], message: &[u8]) -> Vec<u8> {
    mac::<Hmac<Sha512>>(secret, message)
}

pub fn b64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Transport answering every request with one canned response and recording
/// what was sent.
#[derive(Debug)]
pub struct Canned {
    status: u16,
    body: Vec<u8>,
    sent: Mutex<Vec<SignedRequest>>,
}

impl Canned {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.into(),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Arc<Self> {
        Self::new(200, body)
    }

    /// The most recent request.
    pub fn last(&self) -> SignedRequest {
        self.sent.lock().unwrap().last().cloned().expect("no request sent")
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl Transport for Canned {
    async fn execute(&self, request: SignedRequest) -> Result<RawResponse> {
        self.sent.lock().unwrap().push(request);
        Ok(RawResponse::new(self.status, self.body.clone()))
    }
}
