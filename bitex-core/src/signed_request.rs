//! Signed requests and the per-exchange signing capability.
//!
//! Each exchange implements [`SigningStrategy`]: given an unsigned
//! [`RequestDescriptor`], the resolved [`CredentialSet`] and a fresh
//! [`SigningContext`], it produces a [`SignedRequest`] ready for the transport.
//!
//! # Architecture
//!
//! - [`SigningStrategy`]: exchange-specific signing (message layout, digest, placement)
//! - [`SigningContext`]: nonce and timestamp for one signing pass
//! - [`SignedRequest`]: url, headers and body, immutable once built
//! - [`RequestBody`]: none, form-encoded, JSON or multipart
//!
//! Strategies never see unauthenticated descriptors: those go through
//! [`SigningStrategy::unsigned`], which adds no credentials at all.

use crate::config::ApiSettings;
use crate::credentials::{CredentialField, CredentialSet, SecretString};
use crate::envelope::RepairFn;
use crate::error::{Error, Result};
use crate::nonce::{Nonce, NonceKind};
use crate::request::{HttpMethod, Params, RequestDescriptor, SigningRules};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;

/// Nonce and clock reading for one signing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningContext {
    /// Nonce issued for this request.
    pub nonce: Nonce,
    /// Milliseconds since the Unix epoch at signing time.
    pub timestamp_ms: i64,
}

impl SigningContext {
    /// Context stamped with the current time.
    pub fn new(nonce: Nonce) -> Self {
        Self::at(nonce, crate::time::milliseconds())
    }

    /// Context with an explicit timestamp.
    pub fn at(nonce: Nonce, timestamp_ms: i64) -> Self {
        Self {
            nonce,
            timestamp_ms,
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` string.
    Form(String),
    /// JSON string.
    Json(String),
    /// Structured `multipart/form-data` text fields.
    Multipart(Params),
}

impl RequestBody {
    /// Whether there is no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Body text for `Form` and `Json`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Form(text) | Self::Json(text) => Some(text),
            Self::Empty | Self::Multipart(_) => None,
        }
    }

    /// Default content type, if the transport should set one.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
            Self::Json(_) => Some("application/json"),
            Self::Empty | Self::Multipart(_) => None,
        }
    }
}

/// HTTP basic auth credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// User name (the API key).
    pub username: String,
    /// Password (the API secret).
    pub password: SecretString,
}

/// A fully built request. Consumed once by the transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: HttpMethod,
    url: String,
    headers: HeaderMap,
    body: RequestBody,
    basic_auth: Option<BasicAuth>,
}

impl SignedRequest {
    /// Request with no headers and no body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            basic_auth: None,
        }
    }

    /// The unsigned form of `descriptor`: parameters go into the query string.
    pub fn unsigned(api: &ApiSettings, descriptor: &RequestDescriptor) -> Self {
        Self::new(descriptor.method(), api.url(descriptor.endpoint()))
            .with_query(&descriptor.params().urlencode())
    }

    /// Appends `query` (already encoded) to the url.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.url = append_query(&self.url, query);
        self
    }

    /// Sets a header.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Result<Self> {
        insert_header(&mut self.headers, name, value)?;
        Ok(self)
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets HTTP basic auth.
    #[must_use]
    pub fn with_basic_auth(mut self, username: &SecretString, password: &SecretString) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.expose_secret().to_string(),
            password: password.clone(),
        });
        self
    }

    /// HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Full url including query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Basic auth, if any.
    pub fn basic_auth(&self) -> Option<&BasicAuth> {
        self.basic_auth.as_ref()
    }

    /// Splits into its parts for the transport.
    pub fn into_parts(self) -> (HttpMethod, String, HeaderMap, RequestBody, Option<BasicAuth>) {
        (
            self.method,
            self.url,
            self.headers,
            self.body,
            self.basic_auth,
        )
    }
}

/// Inserts a header, marking it sensitive so it never shows up in debug output.
pub fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<()> {
    let header = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::invalid_request(format!("invalid header name '{name}': {e}")))?;
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_request(format!("invalid value for header '{name}': {e}")))?;
    value.set_sensitive(true);
    headers.insert(header, value);
    Ok(())
}

/// Appends an encoded query string to `url`.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{url}&{query}")
    } else {
        format!("{url}?{query}")
    }
}

/// Exchange-specific request signing.
///
/// Implementors are stateless: everything that varies per request arrives as an
/// argument. The nonce is issued by the caller right before `sign`, after
/// [`CredentialSet::check_auth_requirements`] has passed for
/// [`required_fields`](Self::required_fields).
pub trait SigningStrategy: Send + Sync + fmt::Debug {
    /// Exchange name, for logs.
    fn exchange(&self) -> &'static str;

    /// Default address and version.
    fn default_api(&self) -> ApiSettings;

    /// Identity fields required beyond key and secret.
    fn required_fields(&self) -> &'static [CredentialField] {
        &[]
    }

    /// Nonce discipline.
    fn nonce_kind(&self) -> NonceKind {
        NonceKind::Counter
    }

    /// Ordering and reserved keys for descriptors sent to this exchange.
    fn rules(&self) -> SigningRules {
        SigningRules::DEFAULT
    }

    /// Signs an authenticated request.
    fn sign(
        &self,
        api: &ApiSettings,
        descriptor: &RequestDescriptor,
        credentials: &CredentialSet,
        ctx: &SigningContext,
    ) -> Result<SignedRequest>;

    /// Builds an unauthenticated request. Never touches credentials.
    fn unsigned(&self, api: &ApiSettings, descriptor: &RequestDescriptor) -> SignedRequest {
        SignedRequest::unsigned(api, descriptor)
    }

    /// Pre-parse repair for response bodies that are not valid JSON as received.
    fn response_repair(&self) -> Option<RepairFn> {
        None
    }
}
