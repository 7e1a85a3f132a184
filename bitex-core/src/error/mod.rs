//! # Error Handling for bitex
//!
//! Every failure surfaced by the request-construction and response-normalization
//! engine is one of the variants below. None of them are swallowed, and the core
//! never retries on its own.
//!
//! ## Error Hierarchy
//!
//! ```text
//! Error (main error type)
//! ├── InvalidRequest    - Caller mistakes (empty required field, malformed endpoint)
//! ├── Authentication    - Credentials missing right before an authenticated call
//! ├── PublicDataFetch   - Non-success HTTP status on a data-bearing verb
//! ├── NotImplemented    - Verb not offered by this exchange
//! ├── MalformedResponse - Body is not JSON, even after exchange-specific repair
//! ├── Parse             - Expected field missing or invalid inside valid JSON
//! ├── Network           - Transport failures (via NetworkError)
//! ├── Timeout           - Transport timeout
//! ├── Config            - Unreadable or invalid configuration source
//! └── Context           - Error with additional context
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use bitex_core::error::{Error, Result, ContextExt};
//!
//! fn endpoint(path: &str) -> Result<&str> {
//!     if path.is_empty() {
//!         return Err(Error::invalid_request("endpoint cannot be empty"));
//!     }
//!     Ok(path)
//! }
//!
//! let err = endpoint("").context("building ticker request").unwrap_err();
//! assert!(err.is_invalid_request());
//! println!("{}", err.report());
//! ```
//!
//! Incomplete credentials are *not* errors: they surface as
//! [`CredentialFinding`](crate::credential_store::CredentialFinding) warnings and only
//! turn into [`Error::Authentication`] when an authenticated call is attempted.

mod context;
mod convert;
mod network;
mod parse;

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

pub use context::ContextExt;
pub use network::NetworkError;
pub use parse::ParseError;

/// Result type alias for all bitex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Details of a response body that could not be decoded.
///
/// Boxed inside [`Error::MalformedResponse`]; the raw body is kept for diagnostics.
#[derive(Debug)]
pub struct MalformedResponse {
    /// Decoder error message.
    pub message: String,
    /// Raw body as received (lossy UTF-8, truncated).
    pub body: String,
}

impl fmt::Display for MalformedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (body: {})", self.message, self.body)
    }
}

/// The primary error type for the `bitex` crates.
///
/// # Example
///
/// ```rust
/// use bitex_core::error::Error;
///
/// let err = Error::authentication("'user_id' is required");
/// assert!(err.to_string().contains("user_id"));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input validation error (empty-but-required credential, malformed endpoint,
    /// reserved parameter).
    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    /// Authentication precondition failed for an authenticated call.
    #[error("Authentication error: {0}")]
    Authentication(Cow<'static, str>),

    /// HTTP-level failure on a read endpoint.
    #[error("Public data fetch failed with status {status}: {reason}")]
    PublicDataFetch {
        /// HTTP status code
        status: u16,
        /// HTTP reason phrase
        reason: String,
    },

    /// Feature not implemented for this exchange.
    #[error("Not implemented: {0}")]
    NotImplemented(Cow<'static, str>),

    /// Response body is not valid JSON even after repair.
    #[error("Malformed response: {0}")]
    MalformedResponse(Box<MalformedResponse>),

    /// Errors while extracting fields from a decoded response. Boxed to reduce enum size.
    #[error("Parse error: {0}")]
    Parse(Box<ParseError>),

    /// Network-related errors encapsulating transport layer issues.
    #[error("Network error: {0}")]
    Network(Box<NetworkError>),

    /// Transport timeout.
    #[error("Timeout: {0}")]
    Timeout(Cow<'static, str>),

    /// Configuration source could not be read or is invalid.
    #[error("Configuration error: {0}")]
    Config(Cow<'static, str>),

    /// Error with additional context, preserving the error chain.
    #[error("{context}")]
    Context {
        /// Context message describing what operation failed
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    // ==================== Constructor Methods ====================

    /// Creates an invalid request error.
    pub fn invalid_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates an authentication error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn authentication(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates a public data fetch error from an HTTP status and reason phrase.
    pub fn public_data_fetch(status: u16, reason: impl Into<String>) -> Self {
        Self::PublicDataFetch {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a not implemented error.
    pub fn not_implemented(feature: impl Into<Cow<'static, str>>) -> Self {
        Self::NotImplemented(feature.into())
    }

    /// Creates a malformed response error, keeping a truncated copy of the body.
    pub fn malformed_response(message: impl Into<String>, body: &[u8]) -> Self {
        Self::MalformedResponse(Box::new(MalformedResponse {
            message: message.into(),
            body: convert::truncate_message(String::from_utf8_lossy(body).into_owned()),
        }))
    }

    /// Creates a connection failure from a message.
    pub fn network(msg: impl Into<String>) -> Self {
        NetworkError::Connect(msg.into()).into()
    }

    /// Creates a timeout error.
    pub fn timeout(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }

    // ==================== Context Methods ====================

    /// Attaches context to an existing error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitex_core::error::Error;
    ///
    /// let err = Error::network("Connection refused")
    ///     .context("Failed to fetch ticker for BTCUSD");
    /// ```
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    // ==================== Chain Traversal Methods ====================

    fn iter_chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| match err {
            Error::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        })
    }

    /// Returns the root cause of the error, skipping Context layers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        self.iter_chain().last().unwrap_or(self)
    }

    /// Generates a detailed error report with the full chain.
    #[must_use]
    pub fn report(&self) -> String {
        use std::fmt::Write;
        let mut report = String::new();
        report.push_str(&self.to_string());

        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            let _ = write!(report, "\nCaused by: {err}");
            current = err.source();
        }
        report
    }

    // ==================== Helper Methods (Context Penetrating) ====================

    /// Checks if this error is an input validation error (penetrates Context layers).
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(self.root_cause(), Error::InvalidRequest(_))
    }

    /// Checks if this is an authentication error (penetrates Context layers).
    /// Returns the error message.
    #[must_use]
    pub fn as_authentication(&self) -> Option<&str> {
        match self.root_cause() {
            Error::Authentication(msg) => Some(msg.as_ref()),
            _ => None,
        }
    }

    /// Returns status and reason if this is a public data fetch error
    /// (penetrates Context layers).
    #[must_use]
    pub fn as_public_data_fetch(&self) -> Option<(u16, &str)> {
        match self.root_cause() {
            Error::PublicDataFetch { status, reason } => Some((*status, reason.as_str())),
            _ => None,
        }
    }

    /// Checks if this is an unsupported-operation error (penetrates Context layers).
    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self.root_cause(), Error::NotImplemented(_))
    }

    /// Returns the malformed body details, if any (penetrates Context layers).
    #[must_use]
    pub fn as_malformed_response(&self) -> Option<&MalformedResponse> {
        match self.root_cause() {
            Error::MalformedResponse(details) => Some(details),
            _ => None,
        }
    }

    /// Checks whether a caller-side retry makes sense (penetrates Context layers).
    ///
    /// Only transport failures and public data fetch errors qualify. A retried
    /// authenticated call must be re-signed with a fresh nonce.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.root_cause() {
            Error::Network(ne) => ne.is_transient(),
            Error::Timeout(_) | Error::PublicDataFetch { .. } => true,
            _ => false,
        }
    }
}
