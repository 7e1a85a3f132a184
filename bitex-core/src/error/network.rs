//! Transport failures.

use std::error::Error as StdError;
use thiserror::Error;

/// Why a request never produced a complete response.
///
/// An HTTP error status is not a transport failure: it comes back as a
/// [`RawResponse`](crate::http_client::RawResponse) and the envelope decides
/// what it means. Timeouts have their own top-level variant,
/// [`Error::Timeout`](crate::error::Error::Timeout).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetworkError {
    /// The exchange could not be reached.
    #[error("Could not connect: {0}")]
    Connect(String),

    /// The connection dropped while the body was streaming.
    #[error("Response body interrupted: {0}")]
    Body(String),

    /// The underlying client could not be set up (TLS backend, proxy).
    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    /// Any other `reqwest` failure, kept opaque.
    #[error("Transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl NetworkError {
    /// Whether sending the same call again could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Body(_))
    }
}
