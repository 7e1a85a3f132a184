//! HTTP transport.
//!
//! The core never opens sockets itself: it hands a [`SignedRequest`] to a
//! [`Transport`] and gets back a [`RawResponse`]. [`HttpClient`] is the
//! `reqwest`-backed implementation and supports:
//! - Request timeout and connect timeout
//! - Proxies with optional credentials
//! - Request and response size limits
//!
//! Non-success statuses are returned as responses, not errors; the response
//! envelope decides what they mean for each verb. No retries happen here.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitex_core::http_client::{HttpClient, HttpConfig, Transport};
//! use bitex_core::request::HttpMethod;
//! use bitex_core::signed_request::SignedRequest;
//!
//! # async fn example() -> bitex_core::Result<()> {
//! let client = HttpClient::new(HttpConfig::default())?;
//! let request = SignedRequest::new(HttpMethod::Get, "https://api.gdax.com/time");
//! let response = client.execute(request).await?;
//! println!("{} {}", response.status, response.reason);
//! # Ok(())
//! # }
//! ```
//!
//! [`SignedRequest`]: crate::signed_request::SignedRequest

mod builder;
mod config;
mod request;
mod response;


pub use builder::HttpClient;
pub use config::HttpConfig;
pub use response::RawResponse;

use crate::error::Result;
use crate::signed_request::SignedRequest;
use async_trait::async_trait;

/// Executes signed requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw response, whatever its status.
    async fn execute(&self, request: SignedRequest) -> Result<RawResponse>;
}
