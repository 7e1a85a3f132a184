//! Attaching "what were we doing" to errors.

use crate::error::{Error, Result};
use std::fmt;

/// Adds a context layer to a failing `Result` or an empty `Option`.
///
/// Accessors such as [`Error::as_public_data_fetch`] look through context
/// layers, so wrapping never hides the underlying kind. A `None` becomes an
/// [`Error::InvalidRequest`] carrying the message.
///
/// ```rust
/// use bitex_core::error::{ContextExt, Result};
///
/// fn order_id(json: &serde_json::Value) -> Result<&str> {
///     json.get("id")
///         .and_then(|v| v.as_str())
///         .context("response has no order id")
/// }
///
/// assert!(order_id(&serde_json::json!({})).unwrap_err().is_invalid_request());
/// ```
pub trait ContextExt<T> {
    /// Wraps the error with `context`.
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Wraps the error with a message built only on failure.
    fn with_context<C: fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ContextExt<T> for std::result::Result<T, E> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|e| e.into().context(context.to_string()))
    }

    fn with_context<C: fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| e.into().context(f().to_string()))
    }
}

impl<T> ContextExt<T> for Option<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::invalid_request(context.to_string()))
    }

    fn with_context<C: fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::invalid_request(f().to_string()))
    }
}
