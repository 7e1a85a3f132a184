//! Field extraction errors for decoded exchange responses.

use std::borrow::Cow;
use thiserror::Error;

/// Raised while turning a decoded JSON body into a canonical record.
///
/// A body that is not JSON at all is reported as
/// [`Error::MalformedResponse`](crate::error::Error::MalformedResponse) instead.
///
/// ```rust
/// use bitex_core::error::{Error, ParseError, Result};
///
/// fn last_price(json: &serde_json::Value) -> Result<&str> {
///     json.get("last")
///         .and_then(|v| v.as_str())
///         .ok_or_else(|| ParseError::missing_field("last").into())
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// A typed view of the body did not deserialize.
    #[error("Failed to deserialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A time field was present but unusable.
    #[error("Failed to parse timestamp: {0}")]
    Timestamp(Cow<'static, str>),

    /// The exchange left out a field the record needs.
    #[error("Missing required field: {0}")]
    MissingField(Cow<'static, str>),

    /// The field is there, with the wrong shape.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: Cow<'static, str>,
        /// What was expected
        message: Cow<'static, str>,
    },
}

impl ParseError {
    /// Names a missing field.
    pub fn missing_field(field: impl Into<Cow<'static, str>>) -> Self {
        Self::MissingField(field.into())
    }

    /// Names a field and what was wrong with its value.
    pub fn invalid_value(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Describes an unusable time field.
    pub fn timestamp(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Timestamp(message.into())
    }
}
