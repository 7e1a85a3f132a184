//! Secure credential types with automatic memory zeroization.
//!
//! [`SecretString`] holds a single secret; [`CredentialSet`] is the resolved,
//! immutable bundle (key, secret and exchange-specific identity fields) a client
//! authenticates with. Resolution from explicit arguments and config files lives in
//! [`credential_store`](crate::credential_store).
//!
//! # Example
//!
//! ```rust
//! use bitex_core::credentials::SecretString;
//!
//! let api_key = SecretString::new("my-api-key");
//! assert_eq!(api_key.expose_secret(), "my-api-key");
//! assert_eq!(format!("{:?}", api_key), "[REDACTED]");
//! ```

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string that is automatically zeroed when dropped.
///
/// Debug and Display are redacted so secrets never reach logs.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    ///
    /// Avoid storing the returned reference longer than necessary.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns the secret as bytes.
    #[inline]
    pub fn expose_secret_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the length of the secret string.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the secret string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Prevent accidental logging of sensitive data
impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Named credential fields.
///
/// `Key` and `Secret` are needed by every authenticated call; the identity fields
/// are required only by the exchanges whose strategy declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CredentialField {
    /// API key.
    Key,
    /// API secret.
    Secret,
    /// Customer / user id (Bitstamp, itBit).
    UserId,
    /// Passphrase (GDAX).
    Passphrase,
    /// Client id (QuadrigaCX).
    ClientId,
    /// Sub-account id.
    AccountId,
}

impl CredentialField {
    /// All fields, in resolution order.
    pub const ALL: [CredentialField; 6] = [
        CredentialField::Key,
        CredentialField::Secret,
        CredentialField::UserId,
        CredentialField::Passphrase,
        CredentialField::ClientId,
        CredentialField::AccountId,
    ];

    /// Config-file / keyword name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Secret => "secret",
            Self::UserId => "user_id",
            Self::Passphrase => "passphrase",
            Self::ClientId => "client_id",
            Self::AccountId => "account_id",
        }
    }

    /// Parses a config key into a field (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved credential bundle for one exchange client.
///
/// Immutable after construction. Absent fields are simply not present in the map.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    fields: BTreeMap<CredentialField, SecretString>,
}

impl CredentialSet {
    /// Creates an empty credential set (public endpoints only).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a credential set holding just a key and secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::empty()
            .with(CredentialField::Key, key)
            .with(CredentialField::Secret, secret)
    }

    /// Returns a copy with `field` set to `value`.
    #[must_use]
    pub fn with(mut self, field: CredentialField, value: impl Into<String>) -> Self {
        self.fields.insert(field, SecretString::new(value));
        self
    }

    pub(crate) fn from_fields(fields: BTreeMap<CredentialField, SecretString>) -> Self {
        Self { fields }
    }

    /// Returns the value of `field`, if present.
    pub fn get(&self, field: CredentialField) -> Option<&SecretString> {
        self.fields.get(&field)
    }

    /// Returns the API key, if present.
    pub fn key(&self) -> Option<&SecretString> {
        self.get(CredentialField::Key)
    }

    /// Returns the API secret, if present.
    pub fn secret(&self) -> Option<&SecretString> {
        self.get(CredentialField::Secret)
    }

    /// Returns `field` or an authentication error naming it.
    ///
    /// Strategies call this while signing, after
    /// [`check_auth_requirements`](Self::check_auth_requirements)
    /// has already passed.
    pub fn require(&self, field: CredentialField) -> Result<&SecretString> {
        match self.fields.get(&field) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::authentication(format!(
                "'{field}' is required for authenticated requests"
            ))),
        }
    }

    /// Verifies that key, secret and every field in `required` are present and non-empty.
    ///
    /// Run immediately before signing an authenticated call.
    pub fn check_auth_requirements(&self, required: &[CredentialField]) -> Result<()> {
        let missing: Vec<&str> = [CredentialField::Key, CredentialField::Secret]
            .iter()
            .chain(required.iter())
            .filter(|field| self.require(**field).is_err())
            .map(CredentialField::as_str)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::authentication(format!(
                "incomplete credentials, missing: {}",
                missing.join(", ")
            )))
        }
    }

    /// Names of the fields present in this set.
    pub fn present_fields(&self) -> Vec<CredentialField> {
        self.fields.keys().copied().collect()
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(k, v)| (k.as_str(), v)))
            .finish()
    }
}
