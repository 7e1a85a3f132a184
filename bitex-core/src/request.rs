//! Request descriptors.
//!
//! A [`RequestDescriptor`] is the unsigned, exchange-agnostic form of one API call:
//! endpoint, HTTP method, ordered parameters and whether it must be authenticated.
//! Building one is pure and performs no I/O. The signing strategy of the target
//! exchange supplies the [`SigningRules`] that decide parameter ordering and which
//! keys callers may not set themselves.

use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::Formatter;
use std::fmt;
use std::io::{self, Write};

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// GET request - parameters in query string
    #[default]
    Get,
    /// POST request - parameters in the body
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
}

impl HttpMethod {
    /// Convert to uppercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered string parameters.
///
/// Re-inserting an existing key replaces its value in place, keeping the
/// original position. Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Creates empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    /// Iterates in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorts by key (stable).
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Returns a sorted copy.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut sorted = self.clone();
        sorted.sort();
        sorted
    }

    /// `application/x-www-form-urlencoded` serialization in order
    /// (spaces become `+`).
    pub fn urlencode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// `key=value&...` without any escaping.
    pub fn raw_query(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// JSON object in order, with `", "` and `": "` separators and non-ASCII
    /// escaped as `\uXXXX`. Exchanges that sign a JSON body expect this form.
    pub fn to_json_spaced(&self) -> String {
        let mut out = Vec::with_capacity(self.0.len() * 16);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        // Writing string pairs into a Vec cannot fail.
        if self.serialize(&mut serializer).is_err() {
            return String::new();
        }
        String::from_utf8(out).unwrap_or_default()
    }
}

/// `json.dumps` layout: spaced separators, ASCII-only output.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            return Ok(());
        }
        writer.write_all(b", ")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            return Ok(());
        }
        writer.write_all(b", ")
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
                continue;
            }
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{unit:04x}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Parameter ordering a signing strategy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamOrdering {
    /// Keep the caller's order.
    #[default]
    Preserve,
    /// Sort by key before signing.
    Sorted,
}

/// Descriptor rules dictated by a signing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningRules {
    /// Parameter ordering.
    pub ordering: ParamOrdering,
    /// Keys the strategy injects itself; callers may not supply them on
    /// authenticated requests.
    pub reserved: &'static [&'static str],
}

impl SigningRules {
    /// Preserve order, reserve `nonce`.
    pub const DEFAULT: Self = Self {
        ordering: ParamOrdering::Preserve,
        reserved: &["nonce"],
    };

    /// Creates rules.
    pub const fn new(ordering: ParamOrdering, reserved: &'static [&'static str]) -> Self {
        Self { ordering, reserved }
    }
}

impl Default for SigningRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An unsigned request. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    endpoint: String,
    method: HttpMethod,
    params: Params,
    authenticate: bool,
}

impl RequestDescriptor {
    /// Starts building a descriptor for `endpoint`.
    pub fn builder(endpoint: impl Into<String>) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder {
            endpoint: endpoint.into(),
            method: HttpMethod::default(),
            params: Params::new(),
            authenticate: false,
        }
    }

    /// Endpoint path relative to the API root, without leading slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Parameters, already ordered per the strategy's rules.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Whether this request must be signed.
    pub fn is_authenticated(&self) -> bool {
        self.authenticate
    }
}

/// Builder for [`RequestDescriptor`].
#[derive(Debug, Clone)]
pub struct RequestDescriptorBuilder {
    endpoint: String,
    method: HttpMethod,
    params: Params,
    authenticate: bool,
}

impl RequestDescriptorBuilder {
    /// Sets the HTTP method (default: GET).
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Adds a parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key, value.to_string());
        self
    }

    /// Adds a parameter only if `value` is `Some`.
    pub fn optional_param<T: ToString>(self, key: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Adds several parameters in order.
    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Marks the request as authenticated.
    pub fn authenticated(mut self, authenticate: bool) -> Self {
        self.authenticate = authenticate;
        self
    }

    /// Validates and finalizes the descriptor.
    ///
    /// Fails with [`Error::InvalidRequest`] if the endpoint is empty or contains
    /// whitespace, or if an authenticated request carries a reserved key.
    pub fn build(self, rules: &SigningRules) -> Result<RequestDescriptor> {
        let endpoint = self.endpoint.trim_start_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(Error::invalid_request("endpoint cannot be empty"));
        }
        if endpoint.chars().any(char::is_whitespace) {
            return Err(Error::invalid_request(format!(
                "malformed endpoint '{endpoint}'"
            )));
        }

        if self.authenticate {
            if let Some(key) = rules
                .reserved
                .iter()
                .find(|key| self.params.contains_key(key))
            {
                return Err(Error::invalid_request(format!(
                    "'{key}' is set by the signing strategy and cannot be supplied"
                )));
            }
        }

        let mut params = self.params;
        if rules.ordering == ParamOrdering::Sorted {
            params.sort();
        }

        Ok(RequestDescriptor {
            endpoint,
            method: self.method,
            params,
            authenticate: self.authenticate,
        })
    }
}
