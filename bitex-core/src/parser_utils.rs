//! Common parser utilities for exchange responses.
//!
//! Bodies are decoded with `serde_json`'s `arbitrary_precision` feature, so a
//! JSON number keeps its original text and converts to a [`DecimalString`]
//! without passing through `f64`.

use crate::error::{ParseError, Result};
use crate::types::{DecimalString, PriceLevel};
use serde_json::Value;

/// Field `key` of `data`, or a `MissingField` error.
pub fn require_field<'a>(data: &'a Value, key: &str) -> Result<&'a Value> {
    data.get(key)
        .ok_or_else(|| ParseError::missing_field(key.to_string()).into())
}

/// String field `key` of `data`.
pub fn require_str<'a>(data: &'a Value, key: &str) -> Result<&'a str> {
    require_field(data, key)?.as_str().ok_or_else(|| {
        ParseError::invalid_value(key.to_string(), "expected a string").into()
    })
}

/// Array field `key` of `data`.
pub fn require_array<'a>(data: &'a Value, key: &str) -> Result<&'a Vec<Value>> {
    require_field(data, key)?.as_array().ok_or_else(|| {
        ParseError::invalid_value(key.to_string(), "expected an array").into()
    })
}

/// Text of a string or number value. Numbers keep their JSON spelling.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Exact decimal from a string or number value.
pub fn to_decimal_string(value: &Value, field: &str) -> Result<DecimalString> {
    let text = value_text(value).ok_or_else(|| {
        ParseError::invalid_value(field.to_string(), format!("expected a number, got {value}"))
    })?;
    DecimalString::parse(text)
}

/// Required decimal field.
pub fn require_decimal(data: &Value, key: &str) -> Result<DecimalString> {
    to_decimal_string(require_field(data, key)?, key)
}

/// Optional decimal field. Missing, `null` and `""` are `None`.
pub fn optional_decimal(data: &Value, key: &str) -> Result<Option<DecimalString>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => to_decimal_string(value, key).map(Some),
    }
}

/// Identifier field as text (exchanges send ids as strings or numbers).
pub fn require_id(data: &Value, key: &str) -> Result<String> {
    value_text(require_field(data, key)?).ok_or_else(|| {
        ParseError::invalid_value(key.to_string(), "expected a string or number").into()
    })
}

/// Integer timestamp field (string or number).
pub fn parse_timestamp(data: &Value, key: &str) -> Option<i64> {
    data.get(key).and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
    })
}

/// Price levels from `[[price, size, ...], ...]`.
pub fn levels_from_pairs(levels: &Value, field: &str) -> Result<Vec<PriceLevel>> {
    let levels = levels.as_array().ok_or_else(|| {
        ParseError::invalid_value(field.to_string(), "expected an array of levels")
    })?;
    levels
        .iter()
        .map(|level| -> Result<PriceLevel> {
            match level.as_array().map(Vec::as_slice) {
                Some([price, size, ..]) => Ok(PriceLevel::new(
                    to_decimal_string(price, field)?,
                    to_decimal_string(size, field)?,
                )),
                _ => Err(
                    ParseError::invalid_value(field.to_string(), "expected [price, size]").into(),
                ),
            }
        })
        .collect()
}

/// Price levels from `[{price_key: .., size_key: ..}, ...]`.
pub fn levels_from_objects(
    levels: &Value,
    field: &str,
    price_key: &str,
    size_key: &str,
) -> Result<Vec<PriceLevel>> {
    let levels = levels.as_array().ok_or_else(|| {
        ParseError::invalid_value(field.to_string(), "expected an array of levels")
    })?;
    levels
        .iter()
        .map(|level| -> Result<PriceLevel> {
            Ok(PriceLevel::new(
                require_decimal(level, price_key)?,
                require_decimal(level, size_key)?,
            ))
        })
        .collect()
}
