//! Field decoders that keep the record model tolerant of loosely typed exports.
//!
//! Each helper first decodes into [`serde_json::Value`] so that number literals
//! arrive with their original text intact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Optional string that also accepts JSON numbers and booleans.
///
/// `42` decodes to `"42"` and `true` to `"true"`. Arrays and objects are
/// rejected so a structurally wrong field still fails the record.
pub mod lenient_string {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
            Some(Value::Array(_)) => Err(D::Error::invalid_type(
                Unexpected::Seq,
                &"a string, number or boolean",
            )),
            Some(Value::Object(_)) => Err(D::Error::invalid_type(
                Unexpected::Map,
                &"a string, number or boolean",
            )),
        }
    }
}

/// Optional exact decimal from a JSON number or a decimal string.
pub mod exact_decimal {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => parse_decimal(&number.to_string())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("number {number} is not a representable decimal"))),
            Some(Value::String(text)) => parse_decimal(text.trim())
                .map(Some)
                .ok_or_else(|| D::Error::invalid_value(Unexpected::Str(&text), &"a decimal amount")),
            Some(Value::Bool(flag)) => Err(D::Error::invalid_type(Unexpected::Bool(flag), &"a decimal amount")),
            Some(Value::Array(_)) => Err(D::Error::invalid_type(Unexpected::Seq, &"a decimal amount")),
            Some(Value::Object(_)) => Err(D::Error::invalid_type(Unexpected::Map, &"a decimal amount")),
        }
    }
}

/// Optional whole-number quantity
///
/// `2`, `2.0`, `2e0` and `"2"` all decode to `2`. Fractional or out of range
/// values fail the record.
pub mod lenient_qty {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(whole) => return Ok(Some(whole)),
                None => number.to_string(),
            },
            Some(Value::String(text)) => text,
            Some(Value::Bool(flag)) => {
                return Err(D::Error::invalid_type(Unexpected::Bool(flag), &"a whole-number quantity"))
            }
            Some(Value::Array(_)) => return Err(D::Error::invalid_type(Unexpected::Seq, &"a whole-number quantity")),
            Some(Value::Object(_)) => return Err(D::Error::invalid_type(Unexpected::Map, &"a whole-number quantity")),
        };

        whole_number(text.trim())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("quantity {text} is not a whole number")))
    }

    fn whole_number(text: &str) -> Option<i64> {
        if let Ok(whole) = text.parse::<i64>() {
            return Some(whole);
        }
        let decimal = parse_decimal(text)?;
        if decimal.fract().is_zero() {
            decimal.to_i64()
        } else {
            None
        }
    }
}

/// Exact decimal from plain or scientific notation
fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        return Decimal::from_scientific(text).ok();
    }
    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_str(text))
        .ok()
}
