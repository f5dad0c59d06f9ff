//! Decoded order record
//!
//! A [`Record`] mirrors one top-level JSON object of an order export. Unknown
//! top-level keys end up in [`Record::unknown_fields`] so the structural rule
//! can report schema drift.

use crate::serde_helpers::{exact_decimal, lenient_qty, lenient_string};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top-level keys the record model understands
pub const KNOWN_FIELDS: [&str; 9] = [
    "order_id",
    "user_id",
    "currency",
    "items",
    "discounts",
    "total_amount",
    "created_at",
    "updated_at",
    "metadata",
];

/// One order as found in the input stream
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub order_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub user_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub currency: Option<String>,

    /// Line items, `None` when the key is absent or null
    #[serde(default)]
    pub items: Option<Vec<Item>>,

    #[serde(default)]
    pub discounts: Option<Vec<Discount>>,

    /// Declared order total
    #[serde(default, deserialize_with = "exact_decimal::deserialize")]
    pub total_amount: Option<Decimal>,

    /// ISO-8601 creation timestamp, kept as text until a rule parses it
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Top-level keys outside [`KNOWN_FIELDS`], with their raw values
    #[serde(skip)]
    pub unknown_fields: BTreeMap<String, Value>,
}

/// Order line item
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub sku: Option<String>,

    #[serde(default, deserialize_with = "lenient_qty::deserialize")]
    pub qty: Option<i64>,

    #[serde(default, deserialize_with = "exact_decimal::deserialize")]
    pub price: Option<Decimal>,
}

/// Discount applied to the whole order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Discount {
    #[serde(rename = "type", default, deserialize_with = "lenient_string::deserialize")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "exact_decimal::deserialize")]
    pub amount: Option<Decimal>,
}

/// Free-form order metadata; only the sales channel is inspected
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub channel: Option<String>,
}

impl Record {
    /// Decode one JSON object, splitting unrecognized keys into [`Record::unknown_fields`]
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Build a record from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let unknown_fields = take_unknown_fields(&mut object);
        let mut record: Record = serde_json::from_value(Value::Object(object))?;
        record.unknown_fields = unknown_fields;
        Ok(record)
    }

    /// Sales channel from the metadata block, if any
    pub fn channel(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.channel.as_deref())
    }

    /// Order id for report rows, `"N/A"` when absent
    pub fn order_id_or_na(&self) -> &str {
        self.order_id.as_deref().unwrap_or("N/A")
    }

    /// Items present and non-empty
    pub fn has_items(&self) -> bool {
        self.items.as_ref().is_some_and(|items| !items.is_empty())
    }
}

fn take_unknown_fields(object: &mut Map<String, Value>) -> BTreeMap<String, Value> {
    let unknown: Vec<String> = object
        .keys()
        .filter(|key| !KNOWN_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    unknown
        .into_iter()
        .filter_map(|key| object.remove(&key).map(|value| (key, value)))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
