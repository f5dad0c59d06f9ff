//! Shared fixtures for rule tests
//!
//! Fixtures are parsed from JSON text so decimal literals keep their scale.

use audit_types::Record;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// A record that passes every rule
pub(crate) const VALID_ORDER: &str = r#"{
    "order_id": "O-1",
    "user_id": "U-1",
    "currency": "USD",
    "items": [{"sku": "A", "qty": 2, "price": 10.00}],
    "discounts": [],
    "total_amount": 20.00,
    "created_at": "2024-03-01T10:00:00Z",
    "updated_at": "2024-03-01T11:00:00Z",
    "metadata": {"channel": "web"}
}"#;

/// Fixed evaluation time: 2024-06-01T00:00:00 UTC
pub(crate) fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid fixture date")
}

pub(crate) fn valid_order() -> Record {
    record(VALID_ORDER)
}

/// Valid order with top-level keys replaced, or removed when set to `null`
pub(crate) fn order_with(overrides: &str) -> Record {
    let mut base: Value = serde_json::from_str(VALID_ORDER).expect("fixture parses");
    let overrides: Value = serde_json::from_str(overrides).expect("override parses");

    if let (Some(object), Value::Object(overrides)) = (base.as_object_mut(), overrides) {
        for (key, value) in overrides {
            if value.is_null() {
                object.remove(&key);
            } else {
                object.insert(key, value);
            }
        }
    }
    Record::from_value(base).expect("fixture decodes")
}

pub(crate) fn record(json: &str) -> Record {
    Record::from_json_slice(json.as_bytes()).expect("fixture decodes")
}
