//! Identifier formats, allowed currencies and timestamp ordering
//!
//! Timestamps are ISO-8601 date-times with a `T` separator and an optional
//! offset (`Z` or `±hh:mm`), optionally followed by a bracketed region such
//! as `[Europe/Paris]`. Offset timestamps are normalised to UTC; naive ones
//! are taken as UTC. Seconds and fractional seconds are optional.

use crate::constants::{ALLOWED_CURRENCIES, CREATED_AT_FUTURE_TOLERANCE_DAYS};
use crate::context::ValidationContext;
use crate::engine::RecordRule;
use audit_types::{Category, Record, Severity, ValidationResult};
use chrono::{DateTime, Duration, NaiveDateTime};
use std::borrow::Cow;
use once_cell::sync::Lazy;
use regex::Regex;

static ORDER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^O-[0-9]+$").expect("order id pattern compiles"));

static USER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^U-[0-9]+$").expect("user id pattern compiles"));

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// Checks identifier syntax, settlement currency and created/updated ordering
#[derive(Debug, Default, Clone, Copy)]
pub struct DataLogicRule;

impl RecordRule for DataLogicRule {
    fn name(&self) -> &'static str {
        "data_logic"
    }

    fn check(&self, record: &Record, context: &ValidationContext, result: &mut ValidationResult) {
        if let Some(order_id) = record.order_id.as_deref() {
            if !ORDER_ID_PATTERN.is_match(order_id) {
                result.add("Invalid order_id format", Severity::Medium, Category::Schema);
            }
        }

        if let Some(user_id) = record.user_id.as_deref() {
            if !USER_ID_PATTERN.is_match(user_id) {
                result.add("Invalid user_id format", Severity::Medium, Category::Schema);
            }
        }

        if let Some(currency) = record.currency.as_deref() {
            if !ALLOWED_CURRENCIES.contains(&currency) {
                result.add(
                    format!("Invalid currency: {currency}"),
                    Severity::Medium,
                    Category::Business,
                );
            }
        }

        if let (Some(created), Some(updated)) = (record.created_at.as_deref(), record.updated_at.as_deref()) {
            check_timestamps(created, updated, context.reference_time(), result);
        }
    }
}

fn check_timestamps(created: &str, updated: &str, now: NaiveDateTime, result: &mut ValidationResult) {
    let (Some(created), Some(updated)) = (parse_timestamp(created), parse_timestamp(updated)) else {
        result.add("Malformed timestamp format", Severity::Medium, Category::Schema);
        return;
    };

    if updated < created {
        result.add("updated_at before created_at", Severity::Medium, Category::Business);
    }

    let horizon = now.checked_add_signed(Duration::days(CREATED_AT_FUTURE_TOLERANCE_DAYS));
    if horizon.is_some_and(|horizon| created > horizon) {
        result.add("created_at in future", Severity::Medium, Category::Business);
    }
}

/// Parse an ISO-8601 date-time into a UTC wall-clock value
pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.as_bytes().get(10) != Some(&b'T') {
        return None;
    }

    // A region suffix is only valid after an explicit offset
    let (text, offset_required) = match text.strip_suffix(']').and_then(|rest| rest.rsplit_once('[')) {
        Some((stamp, _region)) => (stamp, true),
        None => (text, false),
    };

    let with_offset = match text.strip_suffix(['Z', 'z']) {
        Some(local) => Cow::Owned(format!("{local}+00:00")),
        None => Cow::Borrowed(text),
    };
    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&with_offset, format).ok())
    {
        return Some(parsed.naive_utc());
    }

    if offset_required {
        return None;
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextLimits;
    use crate::test_support::{order_with, reference_time, valid_order};
    use audit_types::{RecordPosition, ValidationError};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn run(record: &Record) -> Vec<ValidationError> {
        let context = ValidationContext::with_reference_time(ContextLimits::default(), reference_time());
        let mut result = ValidationResult::new(RecordPosition::new(1));
        DataLogicRule.check(record, &context, &mut result);
        result.into_errors()
    }

    fn messages(record: &Record) -> Vec<String> {
        run(record).iter().map(|e| e.message().to_string()).collect()
    }

    #[test]
    fn test_valid_order_passes() {
        assert!(run(&valid_order()).is_empty());
    }

    #[test]
    fn test_identifier_formats() {
        let record = order_with(r#"{"order_id": "ORD-1", "user_id": "U-12a"}"#);
        let errors = run(&record);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message(), "Invalid order_id format");
        assert_eq!(errors[1].message(), "Invalid user_id format");
        assert!(errors
            .iter()
            .all(|e| e.severity() == Severity::Medium && e.category() == Category::Schema));
    }

    #[test]
    fn test_identifier_must_match_fully() {
        assert_eq!(messages(&order_with(r#"{"order_id": "xO-1"}"#)), vec!["Invalid order_id format"]);
        assert_eq!(messages(&order_with(r#"{"order_id": "O-"}"#)), vec!["Invalid order_id format"]);
        assert_eq!(messages(&order_with(r#"{"order_id": 17}"#)), vec!["Invalid order_id format"]);
    }

    #[test]
    fn test_absent_identifiers_skipped() {
        assert!(run(&order_with(r#"{"order_id": null, "user_id": null}"#)).is_empty());
    }

    #[test]
    fn test_disallowed_currency_is_business() {
        let errors = run(&order_with(r#"{"currency": "BTC"}"#));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Invalid currency: BTC");
        assert_eq!(errors[0].category(), Category::Business);
    }

    #[test]
    fn test_updated_before_created() {
        let record = order_with(
            r#"{"created_at": "2024-03-02T10:00:00Z", "updated_at": "2024-03-01T10:00:00Z"}"#,
        );
        assert_eq!(messages(&record), vec!["updated_at before created_at"]);
    }

    #[test]
    fn test_created_in_future() {
        let record = order_with(
            r#"{"created_at": "2024-06-03T00:00:00Z", "updated_at": "2024-06-04T00:00:00Z"}"#,
        );
        assert_eq!(messages(&record), vec!["created_at in future"]);
    }

    #[test]
    fn test_created_within_one_day_is_not_future() {
        let record = order_with(
            r#"{"created_at": "2024-06-01T23:00:00", "updated_at": "2024-06-01T23:30:00"}"#,
        );
        assert!(run(&record).is_empty());
    }

    #[test]
    fn test_malformed_timestamp_reported_once() {
        let record = order_with(r#"{"created_at": "yesterday", "updated_at": "not a date"}"#);
        let errors = run(&record);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Malformed timestamp format");
        assert_eq!(errors[0].category(), Category::Schema);
    }

    #[test]
    fn test_missing_timestamp_skips_checks() {
        assert!(run(&order_with(r#"{"created_at": null, "updated_at": "garbage"}"#)).is_empty());
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();

        assert_eq!(parse_timestamp("2024-03-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:00+02:00"), Some(expected));
        assert!(parse_timestamp("2024-03-01T10:00:00.250").is_some());
        assert_eq!(parse_timestamp("2024-03-01T10:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:00:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T11:00:00+01:00[Europe/Paris]"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01"), None);
        assert_eq!(parse_timestamp("2024-13-01T10:00:00"), None);
    }

    #[test]
    fn test_parse_timestamp_rejects_non_iso_layouts() {
        assert_eq!(parse_timestamp("2024-03-01 10:00:00Z"), None);
        assert_eq!(parse_timestamp("2024-03-01 10:00:00"), None);
        assert_eq!(parse_timestamp("2024-03-01T10:00:00[Europe/Paris]"), None);
        assert_eq!(parse_timestamp("2024-03-01T10:00:00+01:00[Europe/Paris"), None);
    }

    #[test]
    fn test_minute_precision_utc_timestamps_pass() {
        let record = order_with(r#"{"created_at": "2024-03-01T10:00Z", "updated_at": "2024-03-01T11:00Z"}"#);
        assert!(run(&record).is_empty());
    }

    #[test]
    fn test_space_separated_timestamp_is_malformed() {
        let record = order_with(
            r#"{"created_at": "2024-03-01 10:00:00Z", "updated_at": "2024-03-01T11:00:00Z"}"#,
        );
        assert_eq!(messages(&record), vec!["Malformed timestamp format"]);
    }
}
