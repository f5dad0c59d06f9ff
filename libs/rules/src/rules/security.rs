//! Security heuristics: high-risk currencies and literal injection markers
//!
//! Matching is literal and case-sensitive. These are screening heuristics,
//! not a sanitizer.

use crate::constants::{HIGH_RISK_CURRENCIES, INJECTION_MARKERS};
use crate::context::ValidationContext;
use crate::engine::RecordRule;
use audit_types::{Category, Record, Severity, ValidationResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct SecurityRule;

impl RecordRule for SecurityRule {
    fn name(&self) -> &'static str {
        "security"
    }

    fn check(&self, record: &Record, _context: &ValidationContext, result: &mut ValidationResult) {
        if let Some(currency) = record.currency.as_deref() {
            if HIGH_RISK_CURRENCIES.contains(&currency) {
                result.add(
                    format!("High risk currency detected: {currency}"),
                    Severity::High,
                    Category::Security,
                );
            }
        }

        let scanned = [
            ("order_id", record.order_id.as_deref()),
            ("user_id", record.user_id.as_deref()),
            ("metadata.channel", record.channel()),
        ];

        for (field, value) in scanned {
            if value.is_some_and(contains_injection_marker) {
                result.add(
                    format!("Potential injection in {field}"),
                    Severity::High,
                    Category::Security,
                );
            }
        }
    }
}

fn contains_injection_marker(value: &str) -> bool {
    INJECTION_MARKERS.iter().any(|marker| value.contains(marker))
}
