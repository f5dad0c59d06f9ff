//! Structural completeness: required fields and schema drift

use crate::context::ValidationContext;
use crate::engine::RecordRule;
use audit_types::{Category, Record, Severity, ValidationResult};

/// Flags absent required fields and unrecognized top-level keys
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralRule;

impl RecordRule for StructuralRule {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn check(&self, record: &Record, _context: &ValidationContext, result: &mut ValidationResult) {
        let required = [
            (record.order_id.is_none(), "Missing order_id"),
            (record.user_id.is_none(), "Missing user_id"),
            (record.currency.is_none(), "Missing currency"),
            (!record.has_items(), "Items missing or empty"),
            (record.total_amount.is_none(), "Missing total_amount"),
            (record.created_at.is_none(), "Missing created_at"),
            (record.updated_at.is_none(), "Missing updated_at"),
        ];

        for (missing, message) in required {
            if missing {
                result.add(message, Severity::High, Category::Schema);
            }
        }

        if record.channel().is_none() {
            result.add("Missing metadata.channel", Severity::Medium, Category::Schema);
        }

        // BTreeMap iteration gives sorted key order
        for key in record.unknown_fields.keys() {
            result.add(
                format!("Unknown field detected: {key}"),
                Severity::Medium,
                Category::Schema,
            );
        }
    }
}
