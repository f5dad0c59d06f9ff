//! Duplicate order detection across the run

use crate::context::SeenOrderIds;
use crate::engine::CrossRecordRule;
use audit_types::{Category, Record, Severity, ValidationResult};
use tracing::debug;

/// Flags every occurrence of an order id after the first
#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicateOrderRule;

impl CrossRecordRule for DuplicateOrderRule {
    fn name(&self) -> &'static str {
        "cross_record"
    }

    fn check(&self, record: &Record, seen: &mut SeenOrderIds, result: &mut ValidationResult) {
        let Some(order_id) = record.order_id.as_deref() else {
            return;
        };

        if !seen.record_sighting(order_id) {
            debug!(order_id, position = %result.position(), "Duplicate order id");
            result.add(
                format!("Duplicate order id detected: {order_id}"),
                Severity::High,
                Category::Business,
            );
        }
    }
}
