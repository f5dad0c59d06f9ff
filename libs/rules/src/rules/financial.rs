//! # Financial Integrity
//!
//! Item and discount sanity plus the declared-versus-computed total check.
//!
//! ```text
//! items_total     = Σ price × qty      (items with both fields present)
//! discounts_total = Σ amount           (discounts with an amount)
//! calculated      = items_total − discounts_total
//! ```
//!
//! All arithmetic is exact and checked. When a sum leaves the decimal range
//! the record gets one overflow finding and the comparisons that depend on
//! the sums are skipped.

use crate::constants::{MAX_ITEM_PRICE, MAX_ITEM_QTY, TOTAL_TOLERANCE};
use crate::context::ValidationContext;
use crate::engine::RecordRule;
use audit_types::{Category, Decimal, Discount, Item, Record, Severity, ValidationResult};

/// Checks item values, discounts and order total consistency
#[derive(Debug, Default, Clone, Copy)]
pub struct FinancialRule;

impl RecordRule for FinancialRule {
    fn name(&self) -> &'static str {
        "financial"
    }

    fn check(&self, record: &Record, _context: &ValidationContext, result: &mut ValidationResult) {
        // Absent items are reported by the structural rule
        let Some(items) = record.items.as_deref() else {
            return;
        };

        let items_total = sum_items(items, result);
        let discounts_total = sum_discounts(record.discounts.as_deref().unwrap_or_default(), result);

        let totals = items_total.zip(discounts_total).and_then(|(gross, discounts)| {
            gross
                .checked_sub(discounts)
                .map(|calculated| (gross, discounts, calculated))
        });

        if totals.is_none() {
            financial(result, "Amount overflow while computing order total", Severity::High);
        }

        if let Some(declared) = record.total_amount {
            if let Some((_, _, calculated)) = totals {
                let within_tolerance = calculated
                    .checked_sub(declared)
                    .is_some_and(|delta| delta.abs() <= TOTAL_TOLERANCE);
                if !within_tolerance {
                    financial(
                        result,
                        format!("Calculated {calculated} != Declared {declared}"),
                        Severity::High,
                    );
                }
            }

            if declared < Decimal::ZERO {
                financial(result, "Negative total amount", Severity::High);
            }
        }

        if let Some((gross, discounts, _)) = totals {
            if discounts > gross {
                financial(result, "Discount > Gross Amount", Severity::High);
            }
        }
    }
}

/// Per-item checks and the gross sum; `None` on overflow
fn sum_items(items: &[Item], result: &mut ValidationResult) -> Option<Decimal> {
    let mut total = Some(Decimal::ZERO);

    for item in items {
        let (Some(qty), Some(price)) = (item.qty, item.price) else {
            continue;
        };

        if qty <= 0 {
            financial(result, "Item qty <= 0", Severity::High);
        }
        if price < Decimal::ZERO {
            financial(result, "Item price < 0", Severity::High);
        }
        if qty > MAX_ITEM_QTY {
            financial(result, "Qty outlier > 10,000", Severity::Medium);
        }
        if price > MAX_ITEM_PRICE {
            financial(result, "Price outlier > 10,000,000", Severity::Medium);
        }

        total = total.and_then(|sum| {
            price
                .checked_mul(Decimal::from(qty))
                .and_then(|line| sum.checked_add(line))
        });
    }

    total
}

fn sum_discounts(discounts: &[Discount], result: &mut ValidationResult) -> Option<Decimal> {
    let mut total = Some(Decimal::ZERO);

    for amount in discounts.iter().filter_map(|discount| discount.amount) {
        if amount < Decimal::ZERO {
            financial(result, "Discount amount < 0", Severity::High);
        }
        total = total.and_then(|sum| sum.checked_add(amount));
    }

    total
}

fn financial(result: &mut ValidationResult, message: impl Into<String>, severity: Severity) {
    result.add(message, severity, Category::Financial);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{order_with, record, valid_order};
    use audit_types::{RecordPosition, ValidationError};
    use pretty_assertions::assert_eq;

    fn run(record: &Record) -> Vec<ValidationError> {
        let mut result = ValidationResult::new(RecordPosition::new(1));
        FinancialRule.check(record, &ValidationContext::default(), &mut result);
        result.into_errors()
    }

    fn messages(record: &Record) -> Vec<String> {
        run(record).iter().map(|e| e.message().to_string()).collect()
    }

    #[test]
    fn test_consistent_total_passes() {
        assert!(run(&valid_order()).is_empty());
    }

    #[test]
    fn test_mismatch_carries_exact_values() {
        let errors = run(&order_with(r#"{"total_amount": 21.00}"#));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity(), Severity::High);
        assert_eq!(errors[0].category(), Category::Financial);
        assert!(errors[0].message().contains("20.00"));
        assert!(errors[0].message().contains("21.00"));
    }

    #[test]
    fn test_tolerance_is_one_cent() {
        assert!(run(&order_with(r#"{"total_amount": 20.01}"#)).is_empty());
        assert_eq!(run(&order_with(r#"{"total_amount": 20.02}"#)).len(), 1);
        assert!(run(&order_with(r#"{"total_amount": 19.99}"#)).is_empty());
    }

    #[test]
    fn test_absent_items_skip_rule() {
        assert!(run(&order_with(r#"{"items": null, "total_amount": -5}"#)).is_empty());
    }

    #[test]
    fn test_item_sanity_checks() {
        let record = order_with(
            r#"{"items": [{"qty": 0, "price": 1}, {"qty": 1, "price": -1}, {"qty": 1, "price": 2}], "total_amount": 1}"#,
        );
        assert_eq!(messages(&record), vec!["Item qty <= 0", "Item price < 0"]);
    }

    #[test]
    fn test_outliers_are_medium() {
        let record = order_with(
            r#"{"items": [{"qty": 10001, "price": 10000001}], "total_amount": 100010010001}"#,
        );
        let errors = run(&record);

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.severity() == Severity::Medium));
        assert_eq!(errors[0].message(), "Qty outlier > 10,000");
        assert_eq!(errors[1].message(), "Price outlier > 10,000,000");
    }

    #[test]
    fn test_items_missing_fields_are_ignored() {
        let record = order_with(r#"{"items": [{"sku": "A", "qty": 2}, {"price": 5}], "total_amount": 0}"#);
        assert!(run(&record).is_empty());
    }

    #[test]
    fn test_discounts_reduce_total() {
        let record = order_with(
            r#"{"discounts": [{"type": "promo", "amount": 5.00}], "total_amount": 15.00}"#,
        );
        assert!(run(&record).is_empty());
    }

    #[test]
    fn test_negative_discount_and_gross_excess() {
        let record = order_with(
            r#"{"discounts": [{"amount": -1}, {"amount": 30}], "total_amount": -9.00}"#,
        );
        assert_eq!(
            messages(&record),
            vec!["Discount amount < 0", "Negative total amount", "Discount > Gross Amount"]
        );
    }

    #[test]
    fn test_gross_excess_without_declared_total() {
        let record = order_with(r#"{"discounts": [{"amount": 25}], "total_amount": null}"#);
        assert_eq!(messages(&record), vec!["Discount > Gross Amount"]);
    }

    #[test]
    fn test_empty_items_with_nonzero_total() {
        let record = record(r#"{"items": [], "total_amount": 5}"#);
        assert_eq!(messages(&record), vec!["Calculated 0 != Declared 5"]);
    }

    #[test]
    fn test_overflow_reported_once() {
        let record = order_with(
            r#"{"items": [{"qty": 9000, "price": 70000000000000000000000000}], "total_amount": 1}"#,
        );
        let errors = run(&record);

        assert_eq!(
            errors.iter().map(|e| e.message()).collect::<Vec<_>>(),
            vec!["Price outlier > 10,000,000", "Amount overflow while computing order total"]
        );
        assert!(errors.iter().all(|e| e.category() == Category::Financial));
    }
}
