//! # Validation Context
//!
//! Run-scoped accumulator shared by the rule engine and the reporters.
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──→ per record: increment_total → RuleEngine::evaluate → capture_errors ──→ read accessors
//! ```
//!
//! The context is created once per run and never reset. Reporters only read
//! it after the last record has been captured.
//!
//! ## Aggregates
//!
//! Severity and category counters are fixed-size arrays indexed by the enum
//! ordinal, so every level and category is always present with a zero default.

use crate::config::ContextLimits;
use audit_types::{Category, Record, RecordPosition, Severity, ValidationFailure, ValidationResult};
use chrono::{NaiveDateTime, Utc};
use std::collections::HashSet;
use tracing::trace;

/// Order ids seen so far in the run
#[derive(Debug, Default)]
pub struct SeenOrderIds {
    ids: HashSet<String>,
}

impl SeenOrderIds {
    /// Record a sighting of `order_id`.
    ///
    /// Returns `true` on the first sighting and `false` for every repeat. The
    /// lookup and the insert happen in one call.
    pub fn record_sighting(&mut self, order_id: &str) -> bool {
        if self.ids.contains(order_id) {
            return false;
        }
        self.ids.insert(order_id.to_owned())
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.ids.contains(order_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Counts, cross-record state and retained findings for one run
#[derive(Debug)]
pub struct ValidationContext {
    limits: ContextLimits,
    reference_time: NaiveDateTime,

    total_records: u64,
    valid_records: u64,
    invalid_records: u64,

    seen_order_ids: SeenOrderIds,

    failures: [Vec<ValidationFailure>; Category::COUNT],
    dropped_failures: [u64; Category::COUNT],
    severity_counts: [u64; Severity::COUNT],
    category_counts: [u64; Category::COUNT],

    valid_summaries: Vec<String>,
}

impl ValidationContext {
    /// Create a context evaluated against the current UTC time
    pub fn new(limits: ContextLimits) -> Self {
        Self::with_reference_time(limits, Utc::now().naive_utc())
    }

    /// Create a context with a fixed evaluation time (UTC)
    pub fn with_reference_time(limits: ContextLimits, reference_time: NaiveDateTime) -> Self {
        Self {
            limits,
            reference_time,
            total_records: 0,
            valid_records: 0,
            invalid_records: 0,
            seen_order_ids: SeenOrderIds::default(),
            failures: Default::default(),
            dropped_failures: [0; Category::COUNT],
            severity_counts: [0; Severity::COUNT],
            category_counts: [0; Category::COUNT],
            valid_summaries: Vec::new(),
        }
    }

    /// Count one record entering evaluation, whatever its outcome
    pub fn increment_total(&mut self) {
        self.total_records += 1;
    }

    /// Fold one record's findings into the run aggregates.
    ///
    /// Call exactly once per record after every rule has run.
    pub fn capture_errors(&mut self, record: &Record, result: ValidationResult) {
        let position = result.position();

        if !result.has_errors() {
            self.valid_records += 1;
            if self.valid_summaries.len() < self.limits.max_valid_summaries {
                self.valid_summaries.push(valid_summary(position, record));
            }
            return;
        }

        self.invalid_records += 1;
        let order_id = record.order_id_or_na().to_owned();
        trace!(%position, order_id = %order_id, errors = result.errors().len(), "Capturing findings");

        for error in result.into_errors() {
            let category = error.category();
            self.severity_counts[error.severity().index()] += 1;
            self.category_counts[category.index()] += 1;

            let bucket = &mut self.failures[category.index()];
            if self.limits.admits_failure(bucket.len()) {
                bucket.push(ValidationFailure {
                    order_id: order_id.clone(),
                    position,
                    error,
                });
            } else {
                self.dropped_failures[category.index()] += 1;
            }
        }
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn valid_records(&self) -> u64 {
        self.valid_records
    }

    pub fn invalid_records(&self) -> u64 {
        self.invalid_records
    }

    pub fn severity_count(&self, severity: Severity) -> u64 {
        self.severity_counts[severity.index()]
    }

    /// Every severity level with its count, in ordinal order
    pub fn severity_counts(&self) -> [(Severity, u64); Severity::COUNT] {
        Severity::ALL.map(|severity| (severity, self.severity_count(severity)))
    }

    pub fn category_count(&self, category: Category) -> u64 {
        self.category_counts[category.index()]
    }

    /// Every category with its count, in report order
    pub fn category_counts(&self) -> [(Category, u64); Category::COUNT] {
        Category::ALL.map(|category| (category, self.category_count(category)))
    }

    /// Retained failures for one category, in capture order
    pub fn failures(&self, category: Category) -> &[ValidationFailure] {
        &self.failures[category.index()]
    }

    /// Every category with its retained failures, in report order
    pub fn failures_by_category(&self) -> impl Iterator<Item = (Category, &[ValidationFailure])> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.failures(category)))
    }

    /// Failures counted but not retained because of the per-category cap
    pub fn dropped_failures(&self, category: Category) -> u64 {
        self.dropped_failures[category.index()]
    }

    /// Summaries of the first valid records, up to the configured limit
    pub fn valid_summaries(&self) -> &[String] {
        &self.valid_summaries
    }

    /// Evaluation time used by time-relative rules
    pub fn reference_time(&self) -> NaiveDateTime {
        self.reference_time
    }

    pub fn limits(&self) -> &ContextLimits {
        &self.limits
    }

    pub fn seen_order_ids(&self) -> &SeenOrderIds {
        &self.seen_order_ids
    }

    /// Write access for the cross-record rule, handed out by the engine only
    pub(crate) fn seen_order_ids_mut(&mut self) -> &mut SeenOrderIds {
        &mut self.seen_order_ids
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(ContextLimits::default())
    }
}

fn valid_summary(position: RecordPosition, record: &Record) -> String {
    let amount = record
        .total_amount
        .map(|amount| amount.to_string())
        .unwrap_or_else(|| "0.00".to_string());

    format!(
        "Record {}: Order {} | User {} | Amount {} {}",
        position,
        record.order_id_or_na(),
        record.user_id.as_deref().unwrap_or("N/A"),
        amount,
        record.currency.as_deref().unwrap_or_default(),
    )
}
