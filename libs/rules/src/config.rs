//! # Context Limits
//!
//! Bounds on what the [`ValidationContext`](crate::ValidationContext) retains
//! for reporting. Counters are never capped; only the stored lists are.

use crate::constants::DEFAULT_MAX_VALID_SUMMARIES;

/// Retention limits for a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLimits {
    /// Maximum number of valid-record summaries kept
    pub max_valid_summaries: usize,

    /// Maximum failures kept per category, `None` keeps every failure
    pub max_failures_per_category: Option<usize>,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_valid_summaries: DEFAULT_MAX_VALID_SUMMARIES,
            max_failures_per_category: None,
        }
    }
}

impl ContextLimits {
    pub fn with_max_valid_summaries(mut self, max: usize) -> Self {
        self.max_valid_summaries = max;
        self
    }

    pub fn with_failure_cap(mut self, cap: usize) -> Self {
        self.max_failures_per_category = Some(cap);
        self
    }

    /// Whether a bucket currently holding `len` failures may take another
    pub(crate) fn admits_failure(&self, len: usize) -> bool {
        self.max_failures_per_category.map_or(true, |cap| len < cap)
    }
}
