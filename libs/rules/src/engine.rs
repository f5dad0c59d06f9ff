//! # Rule Engine
//!
//! Fixed, ordered dispatch over the audit rules.
//!
//! Rules come in two shapes. A [`RecordRule`] judges one record in isolation
//! and only gets a shared borrow of the [`ValidationContext`]. A
//! [`CrossRecordRule`] gets the seen-order-id set mutably and nothing else.
//! The engine is the only place that hands out that mutable borrow.

use crate::context::{SeenOrderIds, ValidationContext};
use crate::rules::{DataLogicRule, DuplicateOrderRule, FinancialRule, SecurityRule, StructuralRule};
use audit_types::{Record, RecordPosition, ValidationResult};
use tracing::{debug, trace};

/// Check that reads a record and the run context without changing either
pub trait RecordRule: Send + Sync {
    /// Stable rule name used in logs
    fn name(&self) -> &'static str;

    /// Append any findings for `record` to `result`
    fn check(&self, record: &Record, context: &ValidationContext, result: &mut ValidationResult);
}

/// Check that depends on records seen earlier in the run
pub trait CrossRecordRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, record: &Record, seen: &mut SeenOrderIds, result: &mut ValidationResult);
}

/// One registered rule
pub enum RuleSlot {
    Stateless(Box<dyn RecordRule>),
    CrossRecord(Box<dyn CrossRecordRule>),
}

impl RuleSlot {
    pub fn name(&self) -> &'static str {
        match self {
            RuleSlot::Stateless(rule) => rule.name(),
            RuleSlot::CrossRecord(rule) => rule.name(),
        }
    }
}

/// Ordered rule battery applied to every record
pub struct RuleEngine {
    slots: Vec<RuleSlot>,
}

impl RuleEngine {
    /// The standard battery: structural, data_logic, financial, security, cross_record
    pub fn standard() -> Self {
        let engine = Self {
            slots: vec![
                RuleSlot::Stateless(Box::new(StructuralRule)),
                RuleSlot::Stateless(Box::new(DataLogicRule)),
                RuleSlot::Stateless(Box::new(FinancialRule)),
                RuleSlot::Stateless(Box::new(SecurityRule)),
                RuleSlot::CrossRecord(Box::new(DuplicateOrderRule)),
            ],
        };
        debug!(rules = ?engine.rule_names(), "Rule engine initialized");
        engine
    }

    /// Run every rule, in order, against one record.
    ///
    /// Never short-circuits; a record collects findings from all rules.
    pub fn evaluate(
        &self,
        record: &Record,
        position: RecordPosition,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new(position);

        for slot in &self.slots {
            let before = result.errors().len();
            match slot {
                RuleSlot::Stateless(rule) => rule.check(record, context, &mut result),
                RuleSlot::CrossRecord(rule) => {
                    rule.check(record, context.seen_order_ids_mut(), &mut result)
                }
            }
            let added = result.errors().len() - before;
            if added > 0 {
                trace!(%position, rule = slot.name(), added, "Rule reported findings");
            }
        }

        result
    }

    /// Registered rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.slots.iter().map(RuleSlot::name).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}
