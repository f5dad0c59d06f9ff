//! # Order Audit Rule Engine
//!
//! ## Purpose
//!
//! The "rules" layer of the order audit: a fixed, ordered battery of checks
//! run against every decoded record, and the run-scoped context that
//! accumulates cross-record state and aggregate statistics.
//!
//! ## Architecture Role
//!
//! ```text
//! Record → RuleEngine ──────────────────────────→ ValidationResult → ValidationContext
//!             │ structural → data_logic → financial       ↑                │
//!             │ → security  (read-only &ValidationContext) │                ↓
//!             └ cross_record (&mut SeenOrderIds) ──────────┘        read accessors
//!                                                                   (reporters)
//! ```
//!
//! ## Rule Order
//!
//! 1. **structural**: missing fields and unknown top-level keys
//! 2. **data_logic**: identifier formats, allowed currencies, timestamp ordering
//! 3. **financial**: item sanity, discount sanity, declared vs computed totals
//! 4. **security**: high-risk currencies and literal injection markers
//! 5. **cross_record**: duplicate order ids across the run
//!
//! Every rule runs for every record. Only `cross_record` can write to shared
//! state, and it only ever sees the seen-order-id set.
//!
//! ## What This Crate Does NOT Contain
//! - JSON stream framing or decoding (auditor service)
//! - CSV or HTML rendering (auditor service)
//! - Configuration file loading (`audit-config`)

pub mod config;
pub mod constants;
pub mod context;
pub mod engine;
pub mod rules;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ContextLimits;
pub use context::{SeenOrderIds, ValidationContext};
pub use engine::{CrossRecordRule, RecordRule, RuleEngine, RuleSlot};
pub use rules::{DataLogicRule, DuplicateOrderRule, FinancialRule, SecurityRule, StructuralRule};
