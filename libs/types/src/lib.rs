//! # Order Audit Types
//!
//! Pure data shared by every crate in the workspace: the decoded shape of an
//! order record and the taxonomy of findings produced while auditing it.
//!
//! ## Design Philosophy
//!
//! - **No Required Fields**: every record field is optional at the model level.
//!   Absence and type checks belong to the rules, never to decoding.
//! - **Exact Amounts**: prices, discounts and totals are [`Decimal`] values built
//!   from the literal JSON text, so `10.00` never becomes `9.999999`.
//! - **Schema Drift Visible**: unrecognized top-level keys are kept alongside the
//!   known fields instead of being silently dropped.
//! - **Closed Taxonomy**: [`Severity`] and [`Category`] are fixed enums with
//!   ordinal access, so aggregate tables can be plain arrays.
//!
//! ## Quick Start
//!
//! ```rust
//! use audit_types::{Category, Record, RecordPosition, Severity, ValidationError, ValidationResult};
//!
//! let record = Record::from_json_slice(br#"{"order_id": "O-1", "items": []}"#).unwrap();
//! assert_eq!(record.order_id.as_deref(), Some("O-1"));
//!
//! let mut result = ValidationResult::new(RecordPosition::new(1));
//! result.push(ValidationError::new("Missing currency", Severity::High, Category::Schema));
//! assert!(result.has_errors());
//! ```
//!
//! ## Integration Points
//!
//! - **Producers**: the stream decoder in the auditor service builds [`Record`]s.
//! - **Consumers**: `audit-rules` evaluates records and accumulates
//!   [`ValidationFailure`]s, and the reporters read them back.

pub mod record;
pub mod serde_helpers;
pub mod validation;

pub use record::{Discount, Item, Metadata, Record, KNOWN_FIELDS};
pub use validation::{
    Category, RecordPosition, Severity, ValidationError, ValidationFailure, ValidationResult,
};

/// Exact decimal type used for every monetary amount
pub use rust_decimal::Decimal;
