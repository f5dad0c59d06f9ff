//! # Order Audit Service
//!
//! ## Purpose
//!
//! Batch auditor for exported order data. Streams JSON order records through
//! the `audit-rules` engine and reports the findings as a console summary,
//! an HTML dashboard and, optionally, a flat CSV export.
//!
//! ## Architecture Role
//!
//! ```text
//! input file ─→ ObjectFramer ─→ decode_record ─→ RecordProcessor ─→ ValidationContext
//!                                                    │                     │
//!                                                    ↓                     ↓
//!                                             RecordSink (CSV)    console + HTML dashboard
//! ```
//!
//! ## Commands
//!
//! - `validate`: full pipeline plus reports
//! - `convert`: framing, decoding and CSV export only

pub mod cli;
pub mod commands;
pub mod decode;
pub mod error;
pub mod processor;
pub mod report;

pub use decode::{decode_record, ObjectFramer, RawObject};
pub use error::{AuditError, Result};
pub use processor::{RecordProcessor, RecordSink, RunStats};
