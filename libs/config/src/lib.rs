//! # Order Audit Configuration
//!
//! Run configuration shared by the auditor binary: log settings, report
//! destinations and retention limits.
//!
//! ## Sources
//!
//! 1. Built-in defaults ([`AuditConfig::default`])
//! 2. Optional TOML file passed with `--config`
//! 3. `ORDER_AUDIT__<SECTION>__<KEY>` environment variables
//!
//! Rule thresholds are not configuration; see `audit_rules::constants`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use audit_config::AuditConfig;
//!
//! let config = AuditConfig::load(None)?;
//! println!("report: {}", config.output.html_report.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod audit_config;

pub use audit_config::{AuditConfig, LimitsConfig, LoggingConfig, OutputConfig, ENV_PREFIX, ENV_SEPARATOR};
