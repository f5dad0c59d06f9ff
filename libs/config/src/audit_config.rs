//! Audit Run Configuration
//!
//! Layered loading for the order audit:
//! built-in defaults, then an optional TOML file, then `ORDER_AUDIT__*`
//! environment variables (`__` separates nested keys).

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ORDER_AUDIT";

/// Separator between prefix and nested keys in environment variables
pub const ENV_SEPARATOR: &str = "__";

/// Complete run configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AuditConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub limits: LimitsConfig,
}

/// Log output settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,

    /// Emit JSON lines instead of human readable text
    pub json: bool,
}

/// Report and export destinations
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub html_report: PathBuf,

    /// CSV written by `validate --csv`
    pub csv_export: PathBuf,

    /// CSV written by `convert`
    pub converted_csv: PathBuf,
}

/// Retention and display bounds
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_valid_summaries: usize,

    /// Unset keeps every failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_failures_per_category: Option<usize>,

    /// Rows shown per dashboard section
    pub max_report_rows: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_report: PathBuf::from("validation_report.html"),
            csv_export: PathBuf::from("output.csv"),
            converted_csv: PathBuf::from("source_records.csv"),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_valid_summaries: 5000,
            max_failures_per_category: None,
            max_report_rows: 5000,
        }
    }
}

impl AuditConfig {
    /// Load configuration, reading `path` when given and applying env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`AuditConfig::load`] with an explicit environment map instead
    /// of the process environment when `env` is `Some`
    fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let defaults = Config::try_from(&AuditConfig::default())
            .context("Failed to encode default configuration")?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = path {
            info!("Loading configuration file: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );

        let config: AuditConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        let config = config.expand_paths()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Reject limits that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_valid_summaries == 0 {
            bail!("limits.max_valid_summaries must be greater than zero");
        }
        if self.limits.max_report_rows == 0 {
            bail!("limits.max_report_rows must be greater than zero");
        }
        if self.limits.max_failures_per_category == Some(0) {
            bail!("limits.max_failures_per_category must be greater than zero when set");
        }
        Ok(())
    }

    /// Expand `~` and environment variables in output paths
    pub fn expand_paths(mut self) -> Result<Self> {
        let output = &mut self.output;
        for (name, path) in [
            ("output.html_report", &mut output.html_report),
            ("output.csv_export", &mut output.csv_export),
            ("output.converted_csv", &mut output.converted_csv),
        ] {
            // Non UTF-8 paths are used as given
            let Some(raw) = path.to_str() else {
                continue;
            };
            let expanded = shellexpand::full(raw)
                .with_context(|| format!("Failed to expand {name}"))?;
            *path = PathBuf::from(expanded.as_ref());
        }
        Ok(self)
    }
}
