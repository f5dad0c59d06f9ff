//! Subcommand execution
//!
//! Each command resolves its paths against the loaded [`AuditConfig`], with
//! command line flags taking precedence.

use crate::cli::{ConvertArgs, ValidateArgs};
use crate::decode::{decode_record, ObjectFramer};
use crate::processor::{RecordProcessor, RunStats};
use crate::report::{write_dashboard, write_summary, CsvExporter, DashboardOptions};
use anyhow::{Context, Result};
use audit_config::AuditConfig;
use audit_rules::{ContextLimits, RuleEngine, ValidationContext};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a validate run produced
#[derive(Debug)]
pub struct ValidateOutcome {
    pub stats: RunStats,
    pub context: ValidationContext,
    pub html_report: PathBuf,
    pub csv_export: Option<PathBuf>,
}

/// What a convert run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub output: PathBuf,
    pub records_written: u64,
    pub rows_written: u64,
    pub records_skipped: u64,
}

/// Startup diagnostics; call once tracing is installed
pub fn log_startup(config_path: Option<&Path>, config: &AuditConfig) {
    info!("Starting order audit");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match config_path {
        Some(path) => info!("Configuration file: {}", path.display()),
        None => info!("No configuration file given, using defaults and environment"),
    }
    info!(
        html_report = %config.output.html_report.display(),
        max_valid_summaries = config.limits.max_valid_summaries,
        max_failures_per_category = ?config.limits.max_failures_per_category,
        max_report_rows = config.limits.max_report_rows,
        "Configuration loaded"
    );
    debug!(?config, "Effective configuration");
}

/// Run validation, write reports, and print the summary to `out`
pub fn run_validate<W: Write>(args: &ValidateArgs, config: &AuditConfig, out: &mut W) -> Result<ValidateOutcome> {
    let html_report = args.html.clone().unwrap_or_else(|| config.output.html_report.clone());
    let csv_export = args
        .csv
        .then(|| args.csv_path.clone().unwrap_or_else(|| config.output.csv_export.clone()));

    info!(
        input = %args.input.display(),
        html_report = %html_report.display(),
        csv_export = ?csv_export,
        "Starting validation run"
    );

    let reader = open_input(&args.input)?;
    let context = ValidationContext::new(context_limits(config));
    let engine = RuleEngine::standard();

    let (stats, context) = match &csv_export {
        Some(path) => {
            let mut exporter = CsvExporter::new(create_output(path)?)
                .with_context(|| format!("Failed to write CSV header to {}", path.display()))?;
            let mut processor = RecordProcessor::new(engine, context).with_sink(&mut exporter);
            let stats = processor.process(reader).context("Validation run aborted")?;
            let context = processor.into_context();
            info!("CSV export written: {} ({} rows)", path.display(), exporter.rows_written());
            (stats, context)
        }
        None => {
            let mut processor = RecordProcessor::new(engine, context);
            let stats = processor.process(reader).context("Validation run aborted")?;
            (stats, processor.into_context())
        }
    };

    let options = DashboardOptions::new(config.limits.max_report_rows);
    write_dashboard(&html_report, &context, &options)?;

    write_summary(out, &context, Some(&html_report)).context("Failed to write console summary")?;

    info!(
        total = context.total_records(),
        valid = context.valid_records(),
        invalid = context.invalid_records(),
        "Validation run complete"
    );

    Ok(ValidateOutcome {
        stats,
        context,
        html_report,
        csv_export,
    })
}

/// Convert records to CSV without running any rules
pub fn run_convert(args: &ConvertArgs, config: &AuditConfig) -> Result<ConvertOutcome> {
    let output = args.output.clone().unwrap_or_else(|| config.output.converted_csv.clone());
    info!("Converting {} to {}", args.input.display(), output.display());

    let reader = open_input(&args.input)?;
    let mut exporter = CsvExporter::new(create_output(&output)?)
        .with_context(|| format!("Failed to write CSV header to {}", output.display()))?;
    let mut records_skipped = 0;

    for raw in ObjectFramer::new(reader) {
        let raw = raw.context("Failed to read input stream")?;
        match decode_record(&raw) {
            Ok(record) => exporter
                .write_record(&record)
                .with_context(|| format!("Failed to write CSV row to {}", output.display()))?,
            Err(error) => {
                records_skipped += 1;
                warn!(position = %raw.position, error = %error, "Skipping malformed record");
            }
        }
    }
    exporter
        .finish()
        .with_context(|| format!("Failed to flush {}", output.display()))?;

    info!(
        records = exporter.records_written(),
        rows = exporter.rows_written(),
        skipped = records_skipped,
        "Conversion complete: {}",
        output.display()
    );

    Ok(ConvertOutcome {
        records_written: exporter.records_written(),
        rows_written: exporter.rows_written(),
        records_skipped,
        output,
    })
}

fn context_limits(config: &AuditConfig) -> ContextLimits {
    ContextLimits {
        max_valid_summaries: config.limits.max_valid_summaries,
        max_failures_per_category: config.limits.max_failures_per_category,
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open input file {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
