//! # Record Processor
//!
//! ## Purpose
//!
//! Orchestrates one audit run: frames the input, decodes each object, runs
//! it through the [`RuleEngine`], forwards it to registered sinks, and folds
//! the outcome into the [`ValidationContext`].
//!
//! ## Per-Record Flow
//!
//! ```text
//! RawObject ─→ decode_record ─┬─ Err ─→ warn!, skipped (not counted)
//!                             └─ Ok(Record)
//!                                  │ increment_total
//!                                  │ RuleEngine::evaluate
//!                                  │ RecordSink::accept  (each sink)
//!                                  └ capture_errors
//! ```
//!
//! Stream I/O failures and sink failures abort the run. Malformed objects
//! never do.

use crate::decode::{decode_record, ObjectFramer};
use crate::error::{AuditError, Result};
use audit_rules::{RuleEngine, ValidationContext};
use audit_types::{Record, RecordPosition};
use std::io::{self, BufRead};
use tracing::{debug, info, warn};

/// Per-record observer fed by the processor, in stream order
pub trait RecordSink {
    /// Name used in error reports and logs
    fn name(&self) -> &'static str;

    /// Observe one decoded record
    fn accept(&mut self, record: &Record) -> io::Result<()>;

    /// Called once after the last record
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn accept(&mut self, record: &Record) -> io::Result<()> {
        (**self).accept(record)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// Object counts for one pass over the input
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub objects_framed: u64,
    pub records_decoded: u64,
    pub records_skipped: u64,
}

/// Drives records through the rule engine into the validation context
pub struct RecordProcessor<'s> {
    engine: RuleEngine,
    context: ValidationContext,
    sinks: Vec<Box<dyn RecordSink + 's>>,
}

impl<'s> RecordProcessor<'s> {
    pub fn new(engine: RuleEngine, context: ValidationContext) -> Self {
        Self {
            engine,
            context,
            sinks: Vec::new(),
        }
    }

    /// Register a sink that sees every decoded record
    pub fn with_sink(mut self, sink: impl RecordSink + 's) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Process every object in `reader`.
    ///
    /// Returns only on end of input, a stream I/O failure, or a sink failure.
    pub fn process<R: BufRead>(&mut self, reader: R) -> Result<RunStats> {
        let mut stats = RunStats::default();

        for raw in ObjectFramer::new(reader) {
            let raw = raw?;
            stats.objects_framed += 1;

            match decode_record(&raw) {
                Ok(record) => {
                    stats.records_decoded += 1;
                    self.handle(&record, raw.position)?;
                }
                Err(error) => {
                    stats.records_skipped += 1;
                    warn!(position = %raw.position, error = %error, "Skipping malformed record");
                }
            }
        }

        for sink in &mut self.sinks {
            sink.finish().map_err(|source| AuditError::Sink {
                sink: sink.name(),
                source,
            })?;
        }

        info!(
            framed = stats.objects_framed,
            decoded = stats.records_decoded,
            skipped = stats.records_skipped,
            valid = self.context.valid_records(),
            invalid = self.context.invalid_records(),
            "Input processed"
        );
        Ok(stats)
    }

    fn handle(&mut self, record: &Record, position: RecordPosition) -> Result<()> {
        self.context.increment_total();
        let result = self.engine.evaluate(record, position, &mut self.context);

        for sink in &mut self.sinks {
            sink.accept(record).map_err(|source| AuditError::Sink {
                sink: sink.name(),
                source,
            })?;
        }

        debug!(%position, errors = result.errors().len(), "Record evaluated");
        self.context.capture_errors(record, result);
        Ok(())
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    pub fn into_context(self) -> ValidationContext {
        self.context
    }
}
