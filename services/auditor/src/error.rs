//! Error types for the audit pipeline

use audit_types::RecordPosition;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode record {position}: {source}")]
    Decode {
        position: RecordPosition,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record sink '{sink}' failed: {source}")]
    Sink {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AuditError>;
