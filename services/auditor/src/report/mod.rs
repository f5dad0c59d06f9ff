//! Run reporting: console summary, CSV export and HTML dashboard
//!
//! Reporters read the [`ValidationContext`](audit_rules::ValidationContext)
//! accessors only, after the last record has been captured. The CSV
//! exporter is the exception: it runs as a record sink during processing.

pub mod console;
pub mod csv_export;
pub mod html;

pub use console::write_summary;
pub use csv_export::{CsvExporter, CSV_COLUMNS, CSV_HEADER};
pub use html::{escape_html, render_dashboard, write_dashboard, DashboardOptions, Scores};
