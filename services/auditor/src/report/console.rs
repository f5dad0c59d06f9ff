//! Console run summary

use audit_rules::ValidationContext;
use std::io::{self, Write};
use std::path::Path;

/// Write the end-of-run summary
pub fn write_summary<W: Write>(
    out: &mut W,
    context: &ValidationContext,
    html_report: Option<&Path>,
) -> io::Result<()> {
    writeln!(out, "Processing Complete.")?;
    writeln!(out, "Total: {}", context.total_records())?;
    writeln!(out, "Valid: {}", context.valid_records())?;
    writeln!(out, "Invalid: {}", context.invalid_records())?;
    if let Some(path) = html_report {
        writeln!(out, "See {} for details.", path.display())?;
    }
    Ok(())
}
