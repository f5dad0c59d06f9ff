//! End-to-end runs of the validate and convert commands against files

use audit_config::AuditConfig;
use audit_types::Category;
use order_audit::cli::{ConvertArgs, ValidateArgs};
use order_audit::commands::{run_convert, run_validate};
use order_audit::report::CSV_HEADER;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const RECORDS: &str = r#"[
  {"order_id": "O-1", "user_id": "U-1", "currency": "USD",
   "items": [{"sku": "A", "qty": 2, "price": 10.00}], "discounts": [],
   "total_amount": 20.00, "created_at": "2024-03-01T10:00:00Z",
   "updated_at": "2024-03-01T11:00:00Z", "metadata": {"channel": "web"}},
  {"order_id": "O-2", "items": "not a list"},
  {"order_id": "O-1", "user_id": "U-2", "currency": "BTC",
   "items": [{"sku": "A", "qty": 1, "price": 5.00}, {"sku": "B", "qty": 1, "price": 5.00}],
   "total_amount": 12.00, "created_at": "2024-03-01T10:00:00Z",
   "updated_at": "2024-03-01T11:00:00Z", "metadata": {"channel": "web"}, "foo": 1}
]"#;

fn write_input(dir: &Path) -> std::path::PathBuf {
    let input = dir.join("records.json");
    fs::write(&input, RECORDS).unwrap();
    input
}

#[test]
fn test_validate_writes_reports_and_summary() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let html = dir.path().join("report.html");
    let csv = dir.path().join("export.csv");

    let args = ValidateArgs {
        input,
        csv: true,
        csv_path: Some(csv.clone()),
        html: Some(html.clone()),
        config: None,
    };
    let mut stdout = Vec::new();
    let outcome = run_validate(&args, &AuditConfig::default(), &mut stdout).unwrap();

    // Malformed middle object is skipped and not counted
    assert_eq!(outcome.stats.objects_framed, 3);
    assert_eq!(outcome.stats.records_skipped, 1);
    let context = &outcome.context;
    assert_eq!(context.total_records(), 2);
    assert_eq!(context.valid_records(), 1);
    assert_eq!(context.invalid_records(), 1);

    let duplicate = context
        .failures(Category::Business)
        .iter()
        .find(|failure| failure.error.message() == "Duplicate order id detected: O-1")
        .unwrap();
    assert_eq!(duplicate.position.get(), 3);
    assert_eq!(context.failures(Category::Security).len(), 1);

    let summary = String::from_utf8(stdout).unwrap();
    assert!(summary.contains("Total: 2"));
    assert!(summary.contains("Invalid: 1"));
    assert!(summary.contains("report.html"));

    let report = fs::read_to_string(&html).unwrap();
    assert!(report.contains("Validation Dashboard"));
    assert!(report.contains("Duplicate order id detected: O-1"));

    let exported = fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    // One row for the first order, two for the second
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_validate_without_csv_uses_configured_report_path() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());

    let mut config = AuditConfig::default();
    config.output.html_report = dir.path().join("configured.html");

    let args = ValidateArgs {
        input,
        csv: false,
        csv_path: None,
        html: None,
        config: None,
    };
    let outcome = run_validate(&args, &config, &mut Vec::new()).unwrap();

    assert_eq!(outcome.csv_export, None);
    assert_eq!(outcome.html_report, config.output.html_report);
    assert!(outcome.html_report.exists());
}

#[test]
fn test_missing_input_names_the_path() {
    let dir = tempdir().unwrap();
    let args = ValidateArgs {
        input: dir.path().join("absent.json"),
        csv: false,
        csv_path: None,
        html: Some(dir.path().join("report.html")),
        config: None,
    };

    let err = run_validate(&args, &AuditConfig::default(), &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_convert_writes_rows_without_validation() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("rows.csv");

    let outcome = run_convert(
        &ConvertArgs {
            input,
            output: Some(output.clone()),
            config: None,
        },
        &AuditConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.records_written, 2);
    assert_eq!(outcome.rows_written, 3);
    assert_eq!(outcome.records_skipped, 1);

    let rows = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = rows.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "O-1,U-1,USD,20.00,2024-03-01T10:00:00Z,2024-03-01T11:00:00Z,web,0.00,A,2,10.00");
    assert!(lines[2].starts_with("O-1,U-2,BTC,12.00,"));
    assert!(lines[3].starts_with("O-1,U-2,BTC,12.00,"));
}
