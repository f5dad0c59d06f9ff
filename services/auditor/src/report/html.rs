//! # HTML Dashboard
//!
//! Self-contained report page built from the [`ValidationContext`] read
//! accessors only.
//!
//! ## Layout
//!
//! ```text
//! header (generated at)
//! KPI cards: total | valid | invalid | quality score | security score
//! risk insights
//! charts: category distribution | severity breakdown   (Chart.js, CDN)
//! valid records sample
//! one section per category, in report order
//! ```
//!
//! ## Scores
//!
//! - quality  = valid / total × 100, or 0 for an empty run
//! - security = max(0, 100 − (5·HIGH + 2·MEDIUM + LOW) / max(total, 1) × 10)

use crate::error::{AuditError, Result};
use audit_rules::ValidationContext;
use audit_types::{Category, Severity};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;
use tracing::info;

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js";

const STYLE: &str = "\
:root { --primary: #2c3e50; --accent: #3498db; --bg: #f4f6f9; --card-bg: #ffffff; --text: #333; --border: #e0e0e0; }
body { font-family: 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; background: var(--bg); color: var(--text); margin: 0; line-height: 1.6; }
.container { max-width: 1400px; margin: 0 auto; padding: 20px; }
header { background: var(--primary); color: white; padding: 1rem 0; margin-bottom: 2rem; }
header .container { display: flex; justify-content: space-between; align-items: center; padding: 0 20px; }
h1 { margin: 0; font-size: 1.5rem; }
.timestamp { font-size: 0.9rem; opacity: 0.8; }
.kpi-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin-bottom: 2rem; }
.card { background: var(--card-bg); border-radius: 8px; padding: 20px; border-left: 4px solid var(--accent); }
.card h3 { margin: 0 0 10px 0; font-size: 0.85rem; color: #7f8c8d; text-transform: uppercase; }
.card .value { font-size: 1.8rem; font-weight: 700; color: var(--primary); }
.card.danger { border-left-color: #e74c3c; } .card.success { border-left-color: #27ae60; } .card.warning { border-left-color: #f39c12; }
.charts-row { display: grid; grid-template-columns: repeat(auto-fit, minmax(400px, 1fr)); gap: 20px; margin-bottom: 2rem; }
.chart-container { background: var(--card-bg); padding: 20px; border-radius: 8px; position: relative; height: 300px; }
.insights { background: #fff3cd; border: 1px solid #ffeeba; color: #856404; padding: 15px; border-radius: 8px; margin-bottom: 2rem; }
.insights.good { background: #d4edda; border-color: #c3e6cb; color: #155724; }
details { background: var(--card-bg); margin-bottom: 15px; border-radius: 8px; overflow: hidden; }
summary { padding: 15px 20px; cursor: pointer; font-weight: 600; display: flex; justify-content: space-between; background: #f8f9fa; }
.badge { padding: 4px 10px; border-radius: 20px; font-size: 0.75rem; color: white; }
.badge.high { background: #e74c3c; } .badge.medium { background: #f39c12; } .badge.low { background: #3498db; } .badge.valid { background: #27ae60; }
.empty { padding: 20px; color: #7f8c8d; }
table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
th, td { padding: 12px 20px; text-align: left; border-bottom: 1px solid var(--border); }
th { background: #f8f9fa; }
footer { text-align: center; padding: 2rem; color: #7f8c8d; font-size: 0.85rem; }
";

/// Rendering knobs for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Failures listed per category section
    pub max_report_rows: usize,
    pub generated_at: DateTime<Utc>,
}

impl DashboardOptions {
    pub fn new(max_report_rows: usize) -> Self {
        Self {
            max_report_rows,
            generated_at: Utc::now(),
        }
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

/// Derived headline numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub quality: f64,
    pub security: f64,
}

impl Scores {
    pub fn from_context(context: &ValidationContext) -> Self {
        let total = context.total_records();
        let quality = if total > 0 {
            context.valid_records() as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let weighted = 5 * context.severity_count(Severity::High)
            + 2 * context.severity_count(Severity::Medium)
            + context.severity_count(Severity::Low);
        let penalty = weighted as f64 / total.max(1) as f64 * 10.0;

        Self {
            quality,
            security: (100.0 - penalty).max(0.0),
        }
    }
}

/// Render the full dashboard page
pub fn render_dashboard(context: &ValidationContext, options: &DashboardOptions) -> String {
    Dashboard { context, options }.to_string()
}

/// Render and write the dashboard to `path`
pub fn write_dashboard(path: &Path, context: &ValidationContext, options: &DashboardOptions) -> Result<()> {
    fs::write(path, render_dashboard(context, options)).map_err(|source| AuditError::Report {
        path: path.to_path_buf(),
        source,
    })?;
    info!("HTML report written: {}", path.display());
    Ok(())
}

/// Escape `& < > " '` for HTML text and attribute content
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

struct Dashboard<'a> {
    context: &'a ValidationContext,
    options: &'a DashboardOptions,
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scores = Scores::from_context(self.context);

        write!(
            f,
            "<!DOCTYPE html><html lang='en'><head><meta charset='UTF-8'>\
             <title>Validation Report Dashboard</title>\
             <script src=\"{CHART_JS}\"></script><style>{STYLE}</style></head><body>"
        )?;
        write!(
            f,
            "<header><div class='container'><h1>Validation Dashboard</h1>\
             <span class='timestamp'>Generated: {}</span></div></header>",
            self.options.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        f.write_str("<div class='container'>")?;

        self.write_kpis(f, scores)?;
        self.write_insights(f, scores)?;
        f.write_str(
            "<div class='charts-row'>\
             <div class='chart-container'><h3>Category Distribution</h3><canvas id='catChart'></canvas></div>\
             <div class='chart-container'><h3>Severity Breakdown</h3><canvas id='sevChart'></canvas></div>\
             </div><h2>Detailed Diagnostics</h2>",
        )?;
        self.write_valid_sample(f)?;
        for (category, failures) in self.context.failures_by_category() {
            self.write_category(f, category, failures)?;
        }

        f.write_str("<footer>Order Audit &bull; Generated Automatically</footer>")?;
        self.write_charts(f)?;
        f.write_str("</div></body></html>\n")
    }
}

impl Dashboard<'_> {
    fn write_kpis(&self, f: &mut fmt::Formatter<'_>, scores: Scores) -> fmt::Result {
        let invalid = self.context.invalid_records();
        let quality_class = if scores.quality > 90.0 {
            "success"
        } else if scores.quality > 70.0 {
            "warning"
        } else {
            "danger"
        };
        let security_class = if scores.security > 90.0 { "success" } else { "warning" };

        f.write_str("<div class='kpi-grid'>")?;
        kpi_card(f, "Total Records", &self.context.total_records().to_string(), "")?;
        kpi_card(f, "Valid Records", &self.context.valid_records().to_string(), "success")?;
        kpi_card(
            f,
            "Invalid Records",
            &invalid.to_string(),
            if invalid > 0 { "danger" } else { "success" },
        )?;
        kpi_card(f, "Quality Score", &format!("{:.1}%", scores.quality), quality_class)?;
        kpi_card(f, "Security Score", &format!("{:.1}", scores.security), security_class)?;
        f.write_str("</div>")
    }

    fn write_insights(&self, f: &mut fmt::Formatter<'_>, scores: Scores) -> fmt::Result {
        if scores.quality > 95.0 {
            return f.write_str(
                "<div class='insights good'><h3>&#10004; Data Health Good</h3>\
                 <ul><li><b>High Validity:</b> Over 95% of records are valid.</li></ul></div>",
            );
        }

        let mut bullets = String::new();
        if scores.quality < 80.0 {
            bullets.push_str(
                "<li><b>High Failure Rate:</b> More than 20% of records failed validation. \
                 Investigate the data ingestion source.</li>",
            );
        }
        if scores.security < 70.0 {
            bullets.push_str(
                "<li><b>Security Alert:</b> Significant security risks detected. \
                 Check for injection patterns or high-risk currencies.</li>",
            );
        }
        let financial = self.context.category_count(Category::Financial);
        if financial > 10 {
            write!(
                bullets,
                "<li><b>Financial Integrity:</b> {financial} financial discrepancies detected. \
                 Review calculation logic.</li>"
            )?;
        }
        if self.context.category_count(Category::Schema) > 0 {
            bullets.push_str(
                "<li><b>Schema Drift:</b> Unexpected fields or missing mandatory data detected.</li>",
            );
        }

        if bullets.is_empty() {
            return Ok(());
        }
        write!(
            f,
            "<div class='insights'><h3>&#9888; Automated Risk Insights</h3><ul>{bullets}</ul></div>"
        )
    }

    fn write_valid_sample(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summaries = self.context.valid_summaries();
        let valid = self.context.valid_records();

        write!(
            f,
            "<details open><summary>Valid Records (Sample)<span class='badge valid'>{valid}</span></summary>"
        )?;

        if summaries.is_empty() {
            f.write_str("<div class='empty'>No valid records processed.</div>")?;
        } else {
            f.write_str("<table><thead><tr><th>Record Summary</th></tr></thead><tbody>")?;
            for summary in summaries {
                write!(f, "<tr><td>{}</td></tr>", escape_html(summary))?;
            }
            let hidden = valid.saturating_sub(summaries.len() as u64);
            if hidden > 0 {
                write!(
                    f,
                    "<tr><td><i>... and {hidden} more valid records not shown (limit {})</i></td></tr>",
                    self.context.limits().max_valid_summaries
                )?;
            }
            f.write_str("</tbody></table>")?;
        }
        f.write_str("</details>")
    }

    fn write_category(
        &self,
        f: &mut fmt::Formatter<'_>,
        category: Category,
        failures: &[audit_types::ValidationFailure],
    ) -> fmt::Result {
        let count = self.context.category_count(category);

        write!(
            f,
            "<details{}><summary>{category} Issues<span class='badge {}'>{count}</span></summary>",
            if count > 0 { " open" } else { "" },
            if count > 0 { "high" } else { "low" },
        )?;

        if count == 0 {
            f.write_str("<div class='empty'>No issues detected in this category.</div>")?;
            return f.write_str("</details>");
        }

        f.write_str(
            "<table><thead><tr><th>Order ID</th><th>Position</th><th>Severity</th>\
             <th>Description</th></tr></thead><tbody>",
        )?;

        let shown = failures.iter().take(self.options.max_report_rows);
        let mut shown_count = 0u64;
        for failure in shown {
            let severity = failure.error.severity();
            write!(
                f,
                "<tr><td>{}</td><td>{}</td><td><span class='badge {}'>{severity}</span></td><td>{}</td></tr>",
                escape_html(&failure.order_id),
                failure.position,
                severity.as_str().to_ascii_lowercase(),
                escape_html(failure.error.message()),
            )?;
            shown_count += 1;
        }

        // Covers rows beyond the display cap and failures the context dropped
        let hidden = count.saturating_sub(shown_count);
        if hidden > 0 {
            write!(f, "<tr><td colspan='4'><i>And {hidden} more...</i></td></tr>")?;
        }
        f.write_str("</tbody></table></details>")
    }

    fn write_charts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = std::iter::once("'VALID'".to_string())
            .chain(Category::ALL.iter().map(|category| format!("'{category}'")))
            .collect();
        let values: Vec<String> = std::iter::once(self.context.valid_records())
            .chain(self.context.category_counts().iter().map(|(_, count)| *count))
            .map(|value| value.to_string())
            .collect();
        let severities: Vec<String> = [Severity::High, Severity::Medium, Severity::Low]
            .iter()
            .map(|severity| self.context.severity_count(*severity).to_string())
            .collect();

        write!(
            f,
            "<script>\
             new Chart(document.getElementById('catChart').getContext('2d'), {{ type: 'doughnut', \
             data: {{ labels: [{}], datasets: [{{ data: [{}], \
             backgroundColor: ['#27ae60', '#3498db', '#e74c3c', '#f1c40f', '#9b59b6', '#2ecc71'] }}] }}, \
             options: {{ maintainAspectRatio: false }} }});\
             new Chart(document.getElementById('sevChart').getContext('2d'), {{ type: 'bar', \
             data: {{ labels: ['High', 'Medium', 'Low'], datasets: [{{ label: 'Count', data: [{}], \
             backgroundColor: ['#e74c3c', '#f39c12', '#3498db'] }}] }}, \
             options: {{ maintainAspectRatio: false, scales: {{ y: {{ beginAtZero: true }} }} }} }});\
             </script>",
            labels.join(", "),
            values.join(", "),
            severities.join(", "),
        )
    }
}

fn kpi_card(f: &mut fmt::Formatter<'_>, title: &str, value: &str, class: &str) -> fmt::Result {
    write!(
        f,
        "<div class='card {class}'><h3>{title}</h3><div class='value'>{value}</div></div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_rules::ContextLimits;
    use audit_types::{Record, RecordPosition, ValidationError, ValidationResult};
    use chrono::TimeZone;

    fn options(max_rows: usize) -> DashboardOptions {
        DashboardOptions::new(max_rows)
            .with_generated_at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    fn capture(context: &mut ValidationContext, order_id: &str, errors: &[(&str, Severity, Category)]) {
        let record = Record {
            order_id: Some(order_id.to_string()),
            ..Record::default()
        };
        let position = RecordPosition::new(context.total_records() + 1);
        let mut result = ValidationResult::new(position);
        for (message, severity, category) in errors {
            result.push(ValidationError::new(*message, *severity, *category));
        }
        context.increment_total();
        context.capture_errors(&record, result);
    }

    #[test]
    fn test_scores() {
        let mut context = ValidationContext::new(ContextLimits::default());
        assert_eq!(Scores::from_context(&context), Scores { quality: 0.0, security: 100.0 });

        capture(&mut context, "O-1", &[]);
        capture(&mut context, "O-2", &[("x", Severity::High, Category::Security)]);

        let scores = Scores::from_context(&context);
        assert!((scores.quality - 50.0).abs() < f64::EPSILON);
        // 5 / 2 * 10 = 25
        assert!((scores.security - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_security_score_floors_at_zero() {
        let mut context = ValidationContext::new(ContextLimits::default());
        capture(
            &mut context,
            "O-1",
            &[
                ("a", Severity::High, Category::Security),
                ("b", Severity::High, Category::Security),
                ("c", Severity::High, Category::Security),
            ],
        );
        assert_eq!(Scores::from_context(&context).security, 0.0);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_record_text_is_escaped() {
        let mut context = ValidationContext::new(ContextLimits::default());
        capture(
            &mut context,
            "O-1<script>",
            &[("Potential injection in order_id", Severity::High, Category::Security)],
        );

        let html = render_dashboard(&context, &options(10));
        assert!(!html.contains("O-1<script>"));
        assert!(html.contains("O-1&lt;script&gt;"));
    }

    #[test]
    fn test_sections_in_category_order() {
        let context = ValidationContext::new(ContextLimits::default());
        let html = render_dashboard(&context, &options(10));

        let offsets: Vec<usize> = Category::ALL
            .iter()
            .map(|category| html.find(&format!("{category} Issues")).unwrap())
            .collect();
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(html.contains("Generated: 2024-06-01 12:00:00 UTC"));
        assert!(html.contains("No valid records processed."));
    }

    #[test]
    fn test_rows_capped_with_remainder_note() {
        let mut context = ValidationContext::new(ContextLimits::default().with_failure_cap(4));
        for index in 0..6 {
            capture(
                &mut context,
                &format!("O-{index}"),
                &[("Missing currency", Severity::High, Category::Schema)],
            );
        }

        let html = render_dashboard(&context, &options(3));
        assert_eq!(html.matches("<td>Missing currency</td>").count(), 3);
        assert!(html.contains("And 3 more..."));
    }

    #[test]
    fn test_valid_sample_remainder() {
        let mut context = ValidationContext::new(ContextLimits::default().with_max_valid_summaries(1));
        capture(&mut context, "O-1", &[]);
        capture(&mut context, "O-2", &[]);

        let html = render_dashboard(&context, &options(10));
        assert!(html.contains("... and 1 more valid records not shown (limit 1)"));
    }

    #[test]
    fn test_insights() {
        let mut healthy = ValidationContext::new(ContextLimits::default());
        capture(&mut healthy, "O-1", &[]);
        assert!(render_dashboard(&healthy, &options(10)).contains("Data Health Good"));

        let mut drifting = ValidationContext::new(ContextLimits::default());
        capture(&mut drifting, "O-1", &[("Unknown field detected: foo", Severity::Medium, Category::Schema)]);
        let html = render_dashboard(&drifting, &options(10));
        assert!(html.contains("High Failure Rate"));
        assert!(html.contains("Schema Drift"));
        assert!(!html.contains("Data Health Good"));
    }

    #[test]
    fn test_write_dashboard_reports_path_on_failure() {
        let context = ValidationContext::new(ContextLimits::default());
        let missing_dir = Path::new("/nonexistent-order-audit-dir/report.html");

        let err = write_dashboard(missing_dir, &context, &options(10)).unwrap_err();
        assert!(matches!(err, AuditError::Report { .. }));
    }
}
