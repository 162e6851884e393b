use super::{format_number, megabytes};
use crate::types::{ColumnProfile, CorrelationPair, DatasetProfile, percentage};
use std::fmt::Write;

const STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; \
margin: 0; background: #f5f7fa; color: #333; line-height: 1.5; }
.container { max-width: 1200px; margin: 0 auto; padding: 20px; }
header { border-bottom: 1px solid #ddd; margin-bottom: 20px; }
.summary-cards, .correlation-grid, .column-grid { display: grid; gap: 20px; \
grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); }
.card, .column-card, .correlation-card { background: #fff; border-radius: 8px; \
box-shadow: 0 2px 4px rgba(0, 0, 0, 0.08); padding: 20px; margin-bottom: 20px; }
.quality-score { font-size: 48px; font-weight: bold; text-align: center; }
.score-good { color: #2e7d32; }
.score-warning { color: #f9a825; }
.score-bad { color: #c62828; }
.issues-list li { color: #c62828; }
.correlation-strong { font-weight: bold; }
.correlation-negative { color: #c62828; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #eee; }
.histogram { display: flex; align-items: flex-end; height: 100px; gap: 2px; margin-top: 12px; }
.histogram-bar { flex: 1; background: #4a90d9; min-height: 1px; }
.histogram-labels { font-size: 12px; color: #777; }
.footer { text-align: center; color: #777; font-size: 13px; margin-top: 40px; }
";

/// Render a profile as a standalone HTML page with inline styles.
pub fn render_html(profile: &DatasetProfile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_page(&mut out, profile);
    out
}

fn write_page(out: &mut String, profile: &DatasetProfile) -> std::fmt::Result {
    let filename = escape(&profile.filename);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"UTF-8\">")?;
    writeln!(out, "<title>Profile: {filename}</title>")?;
    writeln!(out, "<style>\n{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<div class=\"container\">")?;

    writeln!(out, "<header>")?;
    writeln!(out, "<h1>Profile: {filename}</h1>")?;
    writeln!(
        out,
        "<p>Generated: {} | Size: {:.2} MB | Rows: {} | Columns: {}</p>",
        profile.created_at.format("%B %-d, %Y %H:%M"),
        megabytes(profile.file_size),
        format_number(profile.row_count),
        format_number(profile.column_count)
    )?;
    writeln!(out, "</header>")?;

    writeln!(out, "<div class=\"summary-cards\">")?;
    writeln!(out, "<div class=\"card\">")?;
    writeln!(out, "<h2>Quality Score</h2>")?;
    writeln!(
        out,
        "<div class=\"quality-score {}\">{}/100</div>",
        score_class(profile.quality_score),
        profile.quality_score
    )?;
    writeln!(out, "</div>")?;

    writeln!(out, "<div class=\"card\">")?;
    writeln!(out, "<h2>Dataset Summary</h2>")?;
    writeln!(out, "<p><strong>Rows:</strong> {}</p>", format_number(profile.row_count))?;
    writeln!(
        out,
        "<p><strong>Columns:</strong> {}</p>",
        format_number(profile.column_count)
    )?;
    writeln!(
        out,
        "<p><strong>Missing cells:</strong> {} ({:.2}%)</p>",
        format_number(profile.missing_cells),
        profile.missing_percentage()
    )?;
    writeln!(
        out,
        "<p><strong>Duplicate rows:</strong> {} ({:.2}%)</p>",
        format_number(profile.duplicate_rows),
        profile.duplicate_percentage()
    )?;
    writeln!(
        out,
        "<p><strong>Processing Time:</strong> {:.2} seconds</p>",
        profile.processing_time.as_secs_f64()
    )?;
    writeln!(out, "</div>")?;

    writeln!(out, "<div class=\"card\">")?;
    writeln!(out, "<h2>Quality Issues</h2>")?;
    write_list(out, "issues-list", &profile.issue_summaries())?;
    writeln!(out, "</div>")?;
    writeln!(out, "</div>")?;

    if !profile.recommendations.is_empty() {
        writeln!(out, "<div class=\"card\">")?;
        writeln!(out, "<h2>Recommendations</h2>")?;
        write_list(out, "recommendations-list", &profile.recommendations)?;
        writeln!(out, "</div>")?;
    }

    if let Some(matrix) = profile
        .correlation_matrix
        .as_ref()
        .filter(|m| !m.top_pairs.is_empty())
    {
        writeln!(out, "<div class=\"card\">")?;
        writeln!(out, "<h2>Column Correlations</h2>")?;
        writeln!(out, "<p>Statistical relationships between numeric columns:</p>")?;
        writeln!(out, "<div class=\"correlation-grid\">")?;
        for pair in &matrix.top_pairs {
            write_correlation(out, pair)?;
        }
        writeln!(out, "</div>")?;
        writeln!(out, "</div>")?;
    }

    writeln!(out, "<h2>Column Details</h2>")?;
    writeln!(out, "<div class=\"column-grid\">")?;
    for column in profile.ordered_columns() {
        write_column(out, column, profile.row_count)?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, "<div class=\"footer\">")?;
    writeln!(
        out,
        "<p>Generated by lex-profiler v{}</p>",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "</div>")?;
    writeln!(out, "</div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_list(out: &mut String, class: &str, items: &[String]) -> std::fmt::Result {
    if items.is_empty() {
        return writeln!(out, "<p>No significant quality issues detected.</p>");
    }
    writeln!(out, "<ul class=\"{class}\">")?;
    for item in items {
        writeln!(out, "<li>{}</li>", escape(item))?;
    }
    writeln!(out, "</ul>")
}

fn write_correlation(out: &mut String, pair: &CorrelationPair) -> std::fmt::Result {
    let (class, label) = correlation_label(pair.correlation);
    writeln!(out, "<div class=\"correlation-card\">")?;
    writeln!(
        out,
        "<h3>{} &amp; {}</h3>",
        escape(&pair.column1),
        escape(&pair.column2)
    )?;
    writeln!(
        out,
        "<p>Correlation: <span class=\"{class}\">{label} ({:.2})</span></p>",
        pair.correlation
    )?;
    let reading = if pair.correlation >= 0.0 {
        "These variables tend to increase together."
    } else {
        "As one variable increases, the other tends to decrease."
    };
    writeln!(out, "<p>{reading}</p>")?;
    writeln!(out, "</div>")
}

fn write_column(out: &mut String, column: &ColumnProfile, total_rows: usize) -> std::fmt::Result {
    writeln!(out, "<div class=\"column-card\">")?;
    writeln!(
        out,
        "<h3>{} <small>({})</small></h3>",
        escape(&column.name),
        column.data_type
    )?;

    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th>Metric</th><th>Value</th></tr>")?;
    writeln!(out, "<tr><td>Count</td><td>{}</td></tr>", format_number(column.count))?;
    writeln!(
        out,
        "<tr><td>Missing</td><td>{} ({:.2}%)</td></tr>",
        format_number(column.missing_count),
        column.missing_percentage(total_rows)
    )?;
    writeln!(
        out,
        "<tr><td>Unique</td><td>{} ({:.2}%)</td></tr>",
        format_number(column.unique_count),
        column.unique_percentage()
    )?;
    let stats = [
        ("Min", column.min),
        ("Max", column.max),
        ("Mean", column.mean),
        ("Median", column.median),
        ("Std Dev", column.std_dev),
    ];
    for (label, value) in stats {
        if let Some(value) = value {
            writeln!(out, "<tr><td>{label}</td><td>{value:.2}</td></tr>")?;
        }
    }
    writeln!(out, "</table>")?;

    if let (Some(first), Some(last)) = (column.histogram.first(), column.histogram.last()) {
        let peak = column.histogram.iter().map(|b| b.count).max().unwrap_or(0);
        writeln!(out, "<div class=\"histogram\">")?;
        for bucket in &column.histogram {
            let height = if peak > 0 { bucket.count * 100 / peak } else { 0 };
            writeln!(
                out,
                "<div class=\"histogram-bar\" style=\"height: {height}%;\" \
                 title=\"{:.2} - {:.2}: {}\"></div>",
                bucket.lower_bound, bucket.upper_bound, bucket.count
            )?;
        }
        writeln!(out, "</div>")?;
        writeln!(
            out,
            "<div class=\"histogram-labels\"><span>{:.2}</span>\
             <span style=\"float: right;\">{:.2}</span></div>",
            first.lower_bound, last.upper_bound
        )?;
    } else if column.is_categorical && !column.top_values.is_empty() {
        writeln!(out, "<h4>Top Values:</h4>")?;
        writeln!(out, "<ul>")?;
        for top in &column.top_values {
            writeln!(
                out,
                "<li>{}: {} ({:.2}%)</li>",
                escape(&top.value),
                format_number(top.count),
                percentage(top.count, column.count)
            )?;
        }
        writeln!(out, "</ul>")?;
    }

    if !column.quality_issues.is_empty() {
        writeln!(out, "<h4>Quality Issues:</h4>")?;
        writeln!(out, "<ul class=\"issues-list\">")?;
        for issue in &column.quality_issues {
            writeln!(out, "<li>{}</li>", escape(&issue.description))?;
        }
        writeln!(out, "</ul>")?;
    }

    writeln!(out, "</div>")
}

fn score_class(score: u8) -> &'static str {
    match score {
        90.. => "score-good",
        70..=89 => "score-warning",
        _ => "score-bad",
    }
}

/// CSS class and wording for a coefficient, judged on its value rounded to
/// one decimal.
fn correlation_label(r: f64) -> (&'static str, &'static str) {
    let rounded = (r * 10.0).round() / 10.0;
    if rounded >= 0.7 {
        ("correlation-strong", "Strong Positive")
    } else if rounded >= 0.4 {
        ("correlation-moderate", "Moderate Positive")
    } else if rounded >= 0.1 {
        ("correlation-weak", "Weak Positive")
    } else if rounded <= -0.7 {
        ("correlation-strong correlation-negative", "Strong Negative")
    } else if rounded <= -0.4 {
        ("correlation-moderate correlation-negative", "Moderate Negative")
    } else if rounded <= -0.1 {
        ("correlation-weak correlation-negative", "Weak Negative")
    } else {
        ("correlation-negligible", "Negligible")
    }
}

/// Escape text for use in element content and quoted attributes.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CorrelationMatrix, FileFormat, HistogramBucket, InferredType, IssueKind, QualityIssue,
        Severity, ValueCount,
    };
    use std::collections::BTreeMap;

    fn profile() -> DatasetProfile {
        let mut profile = DatasetProfile::new("orders <2024>.csv", 2048, FileFormat::Csv);
        profile.row_count = 1200;
        profile.column_count = 2;
        profile.quality_score = 85;
        profile.recommendations.push("Check outliers in 'amount' column".to_string());

        let mut amount = ColumnProfile::new("amount");
        amount.data_type = InferredType::Float;
        amount.is_numeric = true;
        amount.count = 1200;
        amount.unique_count = 900;
        amount.min = Some(1.0);
        amount.max = Some(3.0);
        amount.mean = Some(2.0);
        amount.median = Some(2.0);
        amount.std_dev = Some(0.5);
        amount.histogram = vec![
            HistogramBucket { lower_bound: 1.0, upper_bound: 2.0, count: 300 },
            HistogramBucket { lower_bound: 2.0, upper_bound: 3.0, count: 900 },
        ];
        amount.quality_issues.push(QualityIssue::new(
            IssueKind::Outliers,
            Severity::Low,
            "12 outliers detected (1.00%)",
        ));

        let mut region = ColumnProfile::new("region");
        region.count = 1200;
        region.unique_count = 2;
        region.is_categorical = true;
        region.top_values = vec![ValueCount::new("north", 900), ValueCount::new("south", 300)];

        for column in [amount, region] {
            profile.column_order.push(column.name.clone());
            profile.columns.insert(column.name.clone(), column);
        }

        profile.correlation_matrix = Some(CorrelationMatrix {
            columns: vec![],
            values: BTreeMap::new(),
            top_pairs: vec![CorrelationPair {
                column1: "amount".into(),
                column2: "discount".into(),
                correlation: -0.82,
            }],
        });
        profile
    }

    #[test]
    fn test_html_sections() {
        let html = render_html(&profile());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Profile: orders &lt;2024&gt;.csv</title>"));
        assert!(html.contains("<div class=\"quality-score score-warning\">85/100</div>"));
        assert!(html.contains("<p><strong>Rows:</strong> 1,200</p>"));
        assert!(html.contains("<h2>Recommendations</h2>"));
        assert!(html.contains("<li>Check outliers in &#39;amount&#39; column</li>"));
        assert!(html.contains("Strong Negative (-0.82)"));
        assert!(html.contains("<h3>amount <small>(float)</small></h3>"));
        assert!(html.contains("<div class=\"histogram-bar\" style=\"height: 33%;\""));
        assert!(html.contains("<li>north: 900 (75.00%)</li>"));
        assert!(html.contains("<li>12 outliers detected (1.00%)</li>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_no_issues_message() {
        let mut profile = DatasetProfile::new("clean.csv", 0, FileFormat::Csv);
        profile.row_count = 10;
        profile.column_count = 1;
        profile.quality_score = 100;

        let html = render_html(&profile);
        assert!(html.contains("No significant quality issues detected."));
        assert!(!html.contains("<h2>Recommendations</h2>"));
        assert!(!html.contains("Column Correlations"));
    }

    #[test]
    fn test_correlation_labels_use_rounded_value() {
        assert_eq!(correlation_label(0.66).1, "Strong Positive");
        assert_eq!(correlation_label(0.44).1, "Moderate Positive");
        assert_eq!(correlation_label(0.04).1, "Negligible");
        assert_eq!(correlation_label(-0.12).1, "Weak Negative");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
