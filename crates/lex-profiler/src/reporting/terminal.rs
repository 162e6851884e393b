use super::{format_number, megabytes, quality_bar, quality_label};
use crate::types::{ColumnProfile, DatasetProfile, Severity, percentage};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;
const SCORE_BAR_WIDTH: usize = 50;
const HISTOGRAM_BAR_WIDTH: usize = 40;
const TOP_VALUE_BAR_WIDTH: usize = 30;
/// Pairs weaker than this are left out of the terminal summary.
const SHOWN_CORRELATION: f64 = 0.5;

/// Render the human-readable terminal report.
pub fn render_terminal(profile: &DatasetProfile, verbose: bool) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, profile, verbose);
    out
}

fn write_report(out: &mut String, profile: &DatasetProfile, verbose: bool) -> std::fmt::Result {
    writeln!(out, "Dataset: {}", profile.filename)?;
    writeln!(out, "   Size: {:.2} MB", megabytes(profile.file_size))?;
    writeln!(out, "   Format: {}", profile.format)?;
    writeln!(
        out,
        "   Profiled in {:.2} seconds",
        profile.processing_time.as_secs_f64()
    )?;
    writeln!(out, "{}", "─".repeat(RULE_WIDTH))?;
    writeln!(out)?;

    writeln!(
        out,
        "Quality Score: {}/100 ({})",
        profile.quality_score,
        quality_label(profile.quality_score)
    )?;
    writeln!(out, "   {}", quality_bar(profile.quality_score, SCORE_BAR_WIDTH))?;
    writeln!(out)?;

    writeln!(out, "Dataset Summary:")?;
    writeln!(out, "   • Rows: {}", format_number(profile.row_count))?;
    writeln!(out, "   • Columns: {}", profile.column_count)?;
    writeln!(
        out,
        "   • Missing cells: {} ({:.2}%)",
        format_number(profile.missing_cells),
        profile.missing_percentage()
    )?;
    writeln!(
        out,
        "   • Duplicate rows: {} ({:.2}%)",
        format_number(profile.duplicate_rows),
        profile.duplicate_percentage()
    )?;
    writeln!(out)?;

    if profile.column_count > 0 {
        write_overview(out, profile)?;
    }

    if let Some(matrix) = &profile.correlation_matrix {
        let shown: Vec<_> = matrix
            .top_pairs
            .iter()
            .filter(|pair| pair.correlation.abs() > SHOWN_CORRELATION)
            .collect();
        if !shown.is_empty() {
            writeln!(out, "Correlations:")?;
            for pair in shown {
                let kind = if pair.correlation > 0.7 {
                    "Strong positive"
                } else if pair.correlation < -0.7 {
                    "Strong negative"
                } else {
                    "Moderate"
                };
                writeln!(
                    out,
                    "   • {kind} correlation ({:.2}) between '{}' and '{}'",
                    pair.correlation, pair.column1, pair.column2
                )?;
            }
            writeln!(out)?;
        }
    }

    let issues = profile.issue_summaries();
    if !issues.is_empty() {
        writeln!(out, "Potential Data Quality Issues:")?;
        for issue in &issues {
            writeln!(out, "   • {issue}")?;
        }
        writeln!(out)?;
    }

    if !profile.recommendations.is_empty() {
        writeln!(out, "Recommendations:")?;
        for recommendation in &profile.recommendations {
            writeln!(out, "   • {recommendation}")?;
        }
        writeln!(out)?;
    }

    if verbose {
        writeln!(out, "COLUMN DETAILS")?;
        for column in profile.ordered_columns() {
            write_column_details(out, column, profile.row_count)?;
        }
    }

    Ok(())
}

fn write_overview(out: &mut String, profile: &DatasetProfile) -> std::fmt::Result {
    writeln!(out, "Column Overview:")?;
    writeln!(
        out,
        "   {:<12} {:<10} {:<8} {:<8} {:<24} {}",
        "NAME", "TYPE", "MISSING", "UNIQUE", "STATS", "ISSUES"
    )?;
    writeln!(out, "   {}", "─".repeat(76))?;

    for column in profile.ordered_columns() {
        writeln!(
            out,
            "   {:<12} {:<10} {:<8} {:<8} {:<24} {}",
            truncate(&column.name, 12),
            column.data_type,
            format!("{:.2}%", column.missing_percentage(profile.row_count)),
            format!("{:.2}%", column.unique_percentage()),
            column_stats(column),
            if column.quality_issues.is_empty() { "ok" } else { "!" }
        )?;
    }
    writeln!(out)
}

/// Short statistics cell for the overview table.
fn column_stats(column: &ColumnProfile) -> String {
    if let (Some(mean), Some(std_dev)) = (column.mean, column.std_dev) {
        format!("mean={mean:.1}, stddev={std_dev:.1}")
    } else if column.is_datetime {
        "datetime".to_string()
    } else if column.is_categorical && !column.top_values.is_empty() {
        let values: Vec<&str> = column.top_values.iter().map(|top| top.value.as_str()).collect();
        truncate(&format!("[{}]", values.join(", ")), 24)
    } else if column.is_unique && column.count > 0 {
        "unique values".to_string()
    } else {
        "-".to_string()
    }
}

fn write_column_details(
    out: &mut String,
    column: &ColumnProfile,
    total_rows: usize,
) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "   {} ({})", column.name, column.data_type)?;
    writeln!(
        out,
        "   ├── Missing: {} ({:.2}%)",
        column.missing_count,
        column.missing_percentage(total_rows)
    )?;
    writeln!(
        out,
        "   ├── Unique:  {} ({:.2}%)",
        column.unique_count,
        column.unique_percentage()
    )?;

    if let (Some(min), Some(max), Some(mean), Some(median), Some(std_dev)) =
        (column.min, column.max, column.mean, column.median, column.std_dev)
    {
        writeln!(out, "   ├── Min:     {min}")?;
        writeln!(out, "   ├── Max:     {max}")?;
        writeln!(out, "   ├── Mean:    {mean:.4}")?;
        writeln!(out, "   ├── Median:  {median:.4}")?;
        writeln!(out, "   ├── StdDev:  {std_dev:.4}")?;
        writeln!(out, "   └── Histogram:")?;
        writeln!(out)?;

        let peak = column.histogram.iter().map(|b| b.count).max().unwrap_or(0);
        for bucket in &column.histogram {
            writeln!(
                out,
                "        [{:.2} to {:.2}] {} {}",
                bucket.lower_bound,
                bucket.upper_bound,
                bar(bucket.count, peak, HISTOGRAM_BAR_WIDTH),
                bucket.count
            )?;
        }
    } else if column.is_categorical && !column.top_values.is_empty() {
        writeln!(out, "   └── Top values:")?;
        let peak = column.top_values.iter().map(|top| top.count).max().unwrap_or(0);
        for top in &column.top_values {
            writeln!(
                out,
                "        {:<20} {} {} ({:.2}%)",
                truncate(&top.value, 20),
                bar(top.count, peak, TOP_VALUE_BAR_WIDTH),
                top.count,
                percentage(top.count, column.count)
            )?;
        }
    } else {
        writeln!(out, "   └── No detailed statistics available")?;
    }

    if !column.quality_issues.is_empty() {
        writeln!(out)?;
        writeln!(out, "   Quality Issues:")?;
        for issue in &column.quality_issues {
            let marker = match issue.severity {
                Severity::Low => "[low]",
                Severity::Medium => "[medium]",
                Severity::High => "[high]",
            };
            writeln!(out, "   {marker} {}", issue.description)?;
        }
    }

    Ok(())
}

fn bar(count: usize, peak: usize, width: usize) -> String {
    let filled = if peak > 0 { count * width / peak } else { 0 };
    "█".repeat(filled)
}

/// Cut to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
