use super::{format_number, megabytes};
use crate::types::{DatasetProfile, percentage};
use std::fmt::Write;

/// Render a profile as a Markdown document.
pub fn render_markdown(profile: &DatasetProfile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, profile);
    out
}

fn write_document(out: &mut String, profile: &DatasetProfile) -> std::fmt::Result {
    writeln!(out, "# Profile: {}\n", profile.filename)?;
    writeln!(
        out,
        "**Generated:** {} | **Size:** {:.2} MB | **Rows:** {} | **Columns:** {}\n",
        profile.created_at.format("%B %-d, %Y"),
        megabytes(profile.file_size),
        format_number(profile.row_count),
        profile.column_count
    )?;
    writeln!(out, "## Dataset Quality Score: {}/100\n", profile.quality_score)?;

    writeln!(out, "## Dataset Summary\n")?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Rows | {} |", format_number(profile.row_count))?;
    writeln!(out, "| Columns | {} |", profile.column_count)?;
    writeln!(
        out,
        "| Missing cells | {} ({:.2}%) |",
        format_number(profile.missing_cells),
        profile.missing_percentage()
    )?;
    writeln!(
        out,
        "| Duplicate rows | {} ({:.2}%) |",
        format_number(profile.duplicate_rows),
        profile.duplicate_percentage()
    )?;
    writeln!(
        out,
        "| Processing Time | {:.2} seconds |\n",
        profile.processing_time.as_secs_f64()
    )?;

    let issues = profile.issue_summaries();
    if !issues.is_empty() {
        writeln!(out, "## Quality Issues\n")?;
        for issue in &issues {
            writeln!(out, "- {issue}")?;
        }
        writeln!(out)?;
    }

    if !profile.recommendations.is_empty() {
        writeln!(out, "## Recommendations\n")?;
        for recommendation in &profile.recommendations {
            writeln!(out, "- {recommendation}")?;
        }
        writeln!(out)?;
    }

    if let Some(matrix) = profile.correlation_matrix.as_ref().filter(|m| !m.top_pairs.is_empty()) {
        writeln!(out, "## Correlations\n")?;
        writeln!(out, "| Column 1 | Column 2 | Correlation |")?;
        writeln!(out, "|----------|----------|-------------|")?;
        for pair in &matrix.top_pairs {
            writeln!(out, "| {} | {} | {:.2} |", pair.column1, pair.column2, pair.correlation)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Column Details\n")?;
    for column in profile.ordered_columns() {
        writeln!(out, "### {}\n", column.name)?;
        writeln!(out, "- **Type:** {}", column.data_type)?;
        if profile.row_count > 0 {
            writeln!(out, "- **Missing:** {:.2}%", column.missing_percentage(profile.row_count))?;
        }
        if column.count > 0 {
            writeln!(out, "- **Unique:** {:.2}%", column.unique_percentage())?;
        }
        if let (Some(min), Some(max), Some(mean), Some(median), Some(std_dev)) =
            (column.min, column.max, column.mean, column.median, column.std_dev)
        {
            writeln!(out, "- **Range:** {min} - {max}")?;
            writeln!(out, "- **Mean:** {mean:.2}")?;
            writeln!(out, "- **Median:** {median:.2}")?;
            writeln!(out, "- **Std Dev:** {std_dev:.2}")?;
        }
        writeln!(out)?;

        if column.is_categorical && !column.top_values.is_empty() {
            writeln!(out, "**Top Values:**\n")?;
            for top in &column.top_values {
                writeln!(
                    out,
                    "- {}: {} ({:.2}%)",
                    top.value,
                    top.count,
                    percentage(top.count, column.count)
                )?;
            }
            writeln!(out)?;
        }

        if !column.quality_issues.is_empty() {
            writeln!(out, "**Quality Issues:**\n")?;
            for issue in &column.quality_issues {
                writeln!(out, "- {}", issue.description)?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "---")?;
    writeln!(out, "Generated by lex-profiler v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnProfile, FileFormat, ValueCount};

    #[test]
    fn test_markdown_sections() {
        let mut profile = DatasetProfile::new("people.csv", 1_572_864, FileFormat::Csv);
        profile.row_count = 1200;
        profile.column_count = 1;
        profile.quality_score = 88;
        profile
            .recommendations
            .push("Review columns with quality issues for potential improvements".to_string());

        let mut team = ColumnProfile::new("team");
        team.count = 1200;
        team.unique_count = 2;
        team.is_categorical = true;
        team.top_values = vec![ValueCount::new("red", 900), ValueCount::new("blue", 300)];
        profile.column_order.push("team".to_string());
        profile.columns.insert("team".to_string(), team);

        let md = render_markdown(&profile);

        assert!(md.starts_with("# Profile: people.csv\n"));
        assert!(md.contains("**Size:** 1.50 MB"));
        assert!(md.contains("| Rows | 1,200 |"));
        assert!(md.contains("## Dataset Quality Score: 88/100"));
        assert!(md.contains("## Recommendations\n\n- Review columns"));
        assert!(md.contains("### team"));
        assert!(md.contains("- red: 900 (75.00%)"));
        assert!(!md.contains("## Quality Issues"));
    }
}
