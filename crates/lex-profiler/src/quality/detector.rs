use crate::types::{ColumnProfile, DatasetProfile, IssueKind, QualityIssue, Severity, percentage};

/// Share of a categorical column the top value may hold before it counts as
/// imbalanced.
const IMBALANCE_PERCENT: f64 = 90.0;

/// Outlier issue for a numeric column, if any values were flagged.
///
/// The percentage is taken over the values that parsed as numbers.
pub fn outlier_issue(outlier_count: usize, parsed_count: usize) -> Option<QualityIssue> {
    if outlier_count == 0 {
        return None;
    }

    let pct = percentage(outlier_count, parsed_count);
    Some(QualityIssue::new(
        IssueKind::Outliers,
        Severity::escalate(Severity::Low, pct, 5.0, 10.0),
        format!("{outlier_count} outliers detected ({pct:.2}%)"),
    ))
}

/// Missing-value, likely-ID and imbalance issues for one finalized column.
pub fn column_issues(column: &ColumnProfile, total_rows: usize) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    if column.missing_count > 0 {
        let pct = column.missing_percentage(total_rows);
        issues.push(QualityIssue::new(
            IssueKind::MissingValues,
            Severity::escalate(Severity::Low, pct, 5.0, 20.0),
            format!("Missing values: {pct:.2}%"),
        ));
    }

    if column.unique_count == column.count && column.name.to_lowercase().contains("id") {
        issues.push(QualityIssue::new(
            IssueKind::LikelyId,
            Severity::Low,
            "Likely ID column",
        ));
    }

    if column.is_categorical
        && let Some(top) = column.top_values.first()
    {
        let pct = percentage(top.count, column.count);
        if pct > IMBALANCE_PERCENT {
            issues.push(QualityIssue::new(
                IssueKind::Imbalanced,
                Severity::Medium,
                format!("Imbalanced: top value appears in {pct:.1}% of records"),
            ));
        }
    }

    issues
}

/// Dataset-wide missing-rate and duplicate-row issues.
pub fn dataset_issues(profile: &DatasetProfile) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    if profile.total_cells() > 0 {
        let pct = profile.missing_percentage();
        if pct > 5.0 {
            issues.push(QualityIssue::new(
                IssueKind::HighMissingValues,
                Severity::escalate(Severity::Medium, pct, 5.0, 20.0),
                format!("High overall missing value rate: {pct:.2}%"),
            ));
        }
    }

    if profile.row_count > 0 && profile.duplicate_rows > 0 {
        let pct = profile.duplicate_percentage();
        issues.push(QualityIssue::new(
            IssueKind::DuplicateRows,
            Severity::escalate(Severity::Low, pct, 5.0, 20.0),
            format!("Duplicate rows detected: {pct:.2}%"),
        ));
    }

    issues
}
