use crate::types::DatasetProfile;

const MISSING_PENALTY_CAP: u32 = 30;
const ISSUE_PENALTY_CAP: u32 = 40;
const DUPLICATE_PENALTY_CAP: u32 = 15;

/// Aggregate quality score in `0..=100`.
///
/// Starts at 100 and subtracts three capped penalties: 3 points per percent
/// of missing cells, 5 points per dataset issue severity level plus 1 per
/// column issue severity level, and 2 points per percent of duplicate rows.
/// Empty datasets score 0.
pub fn calculate_quality_score(profile: &DatasetProfile) -> u8 {
    if profile.row_count == 0 || profile.column_count == 0 {
        return 0;
    }

    let missing_penalty = ((profile.missing_percentage() * 3.0) as u32).min(MISSING_PENALTY_CAP);

    let dataset_levels: u32 = profile
        .quality_issues
        .iter()
        .map(|issue| issue.severity.level() * 5)
        .sum();
    let column_levels: u32 = profile
        .columns
        .values()
        .flat_map(|column| &column.quality_issues)
        .map(|issue| issue.severity.level())
        .sum();
    let issue_penalty = (dataset_levels + column_levels).min(ISSUE_PENALTY_CAP);

    let duplicate_penalty =
        ((profile.duplicate_percentage() * 2.0) as u32).min(DUPLICATE_PENALTY_CAP);

    let total = missing_penalty + issue_penalty + duplicate_penalty;
    100u32.saturating_sub(total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnProfile, FileFormat, IssueKind, QualityIssue, Severity};

    fn profile(rows: usize, columns: usize, missing: usize, duplicates: usize) -> DatasetProfile {
        let mut profile = DatasetProfile::new("d.csv", 0, FileFormat::Csv);
        profile.row_count = rows;
        profile.column_count = columns;
        profile.missing_cells = missing;
        profile.duplicate_rows = duplicates;
        profile
    }

    #[test]
    fn test_clean_dataset_scores_100() {
        assert_eq!(calculate_quality_score(&profile(10, 3, 0, 0)), 100);
    }

    #[test]
    fn test_empty_dataset_scores_zero() {
        assert_eq!(calculate_quality_score(&profile(0, 3, 0, 0)), 0);
        assert_eq!(calculate_quality_score(&profile(10, 0, 0, 0)), 0);
    }

    #[test]
    fn test_ten_percent_missing_scores_70() {
        assert_eq!(calculate_quality_score(&profile(1000, 10, 1000, 0)), 70);
    }

    #[test]
    fn test_issue_and_duplicate_penalties_combine() {
        // 5% missing cells, one medium dataset issue, three low column issues
        // and 1% duplicates: 100 - 15 - (10 + 3) - 2
        let mut p = profile(100, 10, 50, 1);
        p.quality_issues.push(QualityIssue::new(
            IssueKind::HighMissingValues,
            Severity::Medium,
            "x",
        ));
        let mut column = ColumnProfile::new("c");
        for _ in 0..3 {
            column
                .quality_issues
                .push(QualityIssue::new(IssueKind::MissingValues, Severity::Low, "x"));
        }
        p.columns.insert("c".to_string(), column);

        assert_eq!(calculate_quality_score(&p), 70);
    }

    #[test]
    fn test_penalties_are_capped() {
        let mut p = profile(10, 1, 10, 9);
        for _ in 0..10 {
            p.quality_issues
                .push(QualityIssue::new(IssueKind::DuplicateRows, Severity::High, "x"));
        }
        // 100 - 30 - 40 - 15
        assert_eq!(calculate_quality_score(&p), 15);
    }

    #[test]
    fn test_fractional_penalties_truncate() {
        // 1 missing out of 30 cells = 3.33% -> 9.99 -> 9 points
        assert_eq!(calculate_quality_score(&profile(10, 3, 1, 0)), 91);
    }
}
