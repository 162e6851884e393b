use crate::types::{ColumnProfile, DatasetProfile, InferredType, IssueKind};

/// Columns listed by name before a rule collapses into one summary line.
const MAX_NAMED_COLUMNS: usize = 3;

/// Minimum |r| for a top pair to produce a recommendation.
const STRONG_CORRELATION: f64 = 0.7;

/// Build the recommendation list for a finished profile.
///
/// Needs the quality score and correlation matrix to be filled in already.
/// Column rules run in header order.
pub fn build_recommendations(profile: &DatasetProfile) -> Vec<String> {
    let mut recommendations = Vec::new();
    let columns: Vec<&ColumnProfile> = profile.ordered_columns().collect();

    let missing: Vec<&str> = columns
        .iter()
        .filter(|column| {
            column.missing_count > 0 && column.missing_percentage(profile.row_count) > 5.0
        })
        .map(|column| column.name.as_str())
        .collect();
    push_named_or_summary(
        &mut recommendations,
        &missing,
        |name| format!("Consider imputing missing values in '{name}' column"),
        "Several columns have high missing value rates and may need imputation",
    );

    let outliers: Vec<&str> = columns
        .iter()
        .filter(|column| column.has_issue(IssueKind::Outliers))
        .map(|column| column.name.as_str())
        .collect();
    push_named_or_summary(
        &mut recommendations,
        &outliers,
        |name| format!("Check outliers in '{name}' column"),
        "Multiple numeric columns contain outliers",
    );

    recommendations.extend(
        columns
            .iter()
            .filter(|column| looks_categorical(column))
            .map(|column| {
                format!(
                    "Column '{}' might benefit from being treated as categorical",
                    column.name
                )
            }),
    );

    if profile.duplicate_rows > 0 && profile.duplicate_percentage() > 1.0 {
        recommendations
            .push("Dataset contains duplicate rows - consider deduplication".to_string());
    }

    if recommendations.is_empty() && profile.quality_score < 90 {
        recommendations
            .push("Review columns with quality issues for potential improvements".to_string());
    }

    if let Some(matrix) = &profile.correlation_matrix {
        for pair in &matrix.top_pairs {
            if pair.correlation.abs() < STRONG_CORRELATION {
                continue;
            }
            let message = if pair.correlation > 0.0 {
                format!(
                    "Strong positive correlation ({:.2}) between '{}' and '{}' - \
                     consider if one could be derived from the other",
                    pair.correlation, pair.column1, pair.column2
                )
            } else {
                format!(
                    "Strong negative correlation ({:.2}) between '{}' and '{}' - \
                     these features may provide complementary information",
                    pair.correlation, pair.column1, pair.column2
                )
            };
            recommendations.push(message);
        }
    }

    recommendations
}

fn push_named_or_summary(
    recommendations: &mut Vec<String>,
    names: &[&str],
    named: impl Fn(&str) -> String,
    summary: &str,
) {
    if names.len() > MAX_NAMED_COLUMNS {
        recommendations.push(summary.to_string());
    } else {
        recommendations.extend(names.iter().map(|&name| named(name)));
    }
}

/// Low-cardinality text column not already flagged categorical.
fn looks_categorical(column: &ColumnProfile) -> bool {
    column.data_type == InferredType::String
        && !column.is_categorical
        && column.unique_count > 0
        && column.unique_count <= 100
        && column.unique_count as f64 / column.count as f64 <= 0.2
}
