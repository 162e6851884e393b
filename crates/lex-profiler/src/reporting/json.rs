use crate::types::{CorrelationPair, DatasetProfile, percentage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flattened, machine-readable view of a [`DatasetProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub filename: String,
    pub file_size_bytes: u64,
    pub format: String,
    pub row_count: usize,
    pub column_count: usize,
    pub missing_cells: usize,
    pub duplicate_rows: usize,
    pub quality_score: u8,
    /// Dataset issues followed by `Column 'name': ...` entries.
    pub quality_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub columns: BTreeMap<String, JsonColumnReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correlations: Vec<CorrelationPair>,
    pub processing_time_seconds: f64,
    /// RFC 3339 timestamp of the profiling run.
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonColumnReport {
    pub name: String,
    pub data_type: String,
    pub count: usize,
    pub missing_count: usize,
    pub missing_percent: f64,
    pub unique_count: usize,
    pub unique_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_values: Vec<JsonTopValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub histogram: Vec<JsonBucket>,
    pub quality_issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTopValue {
    pub value: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonBucket {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl JsonReport {
    pub fn from_profile(profile: &DatasetProfile) -> Self {
        let columns = profile
            .ordered_columns()
            .map(|column| {
                let report = JsonColumnReport {
                    name: column.name.clone(),
                    data_type: column.data_type.to_string(),
                    count: column.count,
                    missing_count: column.missing_count,
                    missing_percent: column.missing_percentage(profile.row_count),
                    unique_count: column.unique_count,
                    unique_percent: column.unique_percentage(),
                    min: column.min,
                    max: column.max,
                    mean: column.mean,
                    median: column.median,
                    std_dev: column.std_dev,
                    top_values: column
                        .top_values
                        .iter()
                        .map(|top| JsonTopValue {
                            value: top.value.clone(),
                            count: top.count,
                            percent: percentage(top.count, column.count),
                        })
                        .collect(),
                    histogram: column
                        .histogram
                        .iter()
                        .map(|bucket| JsonBucket {
                            min: bucket.lower_bound,
                            max: bucket.upper_bound,
                            count: bucket.count,
                        })
                        .collect(),
                    quality_issues: column
                        .quality_issues
                        .iter()
                        .map(|issue| issue.description.clone())
                        .collect(),
                };
                (column.name.clone(), report)
            })
            .collect();

        Self {
            filename: profile.filename.clone(),
            file_size_bytes: profile.file_size,
            format: profile.format.label().to_string(),
            row_count: profile.row_count,
            column_count: profile.column_count,
            missing_cells: profile.missing_cells,
            duplicate_rows: profile.duplicate_rows,
            quality_score: profile.quality_score,
            quality_issues: profile.issue_summaries(),
            recommendations: profile.recommendations.clone(),
            columns,
            correlations: profile
                .correlation_matrix
                .as_ref()
                .map(|matrix| matrix.top_pairs.clone())
                .unwrap_or_default(),
            processing_time_seconds: profile.processing_time.as_secs_f64(),
            generated_at: profile.created_at.to_rfc3339(),
        }
    }
}
