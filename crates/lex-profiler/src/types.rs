use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Inferred types and formats
// ============================================================================

/// Data type inferred for a column from its raw text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    /// No non-missing values to classify.
    #[default]
    Unknown,
    Integer,
    Float,
    Datetime,
    String,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Datetime => "datetime",
            Self::String => "string",
        }
    }

    /// Integer and float columns get numeric statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Input format, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Csv,
    Parquet,
    Json,
}

impl FileFormat {
    /// Detect the format of a path. Anything that is not Parquet or JSON is
    /// treated as delimited text.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("parquet") => Self::Parquet,
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Parquet => "Parquet",
            Self::Json => "JSON",
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Csv)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ============================================================================
// Quality issues
// ============================================================================

/// Tag of a quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingValues,
    Outliers,
    LikelyId,
    Imbalanced,
    HighMissingValues,
    DuplicateRows,
    UnsupportedFormat,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingValues => "missing_values",
            Self::Outliers => "outliers",
            Self::LikelyId => "likely_id",
            Self::Imbalanced => "imbalanced",
            Self::HighMissingValues => "high_missing_values",
            Self::DuplicateRows => "duplicate_rows",
            Self::UnsupportedFormat => "unsupported_format",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Severity of a quality issue, ordered low to high. Serialized as its
/// numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Numeric level in `1..=3`.
    pub fn level(&self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Start at `base` and escalate to `Medium` above `medium_above` percent
    /// and to `High` above `high_above` percent.
    pub fn escalate(base: Severity, percentage: f64, medium_above: f64, high_above: f64) -> Self {
        if percentage > high_above {
            Self::High
        } else if percentage > medium_above {
            base.max(Self::Medium)
        } else {
            base
        }
    }
}

impl From<Severity> for u32 {
    fn from(severity: Severity) -> Self {
        severity.level()
    }
}

impl TryFrom<u32> for Severity {
    type Error = String;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(format!("severity level must be 1, 2 or 3, got {other}")),
        }
    }
}

/// A tagged, severity-ranked finding about a column or the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub kind: IssueKind,
    pub description: String,
    pub severity: Severity,
}

impl QualityIssue {
    pub fn new(kind: IssueKind, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            severity,
        }
    }
}

// ============================================================================
// Column profile
// ============================================================================

/// One equal-width histogram bucket.
///
/// The lower bound is inclusive and the upper bound exclusive, except for the
/// last bucket whose upper bound is the column maximum and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub count: usize,
}

impl HistogramBucket {
    pub fn midpoint(&self) -> f64 {
        (self.lower_bound + self.upper_bound) / 2.0
    }
}

/// A literal value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

impl ValueCount {
    pub fn new(value: impl Into<String>, count: usize) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Statistical profile of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub data_type: InferredType,
    /// Number of non-missing values.
    pub count: usize,
    pub missing_count: usize,
    pub unique_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub histogram: Vec<HistogramBucket>,
    pub top_values: Vec<ValueCount>,
    pub is_numeric: bool,
    pub is_categorical: bool,
    pub is_datetime: bool,
    pub is_unique: bool,
    pub quality_issues: Vec<QualityIssue>,
}

impl ColumnProfile {
    /// Create an empty profile for a column name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: InferredType::Unknown,
            count: 0,
            missing_count: 0,
            unique_count: 0,
            min: None,
            max: None,
            mean: None,
            median: None,
            std_dev: None,
            histogram: Vec::new(),
            top_values: Vec::new(),
            is_numeric: false,
            is_categorical: false,
            is_datetime: false,
            is_unique: false,
            quality_issues: Vec::new(),
        }
    }

    /// Missing cells as a percentage of all rows in the dataset.
    pub fn missing_percentage(&self, total_rows: usize) -> f64 {
        percentage(self.missing_count, total_rows)
    }

    /// Distinct values as a percentage of non-missing values.
    pub fn unique_percentage(&self) -> f64 {
        percentage(self.unique_count, self.count)
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.quality_issues.iter().any(|issue| issue.kind == kind)
    }
}

// ============================================================================
// Correlation
// ============================================================================

/// Pearson coefficient between two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub column1: String,
    pub column2: String,
    pub correlation: f64,
}

/// Pairwise correlations among the numeric columns of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Numeric column names, sorted.
    pub columns: Vec<String>,
    /// Symmetric coefficients; the diagonal is exactly 1.0.
    pub values: BTreeMap<String, BTreeMap<String, f64>>,
    /// Strongest pairs by absolute coefficient.
    pub top_pairs: Vec<CorrelationPair>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.values.get(a).and_then(|row| row.get(b)).copied()
    }
}

// ============================================================================
// Dataset profile
// ============================================================================

/// Complete profile of one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub filename: String,
    /// Size of the input in bytes.
    pub file_size: u64,
    pub format: FileFormat,
    pub row_count: usize,
    pub column_count: usize,
    pub missing_cells: usize,
    pub duplicate_rows: usize,
    pub columns: HashMap<String, ColumnProfile>,
    /// Column names in header order.
    pub column_order: Vec<String>,
    /// Dataset-level issues.
    pub quality_issues: Vec<QualityIssue>,
    /// Aggregate quality score in `0..=100`.
    pub quality_score: u8,
    pub correlation_matrix: Option<CorrelationMatrix>,
    pub recommendations: Vec<String>,
    pub processing_time: Duration,
    pub created_at: DateTime<Local>,
}

impl DatasetProfile {
    /// Create an empty profile for a source.
    pub fn new(filename: impl Into<String>, file_size: u64, format: FileFormat) -> Self {
        Self {
            filename: filename.into(),
            file_size,
            format,
            row_count: 0,
            column_count: 0,
            missing_cells: 0,
            duplicate_rows: 0,
            columns: HashMap::new(),
            column_order: Vec::new(),
            quality_issues: Vec::new(),
            quality_score: 0,
            correlation_matrix: None,
            recommendations: Vec::new(),
            processing_time: Duration::ZERO,
            created_at: Local::now(),
        }
    }

    /// Degenerate profile for a format that cannot be read yet.
    pub fn unsupported(filename: impl Into<String>, file_size: u64, format: FileFormat) -> Self {
        let mut profile = Self::new(filename, file_size, format);
        profile.quality_issues.push(QualityIssue::new(
            IssueKind::UnsupportedFormat,
            Severity::Medium,
            format!("{} support is not available yet", format.label()),
        ));
        profile
    }

    pub fn total_cells(&self) -> usize {
        self.row_count * self.column_count
    }

    /// Missing cells as a percentage of all cells.
    pub fn missing_percentage(&self) -> f64 {
        percentage(self.missing_cells, self.total_cells())
    }

    /// Duplicate rows as a percentage of all rows.
    pub fn duplicate_percentage(&self) -> f64 {
        percentage(self.duplicate_rows, self.row_count)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.get(name)
    }

    /// Columns in header order.
    pub fn ordered_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.column_order
            .iter()
            .filter_map(|name| self.columns.get(name))
    }

    /// All issue descriptions, dataset level first, column issues prefixed
    /// with their column name.
    pub fn issue_summaries(&self) -> Vec<String> {
        let mut summaries: Vec<String> = self
            .quality_issues
            .iter()
            .map(|issue| issue.description.clone())
            .collect();

        for column in self.ordered_columns() {
            for issue in &column.quality_issues {
                summaries.push(format!("Column '{}': {}", column.name, issue.description));
            }
        }

        summaries
    }
}

/// `part / total * 100`, or 0 when `total` is zero.
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

// ============================================================================
// Tests
// ============================================================================
