//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - A single-pass row scan building per-column aggregates
//! - Type inference for columns
//! - Numeric statistics and histograms
//! - Quality issues, the quality score and recommendations
//! - Correlation between numeric columns

mod scan;
mod statistics;
mod type_inference;

use crate::config::{CorrelationSource, ProfilerConfig};
use crate::correlation::{RowSeries, build_correlation_matrix};
use crate::error::Result;
use crate::loader::{CsvRecords, SourceInfo};
use crate::quality;
use crate::types::{ColumnProfile, DatasetProfile, FileFormat, InferredType};
use polars::prelude::*;
use scan::{ColumnAccumulator, RowScanner, ScanOutcome};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

pub use statistics::{NumericStats, build_histogram, compute_numeric_stats, parse_numeric_values};
pub use type_inference::{infer_column_type, is_date_like};

static_assertions::assert_impl_all!(DatasetProfile: Send, Sync);
static_assertions::assert_impl_all!(DatasetProfiler: Send, Sync);

/// Builds [`DatasetProfile`]s from files, data frames or raw records.
///
/// # Example
///
/// ```rust,ignore
/// use lex_profiler::DatasetProfiler;
///
/// let profile = DatasetProfiler::default().profile_path("data/train.csv")?;
/// println!("{} rows, quality {}/100", profile.row_count, profile.quality_score);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatasetProfiler {
    config: ProfilerConfig,
}

impl DatasetProfiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile a file, choosing the reader from its extension.
    ///
    /// Parquet and JSON inputs produce an empty profile carrying an
    /// `unsupported_format` issue; every other extension is read as CSV.
    pub fn profile_path(&self, path: impl AsRef<Path>) -> Result<DatasetProfile> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path);

        if !format.is_supported() {
            warn!("{} input is not supported yet: {}", format, path.display());
            let source = SourceInfo::describe(path);
            return Ok(DatasetProfile::unsupported(
                source.filename,
                source.file_size,
                format,
            ));
        }

        self.profile_csv(path)
    }

    /// Profile a CSV file with a header row, streaming it record by record.
    pub fn profile_csv(&self, path: impl AsRef<Path>) -> Result<DatasetProfile> {
        let path = path.as_ref();
        let started = Instant::now();
        info!("Profiling {}", path.display());

        let mut csv = CsvRecords::open(path)?;
        let mut scanner = RowScanner::new(&unique_headers(csv.headers()), self.tracks_rows());
        let mut fields = Vec::new();
        while csv.read_record(&mut fields)? {
            scanner.push_row(fields.iter().map(|field| Some(field.as_str())));
        }

        Ok(self.finalize(csv.into_source(), scanner.finish(), started))
    }

    /// Profile an in-memory `DataFrame`. Non-string columns are formatted as
    /// text first; nulls and empty strings count as missing.
    pub fn profile_dataframe(&self, df: &DataFrame, source: SourceInfo) -> Result<DatasetProfile> {
        let started = Instant::now();
        let outcome = self.scan_dataframe(df)?;
        Ok(self.finalize(source, outcome, started))
    }

    /// Profile raw records. Fields map onto `headers` by position; extra
    /// fields only take part in duplicate detection and short rows leave the
    /// trailing columns untouched.
    pub fn profile_records<I, R, S>(
        &self,
        source: SourceInfo,
        headers: &[String],
        rows: I,
    ) -> DatasetProfile
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let started = Instant::now();
        let mut scanner = RowScanner::new(&unique_headers(headers), self.tracks_rows());

        for row in rows {
            let fields: Vec<S> = row.into_iter().collect();
            scanner.push_row(fields.iter().map(|field| Some(field.as_ref())));
        }

        self.finalize(source, scanner.finish(), started)
    }

    fn tracks_rows(&self) -> bool {
        self.config.correlation_source == CorrelationSource::Exact
    }

    /// Run the row scan over every column of a frame, cast to text.
    fn scan_dataframe(&self, df: &DataFrame) -> PolarsResult<ScanOutcome> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let text: Vec<Series> = df
            .get_columns()
            .iter()
            .map(|column| column.as_materialized_series().cast(&DataType::String))
            .collect::<PolarsResult<_>>()?;
        let chunked: Vec<&StringChunked> = text
            .iter()
            .map(|series| series.str())
            .collect::<PolarsResult<_>>()?;
        let mut cursors: Vec<_> = chunked.iter().map(|&ca| ca.into_iter()).collect();

        let mut scanner = RowScanner::new(&headers, self.tracks_rows());
        for _ in 0..df.height() {
            scanner.push_row(cursors.iter_mut().map(|cursor| cursor.next().flatten()));
        }

        Ok(scanner.finish())
    }

    /// Turn a finished scan into the complete profile.
    fn finalize(
        &self,
        source: SourceInfo,
        outcome: ScanOutcome,
        started: Instant,
    ) -> DatasetProfile {
        let mut profile = DatasetProfile::new(source.filename, source.file_size, source.format);
        profile.row_count = outcome.row_count;
        profile.column_count = outcome.columns.len();
        profile.missing_cells = outcome.missing_cells;
        profile.duplicate_rows = outcome.duplicate_rows;

        let mut exact_series: HashMap<String, RowSeries> = HashMap::new();
        for accumulator in outcome.columns {
            let (column, series) = self.profile_column(accumulator, profile.row_count);
            debug!(
                "Column '{}': {} ({} values, {} missing, {} unique)",
                column.name,
                column.data_type,
                column.count,
                column.missing_count,
                column.unique_count
            );

            if let Some(series) = series {
                exact_series.insert(column.name.clone(), series);
            }
            profile.column_order.push(column.name.clone());
            profile.columns.insert(column.name.clone(), column);
        }

        profile.quality_issues = quality::dataset_issues(&profile);
        profile.quality_score = quality::calculate_quality_score(&profile);

        let exact = self.tracks_rows().then_some(&exact_series);
        profile.correlation_matrix =
            build_correlation_matrix(profile.ordered_columns(), exact, &self.config);

        profile.recommendations = quality::build_recommendations(&profile);
        profile.processing_time = started.elapsed();

        info!(
            "Profiled {}: {} rows x {} columns, quality score {}/100 in {:.2?}",
            profile.filename,
            profile.row_count,
            profile.column_count,
            profile.quality_score,
            profile.processing_time
        );

        profile
    }

    /// Finalize one column aggregate. Also returns the row-indexed numeric
    /// series when rows were tracked.
    fn profile_column(
        &self,
        accumulator: ColumnAccumulator,
        total_rows: usize,
    ) -> (ColumnProfile, Option<RowSeries>) {
        let config = &self.config;
        let mut column = ColumnProfile::new(accumulator.name);

        column.count = accumulator.values.len();
        column.missing_count = accumulator.missing_count;
        column.unique_count = accumulator.frequencies.distinct();
        column.data_type = infer_column_type(
            &accumulator.values,
            config.type_sample_size,
            config.type_match_ratio,
        );
        column.is_numeric = column.data_type.is_numeric();
        column.is_datetime = column.data_type == InferredType::Datetime;
        column.is_categorical =
            column.unique_count <= total_rows / 10 && column.unique_count <= 100;
        column.is_unique = column.unique_count == column.count;
        column.top_values = accumulator.frequencies.top(config.top_values_limit);

        if column.is_numeric {
            let parsed = parse_numeric_values(&accumulator.values);
            if let Some(stats) = compute_numeric_stats(&parsed, config) {
                column.min = Some(stats.min);
                column.max = Some(stats.max);
                column.mean = Some(stats.mean);
                column.median = Some(stats.median);
                column.std_dev = Some(stats.std_dev);
                column
                    .quality_issues
                    .extend(quality::outlier_issue(stats.outlier_count, stats.count));
                column.histogram = stats.histogram;
            }
        }

        let issues = quality::column_issues(&column, total_rows);
        column.quality_issues.extend(issues);

        let series = match accumulator.rows {
            Some(rows) if column.is_numeric => Some(
                accumulator
                    .values
                    .iter()
                    .zip(rows)
                    .filter_map(|(value, row)| value.parse::<f64>().ok().map(|v| (row, v)))
                    .collect(),
            ),
            _ => None,
        };

        (column, series)
    }
}

/// Rename repeated header names to `{name}_duplicated_{n}` so every column
/// keeps its own profile. Matches the names polars gives repeated headers.
fn unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut repeats: HashMap<&str, usize> = HashMap::new();

    headers
        .iter()
        .map(|name| {
            if seen.insert(name.as_str()) {
                return name.clone();
            }
            let n = repeats.entry(name.as_str()).or_insert(0);
            let renamed = format!("{name}_duplicated_{n}");
            *n += 1;
            renamed
        })
        .collect()
}
