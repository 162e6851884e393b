//! Dataset Profiling Library
//!
//! A fast, single-pass profiler for tabular data built with Rust and Polars.
//!
//! # Overview
//!
//! This library reads a delimited file once and produces a [`DatasetProfile`]:
//!
//! - **Type Inference**: integer, float, datetime or string per column, decided
//!   by a super-majority of the first 100 non-missing values
//! - **Statistics**: min, max, mean, median, standard deviation and a
//!   10-bucket histogram for numeric columns
//! - **Frequencies**: distinct counts and the most frequent values
//! - **Quality**: missing values, outliers, likely ID columns, imbalance and
//!   duplicate rows, folded into a 0-100 quality score
//! - **Correlation**: Pearson coefficients between numeric columns
//! - **Reporting**: terminal, JSON, Markdown and HTML renderers
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_profiler::{DatasetProfiler, OutputFormat, render_report};
//!
//! let profile = DatasetProfiler::default().profile_path("data.csv")?;
//!
//! println!("Rows: {}", profile.row_count);
//! println!("Quality score: {}/100", profile.quality_score);
//! print!("{}", render_report(&profile, OutputFormat::Terminal, false)?);
//! ```
//!
//! # Configuration
//!
//! Use [`ProfilerConfig`] to customize the heuristics:
//!
//! ```rust,ignore
//! use lex_profiler::config::*;
//!
//! let config = ProfilerConfig::builder()
//!     .type_sample_size(200)                          // Look at more values
//!     .variance_method(VarianceMethod::Naive)         // E[X²] - E[X]²
//!     .correlation_source(CorrelationSource::Exact)   // Row-aligned values
//!     .build()?;
//!
//! let profile = DatasetProfiler::new(config).profile_path("data.csv")?;
//! ```
//!
//! # Unsupported Formats
//!
//! Parquet and JSON inputs are recognized by extension but not read yet. They
//! produce an empty profile with a single `unsupported_format` issue and a
//! score of 0 instead of an error.

pub mod config;
pub mod correlation;
pub mod error;
pub mod loader;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, CorrelationSource, ProfilerConfig, ProfilerConfigBuilder,
    VarianceMethod,
};
pub use correlation::{CorrelationDirection, CorrelationStrength, pearson_correlation};
pub use error::{ProfilingError, Result as ProfilingResult, ResultExt};
pub use loader::SourceInfo;
pub use profiler::DatasetProfiler;
pub use reporting::{OutputFormat, default_report_path, render_report, write_report};
pub use types::{
    ColumnProfile, CorrelationMatrix, CorrelationPair, DatasetProfile, FileFormat, HistogramBucket,
    InferredType, IssueKind, QualityIssue, Severity, ValueCount,
};
