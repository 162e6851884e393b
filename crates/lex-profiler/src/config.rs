//! Configuration types for the profiler.
//!
//! The defaults reproduce the reference heuristics exactly (100-value type
//! sample, 90% super-majority, 10 histogram buckets, top 5 values, z > 3
//! outliers, 10 000-sample correlation cap). Use [`ProfilerConfig::builder()`]
//! to change them.

use serde::{Deserialize, Serialize};

/// How the population variance of a numeric column is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VarianceMethod {
    /// Welford's incremental algorithm. Never yields a negative variance.
    #[default]
    Welford,
    /// `E[X²] − E[X]²` in one pass. Can go slightly negative on near-constant
    /// columns, which surfaces as a NaN standard deviation.
    Naive,
}

/// Which numeric series the correlation engine correlates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CorrelationSource {
    /// Rebuild an approximate sample from histogram midpoints and top values.
    /// Needs no extra memory beyond the column summaries.
    #[default]
    Reconstructed,
    /// Keep the row index of every value during the scan and correlate
    /// row-aligned pairs exactly.
    Exact,
}

/// Configuration for a profiling run.
///
/// # Example
///
/// ```rust,ignore
/// use lex_profiler::config::{ProfilerConfig, CorrelationSource};
///
/// let config = ProfilerConfig::builder()
///     .correlation_source(CorrelationSource::Exact)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Number of leading non-missing values inspected by type inference.
    /// Default: 100
    pub type_sample_size: usize,

    /// Fraction of the sample that must agree on a type (0.0 - 1.0).
    /// Default: 0.9
    pub type_match_ratio: f64,

    /// Number of equal-width histogram buckets for numeric columns.
    /// Default: 10
    pub histogram_buckets: usize,

    /// Number of most frequent values kept per column.
    /// Default: 5
    pub top_values_limit: usize,

    /// Absolute z-score above which a value counts as an outlier.
    /// Default: 3.0
    pub outlier_z_threshold: f64,

    /// Variance formula used for the standard deviation.
    /// Default: Welford
    pub variance_method: VarianceMethod,

    /// Series used for correlation.
    /// Default: Reconstructed
    pub correlation_source: CorrelationSource,

    /// Series longer than this are stride-sampled before correlating.
    /// Default: 10000
    pub correlation_max_samples: usize,

    /// Maximum number of ranked pairs kept in the correlation summary.
    /// Default: 10
    pub correlation_top_pairs: usize,

    /// Pairs at or below this absolute coefficient are dropped from the summary.
    /// Default: 0.1
    pub correlation_min_magnitude: f64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            type_sample_size: 100,
            type_match_ratio: 0.9,
            histogram_buckets: 10,
            top_values_limit: 5,
            outlier_z_threshold: 3.0,
            variance_method: VarianceMethod::default(),
            correlation_source: CorrelationSource::default(),
            correlation_max_samples: 10_000,
            correlation_top_pairs: 10,
            correlation_min_magnitude: 0.1,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.type_match_ratio) {
            return Err(ConfigValidationError::InvalidRatio {
                field: "type_match_ratio".to_string(),
                value: self.type_match_ratio,
            });
        }

        if !(0.0..=1.0).contains(&self.correlation_min_magnitude) {
            return Err(ConfigValidationError::InvalidRatio {
                field: "correlation_min_magnitude".to_string(),
                value: self.correlation_min_magnitude,
            });
        }

        let counts = [
            ("type_sample_size", self.type_sample_size),
            ("histogram_buckets", self.histogram_buckets),
            ("correlation_max_samples", self.correlation_max_samples),
        ];
        if let Some((field, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::ZeroCount(field.to_string()));
        }

        if !(self.outlier_z_threshold > 0.0 && self.outlier_z_threshold.is_finite()) {
            return Err(ConfigValidationError::InvalidThreshold(
                self.outlier_z_threshold,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid ratio for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidRatio { field: String, value: f64 },

    #[error("'{0}' must be at least 1")]
    ZeroCount(String),

    #[error("Invalid outlier z-score threshold: {0} (must be a positive number)")]
    InvalidThreshold(f64),
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    type_sample_size: Option<usize>,
    type_match_ratio: Option<f64>,
    histogram_buckets: Option<usize>,
    top_values_limit: Option<usize>,
    outlier_z_threshold: Option<f64>,
    variance_method: Option<VarianceMethod>,
    correlation_source: Option<CorrelationSource>,
    correlation_max_samples: Option<usize>,
    correlation_top_pairs: Option<usize>,
    correlation_min_magnitude: Option<f64>,
}

impl ProfilerConfigBuilder {
    /// Set how many leading values type inference looks at.
    pub fn type_sample_size(mut self, size: usize) -> Self {
        self.type_sample_size = Some(size);
        self
    }

    /// Set the super-majority a type needs within the sample.
    ///
    /// # Arguments
    /// * `ratio` - Value between 0.0 and 1.0 (e.g., 0.9 = 90%)
    pub fn type_match_ratio(mut self, ratio: f64) -> Self {
        self.type_match_ratio = Some(ratio);
        self
    }

    /// Set the number of histogram buckets.
    pub fn histogram_buckets(mut self, buckets: usize) -> Self {
        self.histogram_buckets = Some(buckets);
        self
    }

    /// Set how many top values are kept per column.
    pub fn top_values_limit(mut self, limit: usize) -> Self {
        self.top_values_limit = Some(limit);
        self
    }

    /// Set the z-score threshold for outliers.
    pub fn outlier_z_threshold(mut self, threshold: f64) -> Self {
        self.outlier_z_threshold = Some(threshold);
        self
    }

    /// Set the variance formula.
    pub fn variance_method(mut self, method: VarianceMethod) -> Self {
        self.variance_method = Some(method);
        self
    }

    /// Choose between reconstructed and exact correlation.
    pub fn correlation_source(mut self, source: CorrelationSource) -> Self {
        self.correlation_source = Some(source);
        self
    }

    /// Set the series length above which correlation input is stride-sampled.
    pub fn correlation_max_samples(mut self, max: usize) -> Self {
        self.correlation_max_samples = Some(max);
        self
    }

    /// Set how many ranked correlation pairs are kept.
    pub fn correlation_top_pairs(mut self, count: usize) -> Self {
        self.correlation_top_pairs = Some(count);
        self
    }

    /// Set the minimum absolute coefficient for a reported pair.
    pub fn correlation_min_magnitude(mut self, magnitude: f64) -> Self {
        self.correlation_min_magnitude = Some(magnitude);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let defaults = ProfilerConfig::default();
        let config = ProfilerConfig {
            type_sample_size: self.type_sample_size.unwrap_or(defaults.type_sample_size),
            type_match_ratio: self.type_match_ratio.unwrap_or(defaults.type_match_ratio),
            histogram_buckets: self.histogram_buckets.unwrap_or(defaults.histogram_buckets),
            top_values_limit: self.top_values_limit.unwrap_or(defaults.top_values_limit),
            outlier_z_threshold: self
                .outlier_z_threshold
                .unwrap_or(defaults.outlier_z_threshold),
            variance_method: self.variance_method.unwrap_or_default(),
            correlation_source: self.correlation_source.unwrap_or_default(),
            correlation_max_samples: self
                .correlation_max_samples
                .unwrap_or(defaults.correlation_max_samples),
            correlation_top_pairs: self
                .correlation_top_pairs
                .unwrap_or(defaults.correlation_top_pairs),
            correlation_min_magnitude: self
                .correlation_min_magnitude
                .unwrap_or(defaults.correlation_min_magnitude),
        };

        config.validate()?;
        Ok(config)
    }
}
