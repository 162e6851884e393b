//! Descriptive statistics for numeric columns.

use crate::config::{ProfilerConfig, VarianceMethod};
use crate::types::HistogramBucket;

/// Summary of the parseable values of a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats {
    /// Number of values that parsed as numbers.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub histogram: Vec<HistogramBucket>,
    pub outlier_count: usize,
}

/// Parse raw values as `f64`, silently skipping anything that does not parse.
pub fn parse_numeric_values<S: AsRef<str>>(values: &[S]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|value| value.as_ref().parse::<f64>().ok())
        .collect()
}

/// Compute the statistics of a numeric column. Returns `None` when there is
/// nothing to summarize.
pub fn compute_numeric_stats(values: &[f64], config: &ProfilerConfig) -> Option<NumericStats> {
    let first = *values.first()?;

    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let (mean, variance) = match config.variance_method {
        VarianceMethod::Welford => welford_moments(values),
        VarianceMethod::Naive => naive_moments(values),
    };
    let std_dev = variance.max(0.0).sqrt();

    Some(NumericStats {
        count: values.len(),
        min,
        max,
        mean,
        median: median(values),
        std_dev,
        histogram: build_histogram(values, min, max, config.histogram_buckets),
        outlier_count: count_outliers(values, mean, std_dev, config.outlier_z_threshold),
    })
}

/// Mean and population variance via Welford's update.
fn welford_moments(values: &[f64]) -> (f64, f64) {
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for (i, &v) in values.iter().enumerate() {
        let delta = v - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (v - mean);
    }

    (mean, m2 / values.len() as f64)
}

/// Mean and population variance as `E[X²] − E[X]²`.
fn naive_moments(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let (sum, sum_squares) = values
        .iter()
        .fold((0.0, 0.0), |(s, sq), &v| (s + v, sq + v * v));

    let mean = sum / n;
    (mean, sum_squares / n - mean * mean)
}

/// Median of a sorted copy; the mean of the two middle values for even counts.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Equal-width histogram over `[min, max]`.
///
/// The last bucket's upper bound is pinned to `max` and absorbs values equal
/// to it. A zero-width range puts every value in the first bucket.
pub fn build_histogram(
    values: &[f64],
    min: f64,
    max: f64,
    bucket_count: usize,
) -> Vec<HistogramBucket> {
    if values.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let width = (max - min) / bucket_count as f64;
    let last = bucket_count - 1;

    let mut buckets: Vec<HistogramBucket> = (0..bucket_count)
        .map(|i| HistogramBucket {
            lower_bound: min + i as f64 * width,
            upper_bound: if i == last {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let index = if width > 0.0 {
            (((v - min) / width).floor() as usize).min(last)
        } else {
            0
        };
        buckets[index].count += 1;
    }

    buckets
}

/// Count values whose absolute z-score exceeds `threshold`. Zero when the
/// standard deviation is not positive.
fn count_outliers(values: &[f64], mean: f64, std_dev: f64, threshold: f64) -> usize {
    if !(std_dev > 0.0) {
        return 0;
    }

    values
        .iter()
        .filter(|&&v| (v - mean).abs() / std_dev > threshold)
        .count()
}
