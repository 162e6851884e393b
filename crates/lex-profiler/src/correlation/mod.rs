//! Pairwise Pearson correlation between numeric columns.
//!
//! By default each column's series is *reconstructed* from its summaries:
//! every histogram bucket midpoint repeated `count` times, followed by every
//! parseable top value repeated `count` times. Values that are both in a
//! bucket and among the top values are counted twice. This is an
//! approximation; [`CorrelationSource::Exact`] correlates the raw values of
//! rows where both columns parse instead.
//!
//! [`CorrelationSource::Exact`]: crate::config::CorrelationSource::Exact

use crate::config::ProfilerConfig;
use crate::types::{ColumnProfile, CorrelationMatrix, CorrelationPair};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Numeric values of one column keyed by the row they came from.
pub type RowSeries = Vec<(usize, f64)>;

// ============================================================================
// Series construction
// ============================================================================

/// Rebuild an approximate numeric series from a column's histogram and top
/// values. Empty for columns without a histogram.
pub fn reconstruct_sample(column: &ColumnProfile) -> Vec<f64> {
    if !column.is_numeric || column.histogram.is_empty() {
        return Vec::new();
    }

    let mut values = Vec::new();
    for bucket in &column.histogram {
        values.extend(std::iter::repeat_n(bucket.midpoint(), bucket.count));
    }
    for top in &column.top_values {
        if let Ok(value) = top.value.parse::<f64>() {
            values.extend(std::iter::repeat_n(value, top.count));
        }
    }
    values
}

/// Values present in both series, aligned by row. Both inputs must be sorted
/// by row index.
fn align_rows(a: &[(usize, f64)], b: &[(usize, f64)]) -> (Vec<f64>, Vec<f64>) {
    let (mut x, mut y) = (Vec::new(), Vec::new());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                x.push(a[i].1);
                y.push(b[j].1);
                i += 1;
                j += 1;
            }
        }
    }

    (x, y)
}

// ============================================================================
// Pearson coefficient
// ============================================================================

/// Pearson correlation coefficient of two equally long series.
///
/// Returns 0 for empty or unequal inputs and for zero-variance series.
/// Series longer than `max_samples` are stride-sampled with step
/// `len / max_samples`. The result is always within `[-1, 1]`.
pub fn pearson_correlation(x: &[f64], y: &[f64], max_samples: usize) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let step = if max_samples > 0 && x.len() > max_samples {
        (x.len() / max_samples).max(1)
    } else {
        1
    };

    let (mut n, mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) =
        (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().step_by(step).zip(y.iter().step_by(step)) {
        n += 1.0;
        sum_x += a;
        sum_y += b;
        sum_xy += a * b;
        sum_x2 += a * a;
        sum_y2 += b * b;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    let r = numerator / denominator;
    if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
}

// ============================================================================
// Matrix
// ============================================================================

/// Build the correlation matrix over the numeric columns of a profile.
///
/// `exact` holds row-indexed series for exact mode; columns missing from it
/// fall back to the reconstructed sample. Returns `None` with fewer than two
/// numeric columns that have values.
pub fn build_correlation_matrix<'a, I>(
    columns: I,
    exact: Option<&HashMap<String, RowSeries>>,
    config: &ProfilerConfig,
) -> Option<CorrelationMatrix>
where
    I: IntoIterator<Item = &'a ColumnProfile>,
{
    let mut numeric: Vec<&ColumnProfile> = columns
        .into_iter()
        .filter(|column| column.is_numeric && column.count > 0)
        .collect();
    if numeric.len() < 2 {
        return None;
    }
    numeric.sort_by(|a, b| a.name.cmp(&b.name));

    let samples: Vec<Vec<f64>> = numeric.iter().map(|column| reconstruct_sample(column)).collect();

    let names: Vec<String> = numeric.iter().map(|column| column.name.clone()).collect();
    let mut values: BTreeMap<String, BTreeMap<String, f64>> = names
        .iter()
        .map(|name| (name.clone(), BTreeMap::new()))
        .collect();
    let mut pairs = Vec::new();

    for (i, first) in names.iter().enumerate() {
        set(&mut values, first, first, 1.0);

        for (j, second) in names.iter().enumerate().skip(i + 1) {
            let r = match exact.and_then(|series| Some((series.get(first)?, series.get(second)?))) {
                Some((a, b)) => {
                    let (x, y) = align_rows(a, b);
                    pearson_correlation(&x, &y, config.correlation_max_samples)
                }
                None => {
                    pearson_correlation(&samples[i], &samples[j], config.correlation_max_samples)
                }
            };

            set(&mut values, first, second, r);
            set(&mut values, second, first, r);
            pairs.push(CorrelationPair {
                column1: first.clone(),
                column2: second.clone(),
                correlation: r,
            });
        }
    }

    Some(CorrelationMatrix {
        columns: names,
        values,
        top_pairs: rank_pairs(
            pairs,
            config.correlation_top_pairs,
            config.correlation_min_magnitude,
        ),
    })
}

fn set(values: &mut BTreeMap<String, BTreeMap<String, f64>>, row: &str, column: &str, r: f64) {
    if let Some(entries) = values.get_mut(row) {
        entries.insert(column.to_string(), r);
    }
}

/// Stable sort by descending |r|, keep the first `limit`, then drop the weak.
fn rank_pairs(
    mut pairs: Vec<CorrelationPair>,
    limit: usize,
    min_magnitude: f64,
) -> Vec<CorrelationPair> {
    pairs.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
    pairs.truncate(limit);
    pairs.retain(|pair| pair.correlation.abs() > min_magnitude);
    pairs
}

// ============================================================================
// Labels
// ============================================================================

/// Qualitative strength of a coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CorrelationStrength {
    Negligible,
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    pub fn of(r: f64) -> Self {
        match r.abs() {
            a if a >= 0.9 => Self::VeryStrong,
            a if a >= 0.7 => Self::Strong,
            a if a >= 0.5 => Self::Moderate,
            a if a >= 0.3 => Self::Weak,
            a if a >= 0.1 => Self::VeryWeak,
            _ => Self::Negligible,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Negligible => "Negligible",
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sign of a coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl CorrelationDirection {
    pub fn of(r: f64) -> Self {
        if r > 0.0 {
            Self::Positive
        } else if r < 0.0 {
            Self::Negative
        } else {
            Self::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::None => "None",
        }
    }
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HistogramBucket, InferredType, ValueCount};
    use pretty_assertions::assert_eq;

    fn numeric_column(name: &str, buckets: &[(f64, f64, usize)]) -> ColumnProfile {
        let mut column = ColumnProfile::new(name);
        column.data_type = InferredType::Float;
        column.is_numeric = true;
        column.histogram = buckets
            .iter()
            .map(|&(lower_bound, upper_bound, count)| HistogramBucket {
                lower_bound,
                upper_bound,
                count,
            })
            .collect();
        column.count = column.histogram.iter().map(|b| b.count).sum();
        column
    }

    // ========================================================================
    // Pearson
    // ========================================================================

    #[test]
    fn test_perfect_correlations() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 6.0, 8.0, 10.0];
        let down = [5.0, 4.0, 3.0, 2.0, 1.0];

        assert!((pearson_correlation(&x, &up, 10_000) - 1.0).abs() < 1e-12);
        assert!((pearson_correlation(&x, &down, 10_000) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs_are_zero() {
        assert_eq!(pearson_correlation(&[], &[], 10_000), 0.0);
        assert_eq!(pearson_correlation(&[1.0, 2.0], &[1.0], 10_000), 0.0);
        assert_eq!(pearson_correlation(&[3.0; 10], &[3.0; 10], 10_000), 0.0);
        assert_eq!(
            pearson_correlation(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0], 10_000),
            0.0
        );
    }

    #[test]
    fn test_non_finite_input_is_zero() {
        let x = [1.0, f64::NAN, 3.0];
        let y = [1.0, 2.0, 3.0];
        assert_eq!(pearson_correlation(&x, &y, 10_000), 0.0);
    }

    #[test]
    fn test_stride_sampling_keeps_linear_relation() {
        let x: Vec<f64> = (0..25_000).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
        assert!((pearson_correlation(&x, &y, 10_000) - 1.0).abs() < 1e-9);
    }

    // ========================================================================
    // Reconstruction
    // ========================================================================

    #[test]
    fn test_reconstruct_sample_double_counts_top_values() {
        let mut column = numeric_column("a", &[(0.0, 2.0, 2), (2.0, 4.0, 1)]);
        column.top_values = vec![ValueCount::new("1", 2), ValueCount::new("n/a", 4)];

        assert_eq!(reconstruct_sample(&column), vec![1.0, 1.0, 3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_reconstruct_sample_requires_histogram() {
        let mut column = ColumnProfile::new("s");
        column.top_values = vec![ValueCount::new("1", 3)];
        assert!(reconstruct_sample(&column).is_empty());
    }

    #[test]
    fn test_align_rows_keeps_shared_rows_only() {
        let a = vec![(0, 1.0), (1, 2.0), (3, 4.0)];
        let b = vec![(1, 20.0), (2, 30.0), (3, 40.0)];
        assert_eq!(align_rows(&a, &b), (vec![2.0, 4.0], vec![20.0, 40.0]));
    }

    // ========================================================================
    // Matrix
    // ========================================================================

    #[test]
    fn test_matrix_needs_two_numeric_columns() {
        let only = numeric_column("a", &[(0.0, 1.0, 3)]);
        let text = ColumnProfile::new("t");
        let matrix = build_correlation_matrix([&only, &text], None, &ProfilerConfig::default());
        assert!(matrix.is_none());
    }

    #[test]
    fn test_matrix_is_sorted_symmetric_with_unit_diagonal() {
        let b = numeric_column("b", &[(0.0, 1.0, 1), (1.0, 2.0, 2), (2.0, 3.0, 3)]);
        let a = numeric_column("a", &[(0.0, 1.0, 3), (1.0, 2.0, 2), (2.0, 3.0, 1)]);
        let c = numeric_column("c", &[(0.0, 1.0, 1), (1.0, 2.0, 2), (2.0, 3.0, 3)]);

        let matrix =
            build_correlation_matrix([&b, &a, &c], None, &ProfilerConfig::default()).unwrap();

        assert_eq!(matrix.columns, vec!["a", "b", "c"]);
        for name in &matrix.columns {
            assert_eq!(matrix.get(name, name), Some(1.0));
        }
        assert_eq!(matrix.get("a", "b"), matrix.get("b", "a"));
        assert!((matrix.get("b", "c").unwrap() - 1.0).abs() < 1e-12);
        assert!(matrix.get("a", "b").unwrap() < 1.0);

        assert_eq!(matrix.top_pairs[0].column1, "b");
        assert_eq!(matrix.top_pairs[0].column2, "c");
    }

    #[test]
    fn test_exact_mode_uses_row_aligned_values() {
        let a = numeric_column("a", &[(0.0, 1.0, 4)]);
        let b = numeric_column("b", &[(0.0, 1.0, 4)]);
        let exact = HashMap::from([
            (
                "a".to_string(),
                vec![(0, 1.0), (1, 2.0), (2, 3.0), (3, 4.0)],
            ),
            (
                "b".to_string(),
                vec![(0, 8.0), (1, 6.0), (2, 4.0), (3, 2.0)],
            ),
        ]);

        let matrix =
            build_correlation_matrix([&a, &b], Some(&exact), &ProfilerConfig::default()).unwrap();
        assert!((matrix.get("a", "b").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_pairs_filters_after_truncating() {
        let pair = |name: &str, correlation| CorrelationPair {
            column1: name.to_string(),
            column2: "z".to_string(),
            correlation,
        };
        let ranked = rank_pairs(
            vec![pair("a", 0.05), pair("b", -0.9), pair("c", 0.5), pair("d", 0.9)],
            3,
            0.1,
        );

        let names: Vec<&str> = ranked.iter().map(|p| p.column1.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c"]);

        let ranked = rank_pairs(vec![pair("a", 0.05), pair("b", 0.08)], 10, 0.1);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_strength_and_direction_labels() {
        assert_eq!(CorrelationStrength::of(0.95).label(), "Very Strong");
        assert_eq!(CorrelationStrength::of(-0.7).label(), "Strong");
        assert_eq!(CorrelationStrength::of(0.5), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::of(0.3), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::of(-0.1), CorrelationStrength::VeryWeak);
        assert_eq!(CorrelationStrength::of(0.05), CorrelationStrength::Negligible);

        assert_eq!(CorrelationDirection::of(0.2), CorrelationDirection::Positive);
        assert_eq!(CorrelationDirection::of(-0.2).label(), "Negative");
        assert_eq!(CorrelationDirection::of(0.0), CorrelationDirection::None);
    }
}
