//! Property-based tests for the profiler invariants.
//!
//! Random tables are profiled through `profile_records` and the resulting
//! profile is checked for properties that must hold for any input:
//! - missing cells add up across columns
//! - distinct counts never exceed value counts
//! - the quality score stays within `0..=100`
//! - histograms account for every parsed numeric value
//! - correlation coefficients stay within `[-1, 1]`

use lex_profiler::profiler::build_histogram;
use lex_profiler::{
    CorrelationSource, DatasetProfiler, FileFormat, ProfilerConfig, SourceInfo,
    pearson_correlation,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// A single cell: mostly numbers, some labels, some blanks.
fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (-1000i64..1000).prop_map(|n| n.to_string()),
        2 => (-1000.0f64..1000.0).prop_map(|f| format!("{f:.3}")),
        2 => prop::sample::select(vec!["red", "green", "blue"]).prop_map(str::to_string),
        1 => Just(String::new()),
    ]
}

/// A rectangular table with 1 to 4 columns and up to 40 rows.
fn table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    (1usize..=4).prop_flat_map(|width| {
        let headers: Vec<String> = (0..width).map(|i| format!("col_{i}")).collect();
        let rows = prop::collection::vec(prop::collection::vec(cell(), width), 0..40);
        (Just(headers), rows)
    })
}

fn source() -> SourceInfo {
    SourceInfo::new("generated.csv", 0, FileFormat::Csv)
}

// ============================================================================
// Profile Invariants
// ============================================================================

proptest! {
    #[test]
    fn test_missing_cells_add_up((headers, rows) in table()) {
        let profile = DatasetProfiler::default().profile_records(source(), &headers, &rows);

        let per_column: usize = profile.columns.values().map(|c| c.missing_count).sum();
        prop_assert_eq!(per_column, profile.missing_cells);
        prop_assert_eq!(profile.row_count, rows.len());

        for column in profile.columns.values() {
            prop_assert_eq!(column.count + column.missing_count, rows.len());
        }
    }

    #[test]
    fn test_unique_counts_are_consistent((headers, rows) in table()) {
        let profile = DatasetProfiler::default().profile_records(source(), &headers, &rows);

        for column in profile.columns.values() {
            prop_assert!(column.unique_count <= column.count);
            prop_assert_eq!(column.is_unique, column.unique_count == column.count);
            prop_assert!(column.top_values.len() <= 5);
        }
        prop_assert!(profile.duplicate_rows < rows.len().max(1));
    }

    #[test]
    fn test_score_is_bounded((headers, rows) in table()) {
        let profile = DatasetProfiler::default().profile_records(source(), &headers, &rows);

        prop_assert!(profile.quality_score <= 100);
        if rows.is_empty() {
            prop_assert_eq!(profile.quality_score, 0);
        }
    }

    #[test]
    fn test_histograms_cover_parsed_values((headers, rows) in table()) {
        let profile = DatasetProfiler::default().profile_records(source(), &headers, &rows);

        for (position, name) in headers.iter().enumerate() {
            let column = &profile.columns[name];
            if !column.is_numeric {
                prop_assert!(column.histogram.is_empty());
                continue;
            }

            let parsed = rows
                .iter()
                .filter(|row| row[position].parse::<f64>().is_ok())
                .count();
            let bucketed: usize = column.histogram.iter().map(|b| b.count).sum();
            prop_assert_eq!(bucketed, parsed);
        }
    }

    #[test]
    fn test_correlations_are_bounded((headers, rows) in table()) {
        let config = ProfilerConfig::builder()
            .correlation_source(CorrelationSource::Exact)
            .build()
            .unwrap();
        let profile = DatasetProfiler::new(config).profile_records(source(), &headers, &rows);

        if let Some(matrix) = &profile.correlation_matrix {
            for row in matrix.values.values() {
                for r in row.values() {
                    prop_assert!((-1.0..=1.0).contains(r));
                }
            }
        }
    }
}

// ============================================================================
// Building Blocks
// ============================================================================

proptest! {
    #[test]
    fn test_pearson_is_bounded(
        pairs in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..200),
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let r = pearson_correlation(&x, &y, 10_000);
        prop_assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_pearson_of_constant_series_is_zero(
        constant in -1000i64..1000,
        y in prop::collection::vec(-1e6f64..1e6, 1..100),
    ) {
        let x = vec![constant as f64; y.len()];
        prop_assert_eq!(pearson_correlation(&x, &y, 10_000), 0.0);
    }

    #[test]
    fn test_histogram_counts_every_value(
        values in prop::collection::vec(-1e6f64..1e6, 1..300),
        buckets in 1usize..20,
    ) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let histogram = build_histogram(&values, min, max, buckets);

        prop_assert_eq!(histogram.len(), buckets);
        prop_assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), values.len());
        prop_assert_eq!(histogram[0].lower_bound, min);
        prop_assert_eq!(histogram[buckets - 1].upper_bound, max);
    }
}
