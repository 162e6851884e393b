//! Single-pass row scan.
//!
//! Every row is visited exactly once. Per column we keep the ordered raw
//! values, an insertion-ordered frequency table and the missing count; for
//! the dataset we keep the missing-cell total and an occurrence count per
//! joined row for duplicate detection.

use crate::types::ValueCount;
use std::collections::HashMap;

/// Joins raw fields into a duplicate-detection key. Not expected in CSV text.
const ROW_KEY_SEPARATOR: char = '\u{1f}';

/// Value → count table that remembers first-seen order.
#[derive(Debug, Default)]
pub(crate) struct FrequencyTable {
    positions: HashMap<String, usize>,
    entries: Vec<ValueCount>,
}

impl FrequencyTable {
    pub(crate) fn record(&mut self, value: &str) {
        match self.positions.get(value) {
            Some(&position) => self.entries[position].count += 1,
            None => {
                self.positions.insert(value.to_string(), self.entries.len());
                self.entries.push(ValueCount::new(value, 1));
            }
        }
    }

    /// Number of distinct values seen.
    pub(crate) fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// The `limit` most frequent values, highest count first. Equal counts
    /// keep first-seen order.
    pub(crate) fn top(&self, limit: usize) -> Vec<ValueCount> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(limit);
        ranked
    }
}

/// Accumulated state of one column during the scan.
#[derive(Debug)]
pub(crate) struct ColumnAccumulator {
    pub(crate) name: String,
    pub(crate) values: Vec<String>,
    /// Row index of each entry in `values`, kept only for exact correlation.
    pub(crate) rows: Option<Vec<usize>>,
    pub(crate) frequencies: FrequencyTable,
    pub(crate) missing_count: usize,
}

impl ColumnAccumulator {
    fn new(name: String, track_rows: bool) -> Self {
        Self {
            name,
            values: Vec::new(),
            rows: track_rows.then(Vec::new),
            frequencies: FrequencyTable::default(),
            missing_count: 0,
        }
    }

    /// Record one cell. Returns `true` when the cell is missing.
    fn observe(&mut self, value: &str, row: usize) -> bool {
        if value.is_empty() {
            self.missing_count += 1;
            return true;
        }

        self.frequencies.record(value);
        self.values.push(value.to_string());
        if let Some(rows) = self.rows.as_mut() {
            rows.push(row);
        }
        false
    }
}

/// Result of a finished scan.
#[derive(Debug)]
pub(crate) struct ScanOutcome {
    pub(crate) row_count: usize,
    pub(crate) missing_cells: usize,
    pub(crate) duplicate_rows: usize,
    pub(crate) columns: Vec<ColumnAccumulator>,
}

/// Consumes rows one at a time and builds column aggregates.
#[derive(Debug)]
pub(crate) struct RowScanner {
    columns: Vec<ColumnAccumulator>,
    row_occurrences: HashMap<String, usize>,
    row_count: usize,
    missing_cells: usize,
}

impl RowScanner {
    /// Create a scanner for the given header. With `track_rows` every value
    /// also remembers the row it came from.
    pub(crate) fn new(headers: &[String], track_rows: bool) -> Self {
        Self {
            columns: headers
                .iter()
                .map(|name| ColumnAccumulator::new(name.clone(), track_rows))
                .collect(),
            row_occurrences: HashMap::new(),
            row_count: 0,
            missing_cells: 0,
        }
    }

    /// Feed one row. `None` and empty fields are missing; fields beyond the
    /// header width only take part in duplicate detection.
    pub(crate) fn push_row<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let row = self.row_count;
        let mut key = String::new();

        for (position, field) in fields.into_iter().enumerate() {
            let value = field.unwrap_or("");
            if position > 0 {
                key.push(ROW_KEY_SEPARATOR);
            }
            key.push_str(value);

            if let Some(column) = self.columns.get_mut(position)
                && column.observe(value, row)
            {
                self.missing_cells += 1;
            }
        }

        *self.row_occurrences.entry(key).or_insert(0) += 1;
        self.row_count += 1;
    }

    pub(crate) fn finish(self) -> ScanOutcome {
        let duplicate_rows = self
            .row_occurrences
            .values()
            .filter(|&&count| count > 1)
            .map(|count| count - 1)
            .sum();

        ScanOutcome {
            row_count: self.row_count,
            missing_cells: self.missing_cells,
            duplicate_rows,
            columns: self.columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn scan(names: &[&str], rows: &[&[&str]]) -> ScanOutcome {
        let mut scanner = RowScanner::new(&headers(names), false);
        for row in rows {
            scanner.push_row(row.iter().map(|field| Some(*field)));
        }
        scanner.finish()
    }

    #[test]
    fn test_missing_cells_are_counted_per_column_and_dataset() {
        let outcome = scan(&["a", "b"], &[&["1", ""], &["", ""], &["3", "x"]]);

        assert_eq!(outcome.row_count, 3);
        assert_eq!(outcome.missing_cells, 3);
        assert_eq!(outcome.columns[0].missing_count, 1);
        assert_eq!(outcome.columns[1].missing_count, 2);
        assert_eq!(outcome.columns[0].values, vec!["1", "3"]);
        assert_eq!(outcome.columns[1].values, vec!["x"]);
    }

    #[test]
    fn test_null_fields_are_missing() {
        let mut scanner = RowScanner::new(&headers(&["a", "b"]), false);
        scanner.push_row([Some("1"), None]);
        let outcome = scanner.finish();

        assert_eq!(outcome.missing_cells, 1);
        assert_eq!(outcome.columns[1].missing_count, 1);
    }

    #[test]
    fn test_duplicates_count_repeat_occurrences_only() {
        let outcome = scan(
            &["a", "b"],
            &[
                &["1", "x"],
                &["1", "x"],
                &["1", "x"],
                &["2", "y"],
                &["2", "y"],
                &["3", "z"],
            ],
        );
        assert_eq!(outcome.duplicate_rows, 3);
    }

    #[test]
    fn test_rows_differing_in_one_field_are_not_duplicates() {
        let outcome = scan(&["a", "b"], &[&["1", ""], &["1", "v"]]);
        assert_eq!(outcome.duplicate_rows, 0);
    }

    #[test]
    fn test_separator_prevents_false_duplicates() {
        let outcome = scan(&["a", "b"], &[&["x|y", "z"], &["x", "y|z"]]);
        assert_eq!(outcome.duplicate_rows, 0);
    }

    #[test]
    fn test_extra_fields_are_ignored_for_columns() {
        let outcome = scan(&["a"], &[&["1", "extra", "more"], &["2"]]);

        assert_eq!(outcome.columns.len(), 1);
        assert_eq!(outcome.columns[0].values, vec!["1", "2"]);
        assert_eq!(outcome.missing_cells, 0);
    }

    #[test]
    fn test_row_tracking() {
        let mut scanner = RowScanner::new(&headers(&["a"]), true);
        scanner.push_row([Some("1")]);
        scanner.push_row([None]);
        scanner.push_row([Some("3")]);
        let outcome = scanner.finish();

        assert_eq!(outcome.columns[0].rows, Some(vec![0, 2]));
    }

    #[test]
    fn test_top_values_ranked_and_capped() {
        let mut table = FrequencyTable::default();
        for (value, count) in [("e", 1), ("d", 2), ("c", 3), ("b", 5), ("a", 10)] {
            for _ in 0..count {
                table.record(value);
            }
        }

        assert_eq!(
            table.top(3),
            vec![
                ValueCount::new("a", 10),
                ValueCount::new("b", 5),
                ValueCount::new("c", 3),
            ]
        );
        assert_eq!(table.distinct(), 5);
    }

    #[test]
    fn test_top_values_ties_keep_first_seen_order() {
        let mut table = FrequencyTable::default();
        for value in ["y", "x", "z", "x", "y", "w"] {
            table.record(value);
        }

        let top: Vec<String> = table.top(5).into_iter().map(|vc| vc.value).collect();
        assert_eq!(top, vec!["y", "x", "z", "w"]);
    }
}
