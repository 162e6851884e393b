//! Type inference for raw column values.
//!
//! Classification looks only at the first `sample_size` non-missing values in
//! file order. A super-majority of that window decides the whole column; later
//! values of a different shape do not change the result.

use crate::types::InferredType;
use chrono::{DateTime, NaiveDate};

/// Fixed-width date layouts accepted besides RFC 3339. In each shape `D`
/// stands for one ASCII digit.
const DATE_LAYOUTS: [(&str, &str); 2] = [("DDDD-DD-DD", "%Y-%m-%d"), ("DD/DD/DDDD", "%m/%d/%Y")];

/// Leading `date T time` part every RFC 3339 value must have.
const RFC3339_PREFIX: &str = "DDDD-DD-DDTDD:DD:DD";

/// Shape of a single raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueShape {
    Integer,
    Float,
    Date,
    Text,
}

fn classify(value: &str) -> ValueShape {
    if value.parse::<i64>().is_ok() {
        ValueShape::Integer
    } else if value.parse::<f64>().is_ok() {
        ValueShape::Float
    } else if is_date_like(value) {
        ValueShape::Date
    } else {
        ValueShape::Text
    }
}

/// Check whether a value is an RFC 3339 timestamp, a zero-padded
/// `YYYY-MM-DD` or a zero-padded `MM/DD/YYYY` date.
pub fn is_date_like(value: &str) -> bool {
    for (shape, format) in DATE_LAYOUTS {
        if has_shape(value, shape) {
            return NaiveDate::parse_from_str(value, format).is_ok();
        }
    }
    is_rfc3339(value)
}

/// Uppercase `T` separator and `Z` suffix only.
fn is_rfc3339(value: &str) -> bool {
    value.len() > RFC3339_PREFIX.len()
        && value
            .get(..RFC3339_PREFIX.len())
            .is_some_and(|prefix| has_shape(prefix, RFC3339_PREFIX))
        && !value.ends_with('z')
        && DateTime::parse_from_rfc3339(value).is_ok()
}

fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'D' => v.is_ascii_digit(),
            _ => v == s,
        })
}

/// Infer the type of a column from its ordered non-missing values.
///
/// The thresholds are checked in order and the first match wins: integer,
/// then float (integers count towards it), then datetime, else string.
pub fn infer_column_type<S: AsRef<str>>(
    values: &[S],
    sample_size: usize,
    match_ratio: f64,
) -> InferredType {
    if values.is_empty() {
        return InferredType::Unknown;
    }

    let sample = &values[..values.len().min(sample_size)];

    let (mut int_count, mut float_count, mut date_count) = (0usize, 0usize, 0usize);
    for value in sample {
        match classify(value.as_ref()) {
            ValueShape::Integer => int_count += 1,
            ValueShape::Float => float_count += 1,
            ValueShape::Date => date_count += 1,
            ValueShape::Text => {}
        }
    }

    let required = sample.len() as f64 * match_ratio;

    if int_count as f64 >= required {
        InferredType::Integer
    } else if (int_count + float_count) as f64 >= required {
        InferredType::Float
    } else if date_count as f64 >= required {
        InferredType::Datetime
    } else {
        InferredType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(values: &[&str]) -> InferredType {
        infer_column_type(values, 100, 0.9)
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(infer(&[]), InferredType::Unknown);
    }

    #[test]
    fn test_integers() {
        assert_eq!(infer(&["1", "2", "3", "4", "5"]), InferredType::Integer);
        assert_eq!(infer(&["-7", "+3", "0"]), InferredType::Integer);
    }

    #[test]
    fn test_floats() {
        assert_eq!(infer(&["1.1", "2.2", "3.3", "4", "5.5"]), InferredType::Float);
        assert_eq!(infer(&["1e3", "2.5E-2", "7"]), InferredType::Float);
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            infer(&["2023-01-01", "2023-01-02", "2023-01-03"]),
            InferredType::Datetime
        );
        assert_eq!(
            infer(&["01/01/2023", "01/02/2023", "01/03/2023"]),
            InferredType::Datetime
        );
        assert_eq!(
            infer(&["2023-01-01T10:00:00Z", "2023-01-02T11:30:00+02:00"]),
            InferredType::Datetime
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(infer(&["abc", "def", "ghi", "jkl"]), InferredType::String);
    }

    #[test]
    fn test_mixed_below_super_majority() {
        assert_eq!(infer(&["abc", "123", "def", "456"]), InferredType::String);
    }

    #[test]
    fn test_ninety_percent_is_enough() {
        let mut values = vec!["1"; 9];
        values.push("x");
        assert_eq!(infer(&values), InferredType::Integer);

        let mut values = vec!["1"; 8];
        values.extend(["x", "y"]);
        assert_eq!(infer(&values), InferredType::String);
    }

    #[test]
    fn test_only_leading_window_is_sampled() {
        let mut values: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        values.extend((0..500).map(|i| format!("text{i}")));
        assert_eq!(infer_column_type(&values, 100, 0.9), InferredType::Integer);
    }

    #[test]
    fn test_is_date_like() {
        assert!(is_date_like("2024-02-29"));
        assert!(is_date_like("12/31/1999"));
        assert!(is_date_like("2023-01-01T10:00:00.250Z"));
        assert!(!is_date_like("2023-13-01"));
        assert!(!is_date_like("02/30/2024"));
        assert!(!is_date_like("yesterday"));
    }

    #[test]
    fn test_date_fields_must_be_zero_padded() {
        for value in ["1/5/2023", "2023-1-5", "23-01-01", "+2023-01-01", "2023-01-5"] {
            assert!(!is_date_like(value), "{value} should not be a date");
        }
    }

    #[test]
    fn test_rfc3339_needs_uppercase_separators() {
        for value in [
            "2023-01-01 10:00:00Z",
            "2023-01-01t10:00:00Z",
            "2023-01-01T10:00:00z",
            "2023-01-01T10:00:00",
        ] {
            assert!(!is_date_like(value), "{value} should not be a date");
        }
        assert_eq!(
            infer(&["1/5/2023", "2023-1-5", "23-01-01", "2023-01-01 10:00:00Z"]),
            InferredType::String
        );
    }
}
