//! Data quality analysis module.
//!
//! This module turns finalized column and dataset aggregates into tagged
//! quality issues, an aggregate 0-100 score and human-readable
//! recommendations. Everything here is a pure function of the profile.

mod detector;
mod recommendations;
mod scorer;

pub use detector::{column_issues, dataset_issues, outlier_issue};
pub use recommendations::build_recommendations;
pub use scorer::calculate_quality_score;
