//! Report generation module.
//!
//! Renderers are plain functions from a [`DatasetProfile`] to text. They hold
//! no state and print nothing; the caller decides where the text goes.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_profiler::reporting::{OutputFormat, default_report_path, write_report};
//!
//! let path = default_report_path(&profile, OutputFormat::Json);
//! write_report(&profile, OutputFormat::Json, false, &path)?;
//! ```

mod html;
mod json;
mod markdown;
mod terminal;

use crate::error::{ProfilingError, Result};
use crate::types::DatasetProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

pub use html::render_html;
pub use json::{JsonBucket, JsonColumnReport, JsonReport, JsonTopValue};
pub use markdown::render_markdown;
pub use terminal::render_terminal;

/// Report flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Terminal => "txt",
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Terminal => "terminal",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Html => "html",
        };
        f.write_str(name)
    }
}

/// Render a profile in the given format. `verbose` adds per-column detail to
/// the terminal report and is ignored otherwise.
pub fn render_report(
    profile: &DatasetProfile,
    format: OutputFormat,
    verbose: bool,
) -> Result<String> {
    match format {
        OutputFormat::Terminal => Ok(render_terminal(profile, verbose)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport::from_profile(profile))?),
        OutputFormat::Markdown => Ok(render_markdown(profile)),
        OutputFormat::Html => Ok(render_html(profile)),
    }
}

/// Render a profile and write it to `path`.
pub fn write_report(
    profile: &DatasetProfile,
    format: OutputFormat,
    verbose: bool,
    path: &Path,
) -> Result<()> {
    let content = render_report(profile, format, verbose)?;
    std::fs::write(path, content)
        .map_err(|e| ProfilingError::ReportFailed(format!("{}: {e}", path.display())))?;

    info!("Wrote {} report to {}", format, path.display());
    Ok(())
}

/// `{filename}_profile.{ext}` next to the working directory.
pub fn default_report_path(profile: &DatasetProfile, format: OutputFormat) -> PathBuf {
    PathBuf::from(format!("{}_profile.{}", profile.filename, format.extension()))
}

/// Format an integer with comma thousands separators.
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-width bar, filled in proportion to `score` out of 100.
pub fn quality_bar(score: u8, width: usize) -> String {
    let filled = width * usize::from(score.min(100)) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Rating word for a quality score.
pub fn quality_label(score: u8) -> &'static str {
    match score {
        90.. => "Good",
        70..=89 => "Fair",
        _ => "Poor",
    }
}

/// Size in mebibytes, as shown in report headers.
pub(crate) fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
