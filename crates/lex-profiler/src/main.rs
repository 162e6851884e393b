//! CLI entry point for the dataset profiler.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use lex_profiler::{
    CorrelationSource, DatasetProfiler, OutputFormat, ProfilerConfig, VarianceMethod,
    default_report_path, render_report, write_report,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// CLI-compatible report format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    /// Human-readable summary on stdout
    Terminal,
    /// Machine-readable JSON file
    Json,
    /// Markdown document
    Markdown,
    /// Standalone HTML page
    Html,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli: CliOutputFormat) -> Self {
        match cli {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Markdown => OutputFormat::Markdown,
            CliOutputFormat::Html => OutputFormat::Html,
        }
    }
}

/// CLI-compatible variance method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliVarianceMethod {
    /// Welford's numerically stable update
    Welford,
    /// Sum of squares minus squared mean
    Naive,
}

impl From<CliVarianceMethod> for VarianceMethod {
    fn from(cli: CliVarianceMethod) -> Self {
        match cli {
            CliVarianceMethod::Welford => VarianceMethod::Welford,
            CliVarianceMethod::Naive => VarianceMethod::Naive,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Fast dataset profiling from the command line",
    long_about = "Profiles a CSV file in a single pass: column types, statistics, \
                  histograms, missing values, duplicates, correlations and a \
                  0-100 data quality score.\n\n\
                  EXAMPLES:\n  \
                  # Summary in the terminal\n  \
                  lex-profiler data.csv\n\n  \
                  # Per-column details with histograms\n  \
                  lex-profiler data.csv --verbose\n\n  \
                  # JSON report written to data.csv_profile.json\n  \
                  lex-profiler data.csv -f json\n\n  \
                  # Markdown report with exact correlations\n  \
                  lex-profiler data.csv -f markdown -o report.md --exact-correlation\n\n  \
                  # HTML page written to data.csv_profile.html\n  \
                  lex-profiler data.csv -f html"
)]
struct Args {
    /// Path to the file to profile
    input: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Write the report to this file
    ///
    /// JSON, Markdown and HTML reports default to <filename>_profile.<ext>;
    /// the terminal report goes to stdout unless this is set.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show per-column details in the terminal report
    #[arg(short, long)]
    verbose: bool,

    /// Correlate row-aligned raw values instead of reconstructed samples
    #[arg(long)]
    exact_correlation: bool,

    /// Variance formula for standard deviations
    #[arg(long, value_enum, default_value = "welford")]
    variance: CliVarianceMethod,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the report.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);
    run(args)?;
    info!("Profiling complete");
    Ok(())
}

/// Profile the input and emit the report. A missing CSV input surfaces as
/// `FILE_NOT_FOUND`; Parquet and JSON paths yield the unsupported profile.
fn run(args: Args) -> Result<()> {
    let source = if args.exact_correlation {
        CorrelationSource::Exact
    } else {
        CorrelationSource::Reconstructed
    };
    let config = ProfilerConfig::builder()
        .variance_method(args.variance.into())
        .correlation_source(source)
        .build()?;
    debug!("Profiler configuration: {:?}", config);

    let profile = DatasetProfiler::new(config).profile_path(&args.input)?;
    let format: OutputFormat = args.format.into();

    match (format, args.output) {
        (OutputFormat::Terminal, None) => {
            print!("{}", render_report(&profile, format, args.verbose)?);
        }
        (_, output) => {
            let path = output.unwrap_or_else(|| default_report_path(&profile, format));
            write_report(&profile, format, args.verbose, &path)?;
            println!("Full {} report saved to: {}", format, path.display());
        }
    }

    Ok(())
}
