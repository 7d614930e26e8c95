#![warn(missing_docs)]
//! adphase CLI Library
//!
//! Command-line harness around the adphase statistics engine. An analysis is
//! described by an `adphase.toml` file; flags override individual settings.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     adphase_cli::run()
//! }
//! ```

mod config;
mod executor;

pub use config::*;
pub use executor::{
    AnalysisInput, AnalysisOutcome, Analyzer, build_report, format_human_output,
    format_statistic_output, resolve_seed,
};

use adphase_report::{OutputFormat, generate_csv_report, generate_json_report};
use adphase_stats::{SamplingMethod, anderson_darling};
use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// adphase CLI arguments
#[derive(Parser, Debug)]
#[command(name = "adphase")]
#[command(
    author,
    version,
    about = "adphase - Anderson-Darling tests of event phases against empirical null distributions"
)]
pub struct Cli {
    /// Optional subcommand (Test, Statistic, Init); defaults to Test
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (default: nearest adphase.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: human, json, csv
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Number of synthetic samples in the null distribution
    #[arg(long, short = 'n', global = true)]
    pub iterations: Option<usize>,

    /// RNG seed for calibration
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Sampling method: inverse, mcmc
    #[arg(long, global = true)]
    pub method: Option<SamplingMethod>,

    /// Number of threads for calibration
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0", global = true)]
    pub threads: usize,

    /// Run calibration on the calling thread only
    #[arg(long, global = true)]
    pub sequential: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full significance test (default)
    Test,
    /// Only compute A² of the observed sample
    Statistic,
    /// Print a default adphase.toml
    Init,
}

/// Run the adphase CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the adphase CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs go to stderr so reports on stdout stay machine-readable
    let filter = if cli.verbose {
        "adphase=debug"
    } else {
        "adphase=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some(Commands::Init) = cli.command {
        return write_output(cli.output.as_deref(), &AdConfig::default_toml());
    }

    let config = load_config(&cli)?;
    let format = resolve_format(&cli, &config)?;

    match cli.command {
        Some(Commands::Statistic) => compute_statistic(&cli, &config, format),
        _ => run_test(&cli, &config, format),
    }
}

/// An explicit `--config` must load; otherwise fall back to discovery, then defaults.
fn load_config(cli: &Cli) -> anyhow::Result<AdConfig> {
    match &cli.config {
        Some(path) => AdConfig::load(path),
        None => Ok(AdConfig::discover().unwrap_or_default()),
    }
}

fn resolve_format(cli: &Cli, config: &AdConfig) -> anyhow::Result<OutputFormat> {
    let format = cli.format.as_deref().unwrap_or(&config.output.format);
    format.parse::<OutputFormat>().map_err(anyhow::Error::msg)
}

/// Layer CLI overrides on top of the `[calibration]` section.
fn build_calibration_config(cli: &Cli, config: &AdConfig) -> adphase_stats::CalibrationConfig {
    let mut calibration = config.calibration.to_calibration_config();
    if let Some(iterations) = cli.iterations {
        calibration.iterations = iterations;
    }
    if let Some(method) = cli.method {
        calibration.method = method;
    }
    if cli.sequential {
        calibration.parallel = false;
    }
    calibration
}

fn run_test(cli: &Cli, config: &AdConfig, format: OutputFormat) -> anyhow::Result<()> {
    // Configure Rayon thread pool for calibration
    if cli.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let sample = config.sample.resolve(config.null_model.period)?;
    let (source, null_cdf) = config.null_model.build(&sample)?;
    debug!(knots = null_cdf.len(), %source, "built null model");

    let calibration = build_calibration_config(cli, config);
    let seed = resolve_seed(cli.seed.or(config.calibration.seed));
    info!(
        sample_size = sample.len(),
        iterations = calibration.iterations,
        method = %calibration.method,
        seed,
        "running significance test"
    );

    let outcome = Analyzer::new(calibration).run(AnalysisInput {
        sample,
        null_cdf,
        source,
        seed,
    })?;

    let output = match format {
        OutputFormat::Json => {
            let report = build_report(&outcome, config.output.include_null_values);
            generate_json_report(&report)?
        }
        OutputFormat::Csv => generate_csv_report(&outcome.null),
        OutputFormat::Human => format_human_output(&build_report(&outcome, false)),
    };

    write_output(cli.output.as_deref(), &output)
}

fn compute_statistic(cli: &Cli, config: &AdConfig, format: OutputFormat) -> anyhow::Result<()> {
    let sample = config.sample.resolve(config.null_model.period)?;
    let (source, null_cdf) = config.null_model.build(&sample)?;
    let statistic = anderson_darling(&sample, &null_cdf)
        .context("failed to evaluate A² of the observed sample")?;

    let output = match format {
        OutputFormat::Json => {
            let observed = adphase_report::ObservedResult::from(&statistic);
            serde_json::to_string_pretty(&observed)?
        }
        OutputFormat::Csv => format!(
            "statistic,sample_size,used,excluded\n{},{},{},{}\n",
            statistic.statistic,
            statistic.sample_size(),
            statistic.used,
            statistic.excluded
        ),
        OutputFormat::Human => format_statistic_output(&statistic, source),
    };

    write_output(cli.output.as_deref(), &output)
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    if let Some(path) = path {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}
