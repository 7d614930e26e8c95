//! Analysis Execution
//!
//! Evaluates the observed A², calibrates its null distribution for the same
//! sample size and locates the observation within it.

use adphase_report::NullModelSource;
use adphase_stats::{
    AdStatistic, CalibrationConfig, NullCdf, NullDistribution, SignificanceResult,
    anderson_darling, assess_significance, sample_null_distribution_with_progress,
};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Instant;
use tracing::info;

/// Everything a single analysis needs
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    /// Observed phases
    pub sample: Vec<f64>,
    /// Null hypothesis
    pub null_cdf: NullCdf,
    /// How the null hypothesis was built
    pub source: NullModelSource,
    /// Seed for the calibration RNG
    pub seed: u64,
}

/// Outputs of a single analysis
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// How the null hypothesis was built
    pub source: NullModelSource,
    /// Null hypothesis the sample was tested against
    pub null_cdf: NullCdf,
    /// A² of the observed sample
    pub observed: AdStatistic,
    /// Calibrated null distribution of A²
    pub null: NullDistribution,
    /// Where the observation falls in the null distribution
    pub significance: SignificanceResult,
    /// Seed the calibration RNG was started from
    pub seed: u64,
    /// Calibration settings used
    pub config: CalibrationConfig,
    /// Wall-clock time of the analysis in milliseconds
    pub duration_ms: f64,
}

/// Use `seed`, or draw one from the thread RNG and log it so the run can be repeated
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::thread_rng().next_u64();
            info!(seed, "no seed configured, using a random one");
            seed
        }
    }
}

/// Runs analyses with a fixed calibration configuration
pub struct Analyzer {
    config: CalibrationConfig,
    show_progress: bool,
}

impl Analyzer {
    /// Create an analyzer with the progress bar enabled
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    /// Enable or disable the calibration progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the full test on `input`
    pub fn run(&self, input: AnalysisInput) -> anyhow::Result<AnalysisOutcome> {
        let start = Instant::now();

        let observed = anderson_darling(&input.sample, &input.null_cdf)
            .context("failed to evaluate A² of the observed sample")?;
        info!(
            statistic = observed.statistic,
            used = observed.used,
            excluded = observed.excluded,
            "observed A²"
        );

        let pb = if self.show_progress {
            ProgressBar::new(self.config.iterations as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(format!("calibrating ({})", self.config.method));

        let mut rng = StdRng::seed_from_u64(input.seed);
        let null = sample_null_distribution_with_progress(
            &input.null_cdf,
            input.sample.len(),
            &self.config,
            &mut rng,
            |n| pb.inc(n),
        )
        .context("calibration failed")?;
        pb.finish_and_clear();

        let significance = assess_significance(&null, &observed)?;
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            p_value = significance.p_value,
            sigma = %significance.sigma_level(),
            duration_ms,
            "analysis finished"
        );

        Ok(AnalysisOutcome {
            source: input.source,
            null_cdf: input.null_cdf,
            observed,
            null,
            significance,
            seed: input.seed,
            config: self.config.clone(),
            duration_ms,
        })
    }
}
