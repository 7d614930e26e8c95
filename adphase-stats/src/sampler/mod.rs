//! Monte Carlo Calibration
//!
//! Builds the null sampling distribution of A² for a fixed sample size by
//! drawing many synthetic samples from the null CDF and evaluating each one.
//!
//! ## Methods
//!
//! - [`SamplingMethod::InverseTransform`] draws each value as F⁻¹(u) with
//!   u ~ Uniform(0, 1). Exact and cheap.
//! - [`SamplingMethod::EnsembleMcmc`] runs an affine-invariant ensemble sampler
//!   with one walker per sample element over the density dF/dx; the ensemble
//!   state after each step is one synthetic sample. This reproduces the
//!   calibration used for the published results.
//!
//! All randomness comes from the caller's generator. Work split across rayon
//! threads never consumes randomness, so a seed gives the same distribution
//! with or without `parallel`.

mod ensemble;
mod inverse;

use crate::DEFAULT_CALIBRATION_ITERATIONS;
use crate::anderson::{StatisticError, anderson_darling};
use crate::distribution::CumulativeDistribution;
use crate::null_cdf::NullModelError;
use crate::summary::{DistributionSummary, compute_summary};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// How synthetic samples are drawn from the null CDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingMethod {
    /// Invert the CDF at uniform random points (default)
    #[default]
    #[serde(rename = "inverse", alias = "inverse-transform")]
    InverseTransform,
    /// Affine-invariant ensemble MCMC over the density dF/dx
    #[serde(rename = "mcmc", alias = "ensemble-mcmc")]
    EnsembleMcmc,
}

impl std::fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingMethod::InverseTransform => write!(f, "inverse"),
            SamplingMethod::EnsembleMcmc => write!(f, "mcmc"),
        }
    }
}

impl std::str::FromStr for SamplingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inverse" | "inverse-transform" => Ok(SamplingMethod::InverseTransform),
            "mcmc" | "ensemble-mcmc" | "ensemble" => Ok(SamplingMethod::EnsembleMcmc),
            other => Err(format!("Unknown sampling method: {}", other)),
        }
    }
}

/// Calibration configuration
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Number of synthetic samples, i.e. A² values returned (default: 10,000)
    pub iterations: usize,
    /// Sampling method
    pub method: SamplingMethod,
    /// Whether to use parallel computation
    pub parallel: bool,
    /// Stretch-move scale parameter `a` of the ensemble sampler (default: 2.0)
    pub stretch_scale: f64,
    /// Ensemble steps discarded before recording (default: 0)
    pub burn_in: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_CALIBRATION_ITERATIONS,
            method: SamplingMethod::default(),
            parallel: true,
            stretch_scale: 2.0,
            burn_in: 0,
        }
    }
}

/// Errors that can occur during calibration or significance assessment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("Invalid calibration config: {0}")]
    InvalidConfig(String),

    #[error("Not enough walkers: got {got}, need at least {min}")]
    InsufficientWalkers { got: usize, min: usize },

    #[error("Sample size mismatch: null distribution calibrated for n = {calibrated}, observed n = {observed}")]
    SampleSizeMismatch { calibrated: usize, observed: usize },

    #[error("Null distribution is empty")]
    EmptyDistribution,

    #[error(transparent)]
    Statistic(#[from] StatisticError),

    #[error(transparent)]
    NullModel(#[from] NullModelError),
}

/// Empirical null distribution of A² for a fixed sample size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullDistribution {
    /// Sample size the distribution was calibrated for
    pub sample_size: usize,
    /// Method used to draw the synthetic samples
    pub method: SamplingMethod,
    /// A² values in draw order
    pub values: Vec<f64>,
    /// Individual draws replaced by fallback inverse-transform sampling
    pub replaced_draws: usize,
}

impl NullDistribution {
    /// Number of A² values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the distribution holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean, median, spread and range of the A² values
    pub fn summary(&self) -> DistributionSummary {
        compute_summary(&self.values)
    }
}

/// Calibrate the A² null distribution for samples of size `sample_size`
pub fn sample_null_distribution<D, R>(
    dist: &D,
    sample_size: usize,
    config: &CalibrationConfig,
    rng: &mut R,
) -> Result<NullDistribution, CalibrationError>
where
    D: CumulativeDistribution + Sync + ?Sized,
    R: Rng + ?Sized,
{
    sample_null_distribution_with_progress(dist, sample_size, config, rng, |_| {})
}

/// Calibrate the A² null distribution, reporting progress
///
/// `progress` is called with the number of newly completed synthetic samples;
/// the calls add up to `config.iterations`. It may be called from rayon
/// worker threads.
pub fn sample_null_distribution_with_progress<D, R, P>(
    dist: &D,
    sample_size: usize,
    config: &CalibrationConfig,
    rng: &mut R,
    progress: P,
) -> Result<NullDistribution, CalibrationError>
where
    D: CumulativeDistribution + Sync + ?Sized,
    R: Rng + ?Sized,
    P: Fn(u64) + Sync,
{
    validate(sample_size, config)?;

    debug!(
        method = %config.method,
        sample_size,
        iterations = config.iterations,
        parallel = config.parallel,
        "calibrating A² null distribution"
    );

    let (samples, replaced_draws) = match config.method {
        SamplingMethod::InverseTransform => {
            let samples = inverse::draw_samples(dist, sample_size, config, rng, &progress)?;
            (samples, 0)
        }
        SamplingMethod::EnsembleMcmc => {
            let outcome = ensemble::run_ensemble(dist, sample_size, config, rng, &progress)?;
            (outcome.samples, outcome.replaced)
        }
    };

    let values: Vec<f64> = if config.parallel {
        samples
            .par_iter()
            .map(|s| anderson_darling(s, dist).map(|a| a.statistic))
            .collect::<Result<_, _>>()?
    } else {
        samples
            .iter()
            .map(|s| anderson_darling(s, dist).map(|a| a.statistic))
            .collect::<Result<_, _>>()?
    };

    if values.len() != config.iterations {
        return Err(CalibrationError::InvalidConfig(format!(
            "calibration produced {} values, expected {}",
            values.len(),
            config.iterations
        )));
    }

    if replaced_draws > 0 {
        info!(replaced_draws, "replaced non-finite ensemble draws with direct samples");
    }

    Ok(NullDistribution {
        sample_size,
        method: config.method,
        values,
        replaced_draws,
    })
}

fn validate(sample_size: usize, config: &CalibrationConfig) -> Result<(), CalibrationError> {
    if sample_size == 0 {
        return Err(CalibrationError::InvalidConfig(
            "sample size must be at least 1".to_string(),
        ));
    }
    if config.iterations == 0 {
        return Err(CalibrationError::InvalidConfig(
            "iterations must be at least 1".to_string(),
        ));
    }
    if !config.stretch_scale.is_finite() || config.stretch_scale <= 1.0 {
        return Err(CalibrationError::InvalidConfig(format!(
            "stretch scale must be greater than 1, got {}",
            config.stretch_scale
        )));
    }
    Ok(())
}
