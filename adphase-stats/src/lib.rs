#![warn(missing_docs)]
//! adphase Statistical Engine
//!
//! Anderson-Darling goodness-of-fit testing against an arbitrary empirical null
//! distribution over phase, including:
//! - Piecewise-linear null CDFs built from cumulative control points or reference coverage
//! - The A² statistic with boundary exclusion
//! - Monte Carlo calibration of the A² null distribution (inverse transform or ensemble MCMC)
//! - Two-sided p-values and 1σ/2σ/3σ thresholds from the folded null distribution

mod anderson;
mod distribution;
mod null_cdf;
mod percentiles;
mod phases;
mod sampler;
mod significance;
mod summary;

pub use anderson::{AdStatistic, StatisticError, anderson_darling};
pub use distribution::CumulativeDistribution;
pub use null_cdf::{NullCdf, NullModelError};
pub use percentiles::{
    SigmaThresholds, compute_percentile, compute_sigma_thresholds, exceedance_fraction,
};
pub use phases::fold_phases;
pub use sampler::{
    CalibrationConfig, CalibrationError, NullDistribution, SamplingMethod,
    sample_null_distribution, sample_null_distribution_with_progress,
};
pub use significance::{SigmaLevel, SignificanceResult, assess_significance, fold_around_mean};
pub use summary::{DistributionSummary, compute_summary};

/// Default number of Monte Carlo samples in a calibration run
pub const DEFAULT_CALIBRATION_ITERATIONS: usize = 10_000;

/// Two-sided tail probabilities of 1σ, 2σ and 3σ under a Gaussian
pub const SIGMA_TAIL_PROBABILITIES: [f64; 3] = [0.3173, 0.0455, 0.0027];

/// Tolerance for rounding-induced evaluations just outside [0, 1]
pub const SUPPORT_TOLERANCE: f64 = 1e-9;
