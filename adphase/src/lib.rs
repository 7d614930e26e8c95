#![warn(missing_docs)]
//! # adphase
//!
//! Anderson-Darling goodness-of-fit tests of event phases against an arbitrary
//! empirical null distribution, calibrated by Monte Carlo.
//!
//! - **Null models**: piecewise-linear CDFs from cumulative control points or
//!   from how a reference process covers the phase interval
//! - **A² statistic**: exact boundary handling, points with F(x) at 0 or 1 are dropped
//! - **Calibration**: inverse-transform sampling or an affine-invariant ensemble
//!   sampler, parallel over rayon and reproducible from a seed
//! - **Significance**: two-sided p-values and 1σ/2σ/3σ thresholds from the
//!   folded null distribution
//!
//! ## Quick Start
//!
//! ```ignore
//! use adphase::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let null = NullCdf::new(&[0.2, 0.5, 0.8], &[0.3, 0.6, 0.9])?;
//! let sample = [0.05, 0.12, 0.33, 0.41, 0.58, 0.77, 0.91];
//!
//! let observed = anderson_darling(&sample, &null)?;
//! let calibrated = sample_null_distribution(
//!     &null,
//!     sample.len(),
//!     &CalibrationConfig::default(),
//!     &mut StdRng::seed_from_u64(42),
//! )?;
//! let result = assess_significance(&calibrated, &observed)?;
//! println!("A² = {:.3}, p = {:.4}", result.statistic, result.p_value);
//! ```

// Re-export the statistics engine
pub use adphase_stats::{
    AdStatistic, CalibrationConfig, CalibrationError, CumulativeDistribution,
    DEFAULT_CALIBRATION_ITERATIONS, DistributionSummary, NullCdf, NullDistribution,
    NullModelError, SIGMA_TAIL_PROBABILITIES, SUPPORT_TOLERANCE, SamplingMethod, SigmaLevel,
    SigmaThresholds, SignificanceResult, StatisticError, anderson_darling, assess_significance,
    compute_percentile, compute_sigma_thresholds, compute_summary, exceedance_fraction,
    fold_around_mean, fold_phases, sample_null_distribution,
    sample_null_distribution_with_progress,
};

// Re-export report types
pub use adphase_report::{
    AnalysisReport, NullModelSource, OutputFormat, generate_csv_report, generate_json_report,
    parse_json_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AdStatistic, CalibrationConfig, CumulativeDistribution, NullCdf, NullDistribution,
        SamplingMethod, SignificanceResult, anderson_darling, assess_significance, fold_phases,
        sample_null_distribution,
    };
}

/// Run the adphase CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     adphase::run()
/// }
/// ```
pub use adphase_cli::run;
