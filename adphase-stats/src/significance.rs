//! Significance Assessment
//!
//! Locates an observed A² within its calibrated null distribution.
//!
//! The test is two-sided: values below the null mean are reflected to
//! `mean + (mean - value)` before thresholds and ranks are taken, and the
//! observed statistic is folded the same way. An observed statistic close to
//! the mean therefore gets a large p-value, and both unusually poor and
//! unusually good agreement with the null count as extreme.

use crate::anderson::AdStatistic;
use crate::percentiles::{SigmaThresholds, compute_sigma_thresholds, exceedance_fraction};
use crate::sampler::{CalibrationError, NullDistribution};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gaussian-equivalent significance bucket of an observed statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmaLevel {
    /// Below the 1σ threshold
    BelowOneSigma,
    /// At or beyond 1σ
    OneSigma,
    /// At or beyond 2σ
    TwoSigma,
    /// At or beyond 3σ
    ThreeSigma,
}

impl std::fmt::Display for SigmaLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigmaLevel::BelowOneSigma => write!(f, "<1σ"),
            SigmaLevel::OneSigma => write!(f, "≥1σ"),
            SigmaLevel::TwoSigma => write!(f, "≥2σ"),
            SigmaLevel::ThreeSigma => write!(f, "≥3σ"),
        }
    }
}

/// Where an observed A² falls in its null distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    /// Observed A²
    pub statistic: f64,
    /// Observed A² after folding around the null mean
    pub folded_statistic: f64,
    /// Fraction of the folded null distribution at or above the folded statistic
    pub p_value: f64,
    /// Mean of the (unfolded) null distribution
    pub null_mean: f64,
    /// 1σ/2σ/3σ thresholds of the folded null distribution
    pub thresholds: SigmaThresholds,
    /// Sample size shared by the observation and the calibration
    pub sample_size: usize,
    /// Number of values in the null distribution
    pub iterations: usize,
}

impl SignificanceResult {
    /// Gaussian-equivalent bucket of the folded statistic
    pub fn sigma_level(&self) -> SigmaLevel {
        let x = self.folded_statistic;
        if x >= self.thresholds.three_sigma {
            SigmaLevel::ThreeSigma
        } else if x >= self.thresholds.two_sigma {
            SigmaLevel::TwoSigma
        } else if x >= self.thresholds.one_sigma {
            SigmaLevel::OneSigma
        } else {
            SigmaLevel::BelowOneSigma
        }
    }

    /// Whether the null is rejected at significance level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Reflect values below the mean to the other side of it
///
/// Returns the mean of the input together with the folded values, in input order.
pub fn fold_around_mean(values: &[f64]) -> (f64, Vec<f64>) {
    if values.is_empty() {
        return (0.0, Vec::new());
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let folded = values.iter().map(|&v| fold(v, mean)).collect();
    (mean, folded)
}

fn fold(value: f64, mean: f64) -> f64 {
    if value < mean { mean + (mean - value) } else { value }
}

/// Assess an observed statistic against its calibrated null distribution
///
/// Fails with [`CalibrationError::SampleSizeMismatch`] when the null was
/// calibrated for a different sample size than the observation.
pub fn assess_significance(
    null: &NullDistribution,
    observed: &AdStatistic,
) -> Result<SignificanceResult, CalibrationError> {
    let observed_size = observed.sample_size();
    if observed_size != null.sample_size {
        return Err(CalibrationError::SampleSizeMismatch {
            calibrated: null.sample_size,
            observed: observed_size,
        });
    }

    let (null_mean, folded) = fold_around_mean(&null.values);
    let thresholds =
        compute_sigma_thresholds(&folded).ok_or(CalibrationError::EmptyDistribution)?;

    let folded_statistic = fold(observed.statistic, null_mean);
    let p_value = exceedance_fraction(&folded, folded_statistic);

    debug!(
        statistic = observed.statistic,
        folded_statistic, p_value, null_mean, "located observed A² in null distribution"
    );

    Ok(SignificanceResult {
        statistic: observed.statistic,
        folded_statistic,
        p_value,
        null_mean,
        thresholds,
        sample_size: observed_size,
        iterations: null.values.len(),
    })
}
