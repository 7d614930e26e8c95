//! Anderson-Darling Statistic
//!
//! Computes A² of a sample against an arbitrary continuous null CDF.
//!
//! Sample points whose CDF value is exactly 0 or 1 make the logarithmic terms
//! undefined. They are dropped and the statistic is computed over the N'
//! surviving points, with N' used both as the sum's normalisation and as the
//! leading term. The null distribution from [`crate::sample_null_distribution`]
//! goes through the same code path, so calibration stays consistent.

use crate::distribution::CumulativeDistribution;
use crate::null_cdf::NullModelError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while evaluating A²
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatisticError {
    #[error("Cannot compute A² of an empty sample")]
    EmptySample,

    #[error("Sample value at index {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("All {excluded} sample points sit on the boundary of the null support")]
    NoInteriorPoints { excluded: usize },

    #[error(transparent)]
    NullModel(#[from] NullModelError),
}

/// A² of one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdStatistic {
    /// The A² value
    pub statistic: f64,
    /// Number of sample points that entered the sum (N')
    pub used: usize,
    /// Number of points dropped because F(x) was 0 or 1
    pub excluded: usize,
}

impl AdStatistic {
    /// Size of the sample as supplied, before boundary exclusion
    pub fn sample_size(&self) -> usize {
        self.used + self.excluded
    }
}

/// Anderson-Darling A² of `sample` against the null distribution `dist`
///
/// Larger values indicate stronger deviation from the null. The statistic can
/// come out slightly negative for very small, unusually regular samples.
pub fn anderson_darling<D>(sample: &[f64], dist: &D) -> Result<AdStatistic, StatisticError>
where
    D: CumulativeDistribution + ?Sized,
{
    if sample.is_empty() {
        return Err(StatisticError::EmptySample);
    }
    if let Some(index) = sample.iter().position(|x| !x.is_finite()) {
        return Err(StatisticError::NonFiniteSample { index });
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut z = Vec::with_capacity(sorted.len());
    for &y in &sorted {
        let p = dist.cdf(y)?;
        if p > 0.0 && p < 1.0 {
            z.push(p);
        }
    }

    let excluded = sorted.len() - z.len();
    if z.is_empty() {
        return Err(StatisticError::NoInteriorPoints { excluded });
    }
    if excluded > 0 {
        debug!(
            excluded,
            used = z.len(),
            "dropped boundary points from A² sum"
        );
    }

    let n = z.len();
    let n_f = n as f64;
    let s: f64 = (0..n)
        .map(|i| {
            let weight = (2 * i + 1) as f64 / n_f;
            weight * (z[i].ln() + (1.0 - z[n - 1 - i]).ln())
        })
        .sum();

    Ok(AdStatistic {
        statistic: -n_f - s,
        used: n,
        excluded,
    })
}
