//! Percentile Computation
//!
//! Order-statistic lookups on a null distribution of A²: significance
//! thresholds and exceedance fractions.

use crate::SIGMA_TAIL_PROBABILITIES;
use serde::{Deserialize, Serialize};

/// A² values that mark the 1σ, 2σ and 3σ two-sided tails of a null distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmaThresholds {
    /// Exceeded by 31.73% of the distribution
    pub one_sigma: f64,
    /// Exceeded by 4.55% of the distribution
    pub two_sigma: f64,
    /// Exceeded by 0.27% of the distribution
    pub three_sigma: f64,
}

/// Compute a single percentile from samples
///
/// Uses linear interpolation between nearest ranks.
///
/// # Examples
///
/// ```
/// # use adphase_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// assert_eq!(compute_percentile(&samples, 75.0), 4.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_of_sorted(&sorted, percentile)
}

/// Percentile of an already sorted slice
fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let p = (percentile / 100.0).clamp(0.0, 1.0);

    // Linear interpolation between nearest ranks
    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// Compute the 1σ/2σ/3σ thresholds of a (folded) null distribution
///
/// Returns `None` for an empty distribution.
pub fn compute_sigma_thresholds(samples: &[f64]) -> Option<SigmaThresholds> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let [one, two, three] =
        SIGMA_TAIL_PROBABILITIES.map(|q| percentile_of_sorted(&sorted, 100.0 * (1.0 - q)));

    Some(SigmaThresholds {
        one_sigma: one,
        two_sigma: two,
        three_sigma: three,
    })
}

/// Fraction of samples greater than or equal to `value`
pub fn exceedance_fraction(samples: &[f64], value: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let count = samples.iter().filter(|&&s| s >= value).count();
    count as f64 / samples.len() as f64
}
