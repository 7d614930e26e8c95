//! Phase Folding

use crate::null_cdf::NullModelError;

/// Fold time stamps on a period into phases in [0, 1)
///
/// Uses the Euclidean remainder, so times before the reference epoch fold
/// into [0, 1) as well. Non-finite time stamps are dropped.
pub fn fold_phases(times: &[f64], period: f64) -> Result<Vec<f64>, NullModelError> {
    if !period.is_finite() || period <= 0.0 {
        return Err(NullModelError::InvalidPeriod(period));
    }

    Ok(times
        .iter()
        .filter(|t| t.is_finite())
        .map(|&t| {
            let phase = t.rem_euclid(period) / period;
            // rem_euclid can round up to `period` for tiny negative inputs
            if phase >= 1.0 { 0.0 } else { phase }
        })
        .collect())
}
