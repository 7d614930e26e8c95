//! Summary Statistics
//!
//! Describes the shape of a calibrated A² null distribution for reports.

use crate::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

/// Summary of a null distribution
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median (linear interpolation)
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

/// Compute summary statistics over `samples`
pub fn compute_summary(samples: &[f64]) -> DistributionSummary {
    if samples.is_empty() {
        return DistributionSummary::default();
    }

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    DistributionSummary {
        count: n,
        mean,
        median: compute_percentile(samples, 50.0),
        std_dev,
        min,
        max,
    }
}

impl DistributionSummary {
    /// Standard error of the mean
    pub fn standard_error(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.std_dev / (self.count as f64).sqrt()
        }
    }
}
