//! Continuous Null Hypotheses
//!
//! The AD evaluator and the calibration samplers only need two things from a
//! null hypothesis: its cumulative probability and its inverse.

use crate::null_cdf::NullModelError;

/// Bisection steps for the default quantile; 2^-64 is below f64 resolution on [0, 1]
const BISECTION_STEPS: usize = 64;

/// A continuous cumulative distribution over phase, defined on [0, 1]
pub trait CumulativeDistribution {
    /// Cumulative probability at `x`
    fn cdf(&self, x: f64) -> Result<f64, NullModelError>;

    /// Smallest phase whose cumulative probability reaches `p`
    ///
    /// The default implementation bisects [0, 1]. Distributions with a
    /// closed-form inverse should override it.
    fn quantile(&self, p: f64) -> Result<f64, NullModelError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(NullModelError::InvalidProbability(p));
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if self.cdf(mid)? < p {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(hi)
    }
}

impl<D: CumulativeDistribution + ?Sized> CumulativeDistribution for &D {
    fn cdf(&self, x: f64) -> Result<f64, NullModelError> {
        (**self).cdf(x)
    }

    fn quantile(&self, p: f64) -> Result<f64, NullModelError> {
        (**self).quantile(p)
    }
}
