//! Inverse-transform sampling from the null CDF

use super::{CalibrationConfig, CalibrationError};
use crate::distribution::CumulativeDistribution;
use crate::null_cdf::NullModelError;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

/// One value drawn from `dist` as F⁻¹(u), u uniform on the open interval (0, 1)
pub(crate) fn draw_one<D, R>(dist: &D, rng: &mut R) -> Result<f64, NullModelError>
where
    D: CumulativeDistribution + ?Sized,
    R: Rng + ?Sized,
{
    let u: f64 = rng.sample(Open01);
    dist.quantile(u)
}

/// Draw `config.iterations` independent samples of `sample_size` values
///
/// Each sample gets its own generator seeded from `rng`, drawn up front in
/// order, so parallel and serial runs produce the same samples.
pub(super) fn draw_samples<D, R, P>(
    dist: &D,
    sample_size: usize,
    config: &CalibrationConfig,
    rng: &mut R,
    progress: &P,
) -> Result<Vec<Vec<f64>>, CalibrationError>
where
    D: CumulativeDistribution + Sync + ?Sized,
    R: Rng + ?Sized,
    P: Fn(u64) + Sync,
{
    let seeds: Vec<u64> = (0..config.iterations).map(|_| rng.next_u64()).collect();

    let draw_sample = |seed: u64| -> Result<Vec<f64>, NullModelError> {
        let mut sample_rng = StdRng::seed_from_u64(seed);
        let sample = (0..sample_size)
            .map(|_| draw_one(dist, &mut sample_rng))
            .collect::<Result<Vec<f64>, _>>()?;
        progress(1);
        Ok(sample)
    };

    let samples = if config.parallel {
        seeds
            .into_par_iter()
            .map(draw_sample)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        seeds
            .into_iter()
            .map(draw_sample)
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(samples)
}
