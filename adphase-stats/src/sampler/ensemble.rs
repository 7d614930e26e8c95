//! Affine-invariant ensemble sampler (Goodman & Weare stretch move)
//!
//! One walker per sample element, one dimension. Each step shuffles the
//! walkers into two halves and updates each half against the other:
//!
//! ```text
//! q = c - z (c - x),   z ~ g(z) ∝ 1/√z on [1/a, a]
//! accept if ln u < ln p(q) - ln p(x)
//! ```
//!
//! In one dimension the (d - 1) ln z volume term vanishes. The target
//! density is dF/dx, taken by central differences of the CDF.

use super::inverse::draw_one;
use super::{CalibrationConfig, CalibrationError};
use crate::distribution::CumulativeDistribution;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::debug;

/// Largest central-difference step for the density
const DERIVATIVE_STEP: f64 = 1e-4;

/// Half-ensembles smaller than this are evaluated inline
const PARALLEL_WALKER_THRESHOLD: usize = 64;

/// Minimum ensemble size: each half needs a complementary walker
const MIN_WALKERS: usize = 2;

/// Recorded ensemble states plus the number of draws replaced afterwards
pub(super) struct EnsembleOutcome {
    pub samples: Vec<Vec<f64>>,
    pub replaced: usize,
}

/// One walker's pending stretch move, with all its randomness drawn
struct Proposal {
    walker: usize,
    candidate: f64,
    log_u: f64,
}

/// ln(dF/dx) at `x`, or -∞ where the density is zero or undefined
///
/// The step shrinks near the edges so the difference never leaves [0, 1].
pub(crate) fn log_density<D>(dist: &D, x: f64) -> f64
where
    D: CumulativeDistribution + ?Sized,
{
    if !(x > 0.0 && x < 1.0) {
        return f64::NEG_INFINITY;
    }

    let h = DERIVATIVE_STEP.min((1.0 - x) / 3.0).min(x / 3.0);
    let (Ok(upper), Ok(lower)) = (dist.cdf(x + h), dist.cdf(x - h)) else {
        return f64::NEG_INFINITY;
    };

    let lp = ((upper - lower) / (2.0 * h)).ln();
    if lp.is_nan() { f64::NEG_INFINITY } else { lp }
}

fn log_densities<D>(dist: &D, points: &[f64], parallel: bool) -> Vec<f64>
where
    D: CumulativeDistribution + Sync + ?Sized,
{
    if parallel && points.len() >= PARALLEL_WALKER_THRESHOLD {
        points.par_iter().map(|&x| log_density(dist, x)).collect()
    } else {
        points.iter().map(|&x| log_density(dist, x)).collect()
    }
}

/// Run the ensemble for `config.burn_in + config.iterations` steps
///
/// The state after each recorded step is one synthetic sample of `walkers`
/// values. Draws sitting at a non-finite log-density are replaced afterwards
/// by inverse-transform draws, so exactly `config.iterations` samples come back.
pub(super) fn run_ensemble<D, R, P>(
    dist: &D,
    walkers: usize,
    config: &CalibrationConfig,
    rng: &mut R,
    progress: &P,
) -> Result<EnsembleOutcome, CalibrationError>
where
    D: CumulativeDistribution + Sync + ?Sized,
    R: Rng + ?Sized,
    P: Fn(u64) + Sync,
{
    if walkers < MIN_WALKERS {
        return Err(CalibrationError::InsufficientWalkers {
            got: walkers,
            min: MIN_WALKERS,
        });
    }

    let a = config.stretch_scale;
    let mut positions: Vec<f64> = (0..walkers).map(|_| rng.gen_range(0.0..1.0)).collect();
    let mut log_probs = log_densities(dist, &positions, config.parallel);

    let mut order: Vec<usize> = (0..walkers).collect();
    let mut samples = Vec::with_capacity(config.iterations);
    let mut invalid: Vec<(usize, usize)> = Vec::new();
    let mut accepted: u64 = 0;

    for step in 0..config.burn_in + config.iterations {
        order.shuffle(rng);
        let (first, second) = order.split_at(walkers / 2);

        for (active, complement) in [(first, second), (second, first)] {
            let proposals: Vec<Proposal> = active
                .iter()
                .map(|&walker| {
                    let z = ((a - 1.0) * rng.gen_range(0.0..1.0) + 1.0).powi(2) / a;
                    let partner = positions[complement[rng.gen_range(0..complement.len())]];
                    let candidate = partner - z * (partner - positions[walker]);
                    let log_u = rng.gen_range(0.0f64..1.0).ln();
                    Proposal {
                        walker,
                        candidate,
                        log_u,
                    }
                })
                .collect();

            let candidates: Vec<f64> = proposals.iter().map(|p| p.candidate).collect();
            let candidate_lp = log_densities(dist, &candidates, config.parallel);

            for (proposal, lp) in proposals.iter().zip(candidate_lp) {
                // NaN (both -∞) compares false and rejects
                if proposal.log_u < lp - log_probs[proposal.walker] {
                    positions[proposal.walker] = proposal.candidate;
                    log_probs[proposal.walker] = lp;
                    accepted += 1;
                }
            }
        }

        if step >= config.burn_in {
            let row = samples.len();
            invalid.extend(
                (0..walkers)
                    .filter(|&k| !positions[k].is_finite() || !log_probs[k].is_finite())
                    .map(|k| (row, k)),
            );
            samples.push(positions.clone());
            progress(1);
        }
    }

    let total_moves = ((config.burn_in + config.iterations) * walkers) as f64;
    debug!(
        walkers,
        steps = config.burn_in + config.iterations,
        acceptance = accepted as f64 / total_moves,
        invalid = invalid.len(),
        "ensemble sampler finished"
    );

    let replaced = invalid.len();
    for (row, walker) in invalid {
        samples[row][walker] = draw_one(dist, rng)?;
    }

    Ok(EnsembleOutcome { samples, replaced })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null_cdf::{NullCdf, NullModelError};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(iterations: usize) -> CalibrationConfig {
        CalibrationConfig {
            iterations,
            parallel: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_log_density_matches_slope() {
        let f = NullCdf::new(&[0.2, 0.5, 0.8], &[0.3, 0.6, 0.9]).unwrap();
        assert!((log_density(&f, 0.1) - 1.5_f64.ln()).abs() < 1e-9);
        assert!(log_density(&f, 0.65).abs() < 1e-9);
        assert!((log_density(&f, 0.9) - 0.5_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_log_density_outside_support() {
        let f = NullCdf::uniform();
        assert_eq!(log_density(&f, 0.0), f64::NEG_INFINITY);
        assert_eq!(log_density(&f, 1.0), f64::NEG_INFINITY);
        assert_eq!(log_density(&f, -0.3), f64::NEG_INFINITY);
        assert_eq!(log_density(&f, f64::NAN), f64::NEG_INFINITY);
    }

    #[test]
    fn test_log_density_near_edges_is_finite() {
        let f = NullCdf::uniform();
        assert!(log_density(&f, 1e-9).abs() < 1e-5);
        assert!(log_density(&f, 1.0 - 1e-9).abs() < 1e-5);
    }

    #[test]
    fn test_log_density_flat_region() {
        let f = NullCdf::new(&[0.4, 0.6], &[0.5, 0.5]).unwrap();
        assert_eq!(log_density(&f, 0.5), f64::NEG_INFINITY);
    }

    #[test]
    fn test_walkers_stay_in_support() {
        let f = NullCdf::new(&[0.2, 0.5, 0.8], &[0.3, 0.6, 0.9]).unwrap();
        let outcome =
            run_ensemble(&f, 12, &config(2_000), &mut StdRng::seed_from_u64(17), &|_| {}).unwrap();
        assert_eq!(outcome.samples.len(), 2_000);
        assert!(
            outcome
                .samples
                .iter()
                .flatten()
                .all(|&x| x > 0.0 && x < 1.0)
        );
    }

    #[test]
    fn test_burn_in_not_recorded() {
        let f = NullCdf::uniform();
        let cfg = CalibrationConfig {
            burn_in: 100,
            ..config(50)
        };
        let outcome = run_ensemble(&f, 4, &cfg, &mut StdRng::seed_from_u64(2), &|_| {}).unwrap();
        assert_eq!(outcome.samples.len(), 50);
    }

    #[test]
    fn test_stationary_distribution() {
        // Zero density on (0, 0.5): walkers must end up in the upper half
        let f = NullCdf::new(&[0.0, 0.5], &[0.0, 0.0]).unwrap();
        let cfg = CalibrationConfig {
            burn_in: 200,
            ..config(1_000)
        };
        let outcome = run_ensemble(&f, 10, &cfg, &mut StdRng::seed_from_u64(23), &|_| {}).unwrap();
        assert_eq!(outcome.samples.len(), 1_000);
        // Central differences see a little density just below the knot
        assert!(outcome.samples.iter().flatten().all(|&x| x > 0.5 - DERIVATIVE_STEP));
    }

    /// A distribution whose CDF never evaluates but whose inverse does
    struct Unstable;

    impl CumulativeDistribution for Unstable {
        fn cdf(&self, _x: f64) -> Result<f64, NullModelError> {
            Err(NullModelError::OutOfSupport(f64::NAN))
        }

        fn quantile(&self, p: f64) -> Result<f64, NullModelError> {
            Ok(p)
        }
    }

    #[test]
    fn test_non_finite_draws_are_replaced() {
        let outcome =
            run_ensemble(&Unstable, 6, &config(30), &mut StdRng::seed_from_u64(4), &|_| {})
                .unwrap();

        // Every draw has -∞ log-density, so every draw is a fallback draw
        assert_eq!(outcome.samples.len(), 30);
        assert_eq!(outcome.replaced, 30 * 6);
        assert!(
            outcome
                .samples
                .iter()
                .flatten()
                .all(|&x| x > 0.0 && x < 1.0)
        );
    }
}
