//! End-to-end tests of the significance pipeline
//!
//! Calibrations here use fixed seeds; Monte Carlo tolerances are several
//! standard errors wide for the iteration counts used.

use adphase::prelude::*;
use adphase::{AdStatistic, CalibrationError, SigmaLevel, compute_sigma_thresholds, fold_around_mean};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Flare phases of HIP 67522 b used for the published calibration figure
const PUBLISHED_PHASES: [f64; 12] = [
    0.61256542337174,
    0.029301729581047,
    0.017527257576216,
    0.811732598451724,
    0.057241154463297,
    0.729890495361688,
    0.040306751646131,
    0.113071753157355,
    0.150647085333129,
    0.200293264178819,
    0.948623252939387,
    0.044963590199154,
];

fn scenario_cdf() -> NullCdf {
    NullCdf::new(&[0.0, 0.2, 0.5, 0.8, 1.0], &[0.0, 0.3, 0.6, 0.9, 1.0]).unwrap()
}

fn calibrate(
    null: &NullCdf,
    sample_size: usize,
    method: SamplingMethod,
    iterations: usize,
    seed: u64,
) -> NullDistribution {
    let config = CalibrationConfig {
        iterations,
        method,
        ..Default::default()
    };
    sample_null_distribution(null, sample_size, &config, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn observed(statistic: f64, sample_size: usize) -> AdStatistic {
    AdStatistic {
        statistic,
        used: sample_size,
        excluded: 0,
    }
}

#[test]
fn test_uniform_sample_sits_mid_distribution() {
    let f = scenario_cdf();
    let sample: Vec<f64> = (1..=12).map(|i| (i as f64 - 0.5) / 12.0).collect();

    let stat = anderson_darling(&sample, &f).unwrap();
    assert_eq!(stat.used, 12);

    let null = calibrate(&f, 12, SamplingMethod::InverseTransform, 10_000, 7);
    let result = assess_significance(&null, &stat).unwrap();
    assert!(
        result.p_value > 0.3 && result.p_value < 0.8,
        "p = {}",
        result.p_value
    );
    assert_eq!(result.sigma_level(), SigmaLevel::BelowOneSigma);
}

#[test]
fn test_published_anchor_inverse_transform() {
    let null = calibrate(
        &NullCdf::uniform(),
        PUBLISHED_PHASES.len(),
        SamplingMethod::InverseTransform,
        10_000,
        2024,
    );
    assert_eq!(null.len(), 10_000);

    let result = assess_significance(&null, &observed(4.5, 12)).unwrap();
    let t = result.thresholds;
    assert!(t.one_sigma < t.two_sigma && t.two_sigma < t.three_sigma);
    assert!(t.two_sigma < 4.5 && 4.5 < t.three_sigma);
    // 0.0056 ± 3 binomial standard errors at N = 10,000
    assert!(
        result.p_value > 0.0035 && result.p_value < 0.0080,
        "p = {}",
        result.p_value
    );
    assert_eq!(result.sigma_level(), SigmaLevel::TwoSigma);
}

#[test]
fn test_published_anchor_ensemble_mcmc() {
    let null = calibrate(
        &NullCdf::uniform(),
        PUBLISHED_PHASES.len(),
        SamplingMethod::EnsembleMcmc,
        10_000,
        2024,
    );
    assert_eq!(null.len(), 10_000);

    let result = assess_significance(&null, &observed(4.5, 12)).unwrap();
    let t = result.thresholds;
    assert!(t.one_sigma < t.two_sigma && t.two_sigma < t.three_sigma);
    // Wider than the inverse band: consecutive ensemble draws are correlated
    assert!(
        result.p_value > 0.002 && result.p_value < 0.010,
        "p = {}",
        result.p_value
    );
}

#[test]
fn test_published_anchor_large_calibration() {
    let null = calibrate(
        &NullCdf::uniform(),
        PUBLISHED_PHASES.len(),
        SamplingMethod::InverseTransform,
        100_000,
        67522,
    );
    let result = assess_significance(&null, &observed(4.5, 12)).unwrap();
    assert!((result.p_value - 0.0056).abs() < 0.001, "p = {}", result.p_value);

    let null = calibrate(
        &NullCdf::uniform(),
        PUBLISHED_PHASES.len(),
        SamplingMethod::EnsembleMcmc,
        100_000,
        67522,
    );
    let result = assess_significance(&null, &observed(4.5, 12)).unwrap();
    assert!((result.p_value - 0.0056).abs() < 0.002, "p = {}", result.p_value);
}

#[test]
fn test_published_phases_are_clustered() {
    let stat = anderson_darling(&PUBLISHED_PHASES, &NullCdf::uniform()).unwrap();
    assert_eq!(stat.sample_size(), 12);

    let null = calibrate(&NullCdf::uniform(), 12, SamplingMethod::InverseTransform, 10_000, 99);
    let result = assess_significance(&null, &stat).unwrap();
    assert!(result.statistic > result.thresholds.two_sigma);
    assert!(result.p_value < 0.02, "p = {}", result.p_value);
}

#[test]
fn test_reference_coverage_null() {
    // A reference process covering the interval evenly gives back a near-uniform null
    let reference: Vec<f64> = (0..10_000).map(|i| (i as f64 + 0.5) / 10_000.0).collect();
    let f = NullCdf::from_reference_coverage(&PUBLISHED_PHASES, &reference).unwrap();

    for &p in &PUBLISHED_PHASES {
        assert!((f.evaluate(p).unwrap() - p).abs() < 1e-3);
    }

    let stat = anderson_darling(&PUBLISHED_PHASES, &f).unwrap();
    let uniform = anderson_darling(&PUBLISHED_PHASES, &NullCdf::uniform()).unwrap();
    assert!((stat.statistic - uniform.statistic).abs() < 0.05);
}

#[test]
fn test_folded_times_match_phases() {
    let period = 6.95;
    let times: Vec<f64> = PUBLISHED_PHASES
        .iter()
        .enumerate()
        .map(|(cycle, p)| (cycle as f64 + 190.0 + p) * period)
        .collect();
    let phases = fold_phases(&times, period).unwrap();

    for (folded, expected) in phases.iter().zip(PUBLISHED_PHASES) {
        assert!((folded - expected).abs() < 1e-9);
    }
}

#[test]
fn test_seeded_runs_are_identical() {
    let f = scenario_cdf();
    for method in [SamplingMethod::InverseTransform, SamplingMethod::EnsembleMcmc] {
        let a = calibrate(&f, 12, method, 1_000, 31);
        let b = calibrate(&f, 12, method, 1_000, 31);
        assert_eq!(a, b);
    }
}

#[test]
fn test_output_count_matches_iterations() {
    let f = scenario_cdf();
    for iterations in [1, 7, 250] {
        for method in [SamplingMethod::InverseTransform, SamplingMethod::EnsembleMcmc] {
            let null = calibrate(&f, 5, method, iterations, 0);
            assert_eq!(null.len(), iterations);
        }
    }
}

#[test]
fn test_thresholds_stable_across_seeds() {
    let f = scenario_cdf();
    let runs: Vec<_> = [1u64, 2, 3]
        .iter()
        .map(|&seed| {
            let null = calibrate(&f, 12, SamplingMethod::InverseTransform, 20_000, seed);
            let (mean, folded) = fold_around_mean(&null.values);
            (mean, compute_sigma_thresholds(&folded).unwrap())
        })
        .collect();

    for (mean, thresholds) in &runs[1..] {
        assert!((mean - runs[0].0).abs() < 0.05);
        assert!((thresholds.one_sigma - runs[0].1.one_sigma).abs() < 0.1);
        assert!((thresholds.two_sigma - runs[0].1.two_sigma).abs() < 0.25);
    }
}

#[test]
fn test_sample_size_must_match_calibration() {
    let null = calibrate(&NullCdf::uniform(), 12, SamplingMethod::InverseTransform, 100, 1);
    let stat = anderson_darling(&PUBLISHED_PHASES[..10], &NullCdf::uniform()).unwrap();
    assert!(matches!(
        assess_significance(&null, &stat),
        Err(CalibrationError::SampleSizeMismatch {
            calibrated: 12,
            observed: 10
        })
    ));
}

#[test]
fn test_boundary_points_excluded() {
    // Zero density below 0.25: a sample point there has F(x) = 0
    let f = NullCdf::new(&[0.25, 0.75], &[0.0, 1.0]).unwrap();
    let stat = anderson_darling(&[0.1, 0.4, 0.5, 0.6], &f).unwrap();
    assert_eq!(stat.used, 3);
    assert_eq!(stat.excluded, 1);
    assert!(stat.statistic.is_finite());
}

#[test]
fn test_json_report_round_trip() {
    let f = scenario_cdf();
    let sample = [0.05, 0.3, 0.45, 0.62, 0.85];
    let stat = anderson_darling(&sample, &f).unwrap();
    let null = calibrate(&f, sample.len(), SamplingMethod::InverseTransform, 300, 4);
    let significance = assess_significance(&null, &stat).unwrap();

    let report = adphase::AnalysisReport::new(
        adphase_report::ReportConfig {
            seed: 4,
            method: SamplingMethod::InverseTransform,
            iterations: 300,
            parallel: true,
            stretch_scale: 2.0,
            burn_in: 0,
        },
        adphase_report::NullModelSummary::new(adphase::NullModelSource::ControlPoints, &f),
        &stat,
        &null,
        &significance,
        false,
    );

    let json = adphase::generate_json_report(&report).unwrap();
    assert_eq!(adphase::parse_json_report(&json).unwrap(), report);
}
