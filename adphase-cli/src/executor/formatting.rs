//! Output Formatting
//!
//! Human-readable output formatting for analysis reports.

use adphase_report::{AnalysisReport, NullModelSource};
use adphase_stats::{AdStatistic, SIGMA_TAIL_PROBABILITIES};

const RULE_WIDTH: usize = 60;

fn section(output: &mut String, title: &str) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
}

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("adphase Results\n");
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push_str("\n\n");

    section(&mut output, "Null model");
    output.push_str(&format!(
        "  {} ({} control points)\n\n",
        report.null_model.source,
        report.null_model.phases.len()
    ));

    let observed = &report.observed;
    section(&mut output, "Observed sample");
    output.push_str(&format!("  A²: {:.4}\n", observed.statistic));
    output.push_str(&format!(
        "  n: {} ({} used, {} excluded at the support boundary)\n\n",
        observed.sample_size, observed.used, observed.excluded
    ));

    let calibration = &report.calibration;
    let dist = &calibration.distribution;
    section(
        &mut output,
        &format!(
            "Null distribution ({}, {} samples, seed {})",
            calibration.method, dist.count, report.meta.config.seed
        ),
    );
    output.push_str(&format!(
        "  mean: {:.4} ± {:.4}  median: {:.4}  stddev: {:.4}\n",
        dist.mean,
        dist.standard_error(),
        dist.median,
        dist.std_dev
    ));
    output.push_str(&format!("  min: {:.4}  max: {:.4}\n", dist.min, dist.max));
    if calibration.replaced_draws > 0 {
        output.push_str(&format!(
            "  replaced draws: {}\n",
            calibration.replaced_draws
        ));
    }
    output.push('\n');

    let significance = &report.significance;
    let thresholds = [
        significance.thresholds.one_sigma,
        significance.thresholds.two_sigma,
        significance.thresholds.three_sigma,
    ];
    section(&mut output, "Significance (two-sided)");
    for (sigma, (threshold, tail)) in thresholds.iter().zip(SIGMA_TAIL_PROBABILITIES).enumerate() {
        output.push_str(&format!(
            "  {}σ threshold (p = {:.4}): A² = {:.4}\n",
            sigma + 1,
            tail,
            threshold
        ));
    }
    output.push_str(&format!(
        "  p-value: {:.4}  ({})\n",
        significance.p_value, significance.sigma_level
    ));

    output
}

/// Format the A² of a sample without calibration
pub fn format_statistic_output(statistic: &AdStatistic, source: NullModelSource) -> String {
    let mut output = String::new();
    output.push_str(&format!("A² against {} null: {:.4}\n", source, statistic.statistic));
    output.push_str(&format!(
        "n: {} ({} used, {} excluded at the support boundary)\n",
        statistic.sample_size(),
        statistic.used,
        statistic.excluded
    ));
    output
}
