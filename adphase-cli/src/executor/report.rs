//! Report Building
//!
//! Turns an [`AnalysisOutcome`] into the serialisable [`AnalysisReport`].

use super::execution::AnalysisOutcome;
use adphase_report::{AnalysisReport, NullModelSummary, ReportConfig};

/// Build a complete report from the outputs of one analysis
///
/// # Arguments
/// * `outcome` - Outputs of [`super::Analyzer::run`]
/// * `include_null_values` - Keep the raw A² values in the report
pub fn build_report(outcome: &AnalysisOutcome, include_null_values: bool) -> AnalysisReport {
    let config = ReportConfig {
        seed: outcome.seed,
        method: outcome.config.method,
        iterations: outcome.config.iterations,
        parallel: outcome.config.parallel,
        stretch_scale: outcome.config.stretch_scale,
        burn_in: outcome.config.burn_in,
    };

    AnalysisReport::new(
        config,
        NullModelSummary::new(outcome.source, &outcome.null_cdf),
        &outcome.observed,
        &outcome.null,
        &outcome.significance,
        include_null_values,
    )
}
