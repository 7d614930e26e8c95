//! Report Data Structures

use adphase_stats::{
    AdStatistic, DistributionSummary, NullCdf, NullDistribution, SamplingMethod, SigmaLevel,
    SigmaThresholds, SignificanceResult,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the JSON report layout
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Complete analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// The null CDF the sample was tested against
    pub null_model: NullModelSummary,
    /// A² of the observed sample
    pub observed: ObservedResult,
    /// Calibrated null distribution of A²
    pub calibration: CalibrationSummary,
    /// p-value and σ-thresholds
    pub significance: SignificanceSummary,
}

impl AnalysisReport {
    /// Assemble a report from the outputs of one analysis run
    pub fn new(
        config: ReportConfig,
        null_model: NullModelSummary,
        observed: &AdStatistic,
        null: &NullDistribution,
        significance: &SignificanceResult,
        include_null_values: bool,
    ) -> Self {
        Self {
            meta: ReportMeta::new(config),
            null_model,
            observed: observed.into(),
            calibration: CalibrationSummary::new(null, include_null_values),
            significance: significance.into(),
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report layout version
    pub schema_version: u32,
    /// adphase version that wrote the report
    pub version: String,
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    /// Calibration settings of the run
    pub config: ReportConfig,
}

impl ReportMeta {
    /// Metadata stamped with the current time and crate version
    pub fn new(config: ReportConfig) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            config,
        }
    }
}

/// Calibration settings captured in report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Calibration RNG seed
    pub seed: u64,
    /// Sampling method
    pub method: SamplingMethod,
    /// Requested number of null samples
    pub iterations: usize,
    /// Whether calibration ran on the rayon pool
    pub parallel: bool,
    /// Stretch-move scale `a`
    pub stretch_scale: f64,
    /// Discarded ensemble steps
    pub burn_in: usize,
}

/// Where the null CDF came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullModelSource {
    /// Constant event rate, F(x) = x
    Uniform,
    /// Cumulative values given directly
    ControlPoints,
    /// Histogram of reference phases at the event phases
    ReferenceCoverage,
}

impl std::fmt::Display for NullModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NullModelSource::Uniform => write!(f, "uniform"),
            NullModelSource::ControlPoints => write!(f, "control points"),
            NullModelSource::ReferenceCoverage => write!(f, "reference coverage"),
        }
    }
}

/// Knots of the null CDF, anchors included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullModelSummary {
    /// How the CDF was built
    pub source: NullModelSource,
    /// Knot phases
    pub phases: Vec<f64>,
    /// Cumulative values at the knots
    pub cumulative: Vec<f64>,
}

impl NullModelSummary {
    /// Capture the knots of `cdf`
    pub fn new(source: NullModelSource, cdf: &NullCdf) -> Self {
        Self {
            source,
            phases: cdf.phases().to_vec(),
            cumulative: cdf.cumulative().to_vec(),
        }
    }
}

/// A² of the observed sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedResult {
    /// A² value
    pub statistic: f64,
    /// Number of phases in the sample
    pub sample_size: usize,
    /// Phases that entered the sum
    pub used: usize,
    /// Phases dropped at F(x) = 0 or 1
    pub excluded: usize,
}

impl From<&AdStatistic> for ObservedResult {
    fn from(stat: &AdStatistic) -> Self {
        Self {
            statistic: stat.statistic,
            sample_size: stat.sample_size(),
            used: stat.used,
            excluded: stat.excluded,
        }
    }
}

/// Calibrated null distribution of A²
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSummary {
    /// Sampling method
    pub method: SamplingMethod,
    /// Sample size the null was calibrated for
    pub sample_size: usize,
    /// Shape of the A² values
    pub distribution: DistributionSummary,
    /// Ensemble draws replaced by direct samples
    pub replaced_draws: usize,
    /// Raw A² values in draw order, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
}

impl CalibrationSummary {
    /// Summarise `null`, optionally keeping its raw values
    pub fn new(null: &NullDistribution, include_values: bool) -> Self {
        Self {
            method: null.method,
            sample_size: null.sample_size,
            distribution: null.summary(),
            replaced_draws: null.replaced_draws,
            values: include_values.then(|| null.values.clone()),
        }
    }
}

/// Where the observed A² falls in the null distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceSummary {
    /// Two-sided p-value
    pub p_value: f64,
    /// Observed A² folded around the null mean
    pub folded_statistic: f64,
    /// Mean of the null distribution
    pub null_mean: f64,
    /// 1σ/2σ/3σ thresholds of the folded null
    pub thresholds: SigmaThresholds,
    /// Bucket the observation falls in
    pub sigma_level: SigmaLevel,
}

impl From<&SignificanceResult> for SignificanceSummary {
    fn from(result: &SignificanceResult) -> Self {
        Self {
            p_value: result.p_value,
            folded_statistic: result.folded_statistic,
            null_mean: result.null_mean,
            thresholds: result.thresholds,
            sigma_level: result.sigma_level(),
        }
    }
}
