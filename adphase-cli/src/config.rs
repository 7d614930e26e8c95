//! Configuration loading from adphase.toml
//!
//! An analysis is described by an `adphase.toml` file: the null model, the
//! observed sample, calibration settings and output preferences. The file is
//! discovered by walking up from the current directory; CLI flags override it.

use adphase_report::NullModelSource;
use adphase_stats::{CalibrationConfig, NullCdf, SamplingMethod, fold_phases};
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name looked up by [`AdConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "adphase.toml";

/// adphase configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdConfig {
    /// Null hypothesis
    #[serde(default)]
    pub null_model: NullModelConfig,
    /// Observed sample
    #[serde(default)]
    pub sample: SampleConfig,
    /// Monte Carlo calibration
    #[serde(default)]
    pub calibration: CalibrationSettings,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Null model: explicit control points, reference coverage, or uniform when empty
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NullModelConfig {
    /// Control-point phases
    #[serde(default)]
    pub phases: Option<Vec<f64>>,
    /// Cumulative values at `phases`
    #[serde(default)]
    pub cumulative: Option<Vec<f64>>,
    /// Reference process phases, already folded
    #[serde(default)]
    pub reference_phases: Option<Vec<f64>>,
    /// Reference process times, folded with `period`
    #[serde(default)]
    pub reference_times: Option<Vec<f64>>,
    /// Folding period for `reference_times`
    #[serde(default)]
    pub period: Option<f64>,
}

impl NullModelConfig {
    /// Build the null CDF, using the observed phases as bin edges for reference coverage
    pub fn build(&self, event_phases: &[f64]) -> anyhow::Result<(NullModelSource, NullCdf)> {
        let explicit = self.phases.is_some() || self.cumulative.is_some();
        let reference = self.reference_phases.is_some() || self.reference_times.is_some();

        if explicit && reference {
            bail!("[null_model] sets both control points and reference coverage; choose one");
        }

        if explicit {
            let (Some(phases), Some(cumulative)) = (&self.phases, &self.cumulative) else {
                bail!("[null_model] needs both `phases` and `cumulative`");
            };
            let cdf = NullCdf::new(phases, cumulative).context("invalid null model")?;
            return Ok((NullModelSource::ControlPoints, cdf));
        }

        if reference {
            let mut reference = self.reference_phases.clone().unwrap_or_default();
            if let Some(times) = &self.reference_times {
                let period = self
                    .period
                    .context("[null_model] `reference_times` needs a `period`")?;
                reference.extend(fold_phases(times, period)?);
            }
            let cdf = NullCdf::from_reference_coverage(event_phases, &reference)
                .context("invalid reference coverage")?;
            return Ok((NullModelSource::ReferenceCoverage, cdf));
        }

        Ok((NullModelSource::Uniform, NullCdf::uniform()))
    }
}

/// Observed sample: phases, or times folded on a period
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SampleConfig {
    /// Event phases in [0, 1)
    #[serde(default)]
    pub phases: Option<Vec<f64>>,
    /// Event times, folded with `period`
    #[serde(default)]
    pub times: Option<Vec<f64>>,
    /// Folding period for `times`; falls back to `[null_model] period`
    #[serde(default)]
    pub period: Option<f64>,
}

impl SampleConfig {
    /// Resolve the observed phases
    pub fn resolve(&self, fallback_period: Option<f64>) -> anyhow::Result<Vec<f64>> {
        let mut phases = self.phases.clone().unwrap_or_default();
        if let Some(times) = &self.times {
            let period = self
                .period
                .or(fallback_period)
                .context("[sample] `times` needs a `period`")?;
            phases.extend(fold_phases(times, period)?);
        }
        if phases.is_empty() {
            bail!("no observed sample: set [sample] `phases` or `times`");
        }
        Ok(phases)
    }
}

/// Calibration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSettings {
    /// Number of synthetic samples
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Sampling method: "inverse" or "mcmc"
    #[serde(default)]
    pub method: SamplingMethod,
    /// RNG seed; a random one is chosen and logged when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Use rayon for sampling and statistic evaluation
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Stretch-move scale of the ensemble sampler
    #[serde(default = "default_stretch_scale")]
    pub stretch_scale: f64,
    /// Ensemble steps discarded before recording
    #[serde(default)]
    pub burn_in: usize,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            method: SamplingMethod::default(),
            seed: None,
            parallel: default_parallel(),
            stretch_scale: default_stretch_scale(),
            burn_in: 0,
        }
    }
}

impl CalibrationSettings {
    /// Settings as a sampler configuration
    pub fn to_calibration_config(&self) -> CalibrationConfig {
        CalibrationConfig {
            iterations: self.iterations,
            method: self.method,
            parallel: self.parallel,
            stretch_scale: self.stretch_scale,
            burn_in: self.burn_in,
        }
    }
}

fn default_iterations() -> usize {
    adphase_stats::DEFAULT_CALIBRATION_ITERATIONS
}
fn default_parallel() -> bool {
    true
}
fn default_stretch_scale() -> f64 {
    2.0
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: human, json, csv
    #[serde(default = "default_format")]
    pub format: String,
    /// Keep the raw null distribution in JSON reports
    #[serde(default)]
    pub include_null_values: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            include_null_values: false,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl AdConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Find the nearest adphase.toml, walking up from `start`
    pub fn find_from(start: impl AsRef<Path>) -> Option<PathBuf> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(dir)
    }

    /// Load the nearest `adphase.toml` at or above `start`
    ///
    /// A file that exists but fails to load is logged and skipped.
    pub fn discover_from(start: impl AsRef<Path>) -> Option<Self> {
        let path = Self::find_from(start)?;
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), "ignoring unreadable config: {:#}", e);
                None
            }
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# adphase Configuration
#
# Tests whether event phases follow a null distribution over phase.

[null_model]
# Without a null model the event rate is taken as constant over phase.
# Either give control points of the cumulative distribution...
# phases = [0.2, 0.5, 0.8]
# cumulative = [0.3, 0.6, 0.9]
# ...or reference coverage, histogrammed at the observed phases:
# reference_phases = [0.01, 0.02, 0.03]
# reference_times = [1325.3, 1325.4, 1325.5]
# period = 6.95

[sample]
# Observed event phases in [0, 1)
phases = [
    0.61256542337174, 0.029301729581047, 0.017527257576216, 0.811732598451724,
    0.057241154463297, 0.729890495361688, 0.040306751646131, 0.113071753157355,
    0.150647085333129, 0.200293264178819, 0.948623252939387, 0.044963590199154,
]
# ...or event times folded on a period
# times = [1325.7, 1331.2]
# period = 6.95

[calibration]
# Number of synthetic samples in the null distribution
iterations = 10000
# Sampling method: "inverse" or "mcmc"
method = "inverse"
# RNG seed (uncomment for reproducible runs)
# seed = 42
# Parallel sampling and evaluation
parallel = true
# Ensemble sampler stretch scale (mcmc only)
stretch_scale = 2.0
# Ensemble steps to discard (mcmc only)
burn_in = 0

[output]
# Default output format: human, json, csv
format = "human"
# Keep the raw null distribution in JSON reports
include_null_values = false
"#
        .to_string()
    }
}
