#![warn(missing_docs)]
//! adphase Report - Analysis Output
//!
//! Generates the output formats of an analysis run:
//! - JSON (machine-readable, full report)
//! - CSV (the calibrated null distribution, raw and folded)
//!
//! Human-readable terminal output is rendered by the CLI.

mod csv;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use json::{generate_json_report, parse_json_report};
pub use report::{
    AnalysisReport, CalibrationSummary, NullModelSource, NullModelSummary, ObservedResult,
    REPORT_SCHEMA_VERSION, ReportConfig, ReportMeta, SignificanceSummary,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV of the null distribution
    Csv,
    /// Human-readable terminal output
    #[default]
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Human => write!(f, "human"),
        }
    }
}
