//! Analysis Executor
//!
//! Runs one significance test and turns its outputs into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! observed phases + null CDF
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  A² of the sample, calibrated null distribution, p-value
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build AnalysisReport
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Analysis pipeline with calibration progress
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;
mod report;

pub use execution::{AnalysisInput, AnalysisOutcome, Analyzer, resolve_seed};
pub use formatting::{format_human_output, format_statistic_output};
pub use report::build_report;
