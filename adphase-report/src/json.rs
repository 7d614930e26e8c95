//! JSON Output

use crate::report::AnalysisReport;

/// Generate a prettified JSON report.
///
/// Serializes the analysis report into machine-readable JSON format.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Parse a report previously written by [`generate_json_report`]
pub fn parse_json_report(json: &str) -> Result<AnalysisReport, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_json_round_trip() {
        let report = sample_report(true);
        let json = generate_json_report(&report).unwrap();
        let parsed = parse_json_report(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_json_layout() {
        let json = generate_json_report(&sample_report(false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["meta"]["schema_version"], 1);
        assert_eq!(value["meta"]["config"]["method"], "inverse");
        assert_eq!(value["null_model"]["source"], "uniform");
        assert_eq!(value["significance"]["sigma_level"], "two_sigma");
        assert!(value["calibration"].get("values").is_none());
    }
}
