//! JSON reporter for evaluation runs

use crate::evaluator::EvaluationReport;
use anyhow::Result;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format an evaluation report as JSON, optionally pretty-printed
    pub fn format(report: &EvaluationReport, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_test_report() -> EvaluationReport {
        EvaluationReport {
            root: PathBuf::from("measures"),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            duration_ms: 3,
            files_discovered: 1,
            files_summarized: 1,
            skipped_files: vec![],
            scenarios: vec![],
            passed: true,
        }
    }

    #[test]
    fn test_json_format_compact() {
        let output = JsonReporter::format(&create_test_report(), false).unwrap();

        assert!(!output.contains('\n'));
        assert!(output.contains("\"root\":\"measures\""));
    }

    #[test]
    fn test_json_format_pretty() {
        let output = JsonReporter::format(&create_test_report(), true).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("  \"passed\": true"));
    }

    #[test]
    fn test_json_parses_back() {
        let report = create_test_report();
        let json = JsonReporter::format(&report, false).unwrap();
        let parsed: EvaluationReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.root, report.root);
        assert_eq!(parsed.files_discovered, 1);
        assert!(parsed.passed);
    }
}
