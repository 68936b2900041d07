//! Artifacts and run reports
//!
//! Two kinds of output leave the evaluator:
//!
//! - **Scenario artifacts** written next to the measurements: the comparison
//!   table ([`TableWriter`]) and the speedup/efficiency charts
//!   ([`ChartRenderer`]).
//! - **Run reports** describing what was evaluated, rendered by [`Reporter`]
//!   in one of the [`OutputFormat`]s.
//!
//! # Example
//!
//! ```no_run
//! use speedup_eval::reporter::{OutputFormat, Reporter};
//! use speedup_eval::evaluator::EvaluationReport;
//!
//! # fn example(report: EvaluationReport) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&report)?;
//!
//! // Or keep a machine-readable copy
//! Reporter::new(OutputFormat::JsonPretty).write_to_file(&report, "report.json")?;
//! # Ok(())
//! # }
//! ```

mod chart;
mod console;
mod json;
mod table_csv;

use anyhow::{bail, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::evaluator::EvaluationReport;

pub use chart::{axes_data, speedup_label_position, ChartMetric, ChartRenderer};
pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use table_csv::TableWriter;

/// Output format for run reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Console,
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            other => bail!(
                "Unknown output format '{}' (expected console, json or json-pretty)",
                other
            ),
        }
    }
}

/// Reporter for evaluation runs
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report to stdout
    pub fn report(&self, report: &EvaluationReport) -> Result<()> {
        let output = self.format_report(report)?;
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", output)?;
        if self.format != OutputFormat::Console {
            writeln!(stdout)?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Write the formatted report to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, report: &EvaluationReport, path: P) -> Result<()> {
        let output = self.format_report(report)?;
        fs::write(path, output)?;
        Ok(())
    }

    /// Format a report as a string
    pub fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            OutputFormat::Console => ConsoleReporter::format(report),
            OutputFormat::Json => JsonReporter::format(report, false),
            OutputFormat::JsonPretty => JsonReporter::format(report, true),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{ScenarioOutcome, ScenarioStatus};
    use crate::naming::ScenarioKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_report() -> EvaluationReport {
        EvaluationReport {
            root: PathBuf::from("measures"),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            duration_ms: 7,
            files_discovered: 2,
            files_summarized: 2,
            skipped_files: vec![],
            scenarios: vec![ScenarioOutcome {
                directory: PathBuf::from("measures/opt_3"),
                kind: ScenarioKind::Optimized(3),
                status: ScenarioStatus::Failed,
                rows: vec![],
                artifacts: vec![],
                errors: vec!["No default measurement for size 1000".to_string()],
            }],
            passed: false,
        }
    }

    #[test]
    fn test_reporter_json_format() {
        let output = Reporter::new(OutputFormat::Json)
            .format_report(&create_test_report())
            .unwrap();

        assert!(output.contains("\"status\":\"failed\""));
        assert!(output.contains("measures/opt_3"));
    }

    #[test]
    fn test_reporter_console_format() {
        let output = Reporter::new(OutputFormat::Console)
            .format_report(&create_test_report())
            .unwrap();

        assert!(output.contains("measures/opt_3"));
        assert!(output.contains("No default measurement"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&create_test_report(), &path)
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let parsed: EvaluationReport = serde_json::from_str(&written).unwrap();
        assert!(!parsed.passed);
        assert_eq!(parsed.scenarios.len(), 1);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("console".parse::<OutputFormat>().unwrap(), OutputFormat::Console);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "json-pretty".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonPretty
        );
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::Console);
    }
}
