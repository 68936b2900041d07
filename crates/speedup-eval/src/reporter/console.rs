//! Console reporter for evaluation runs
//!
//! Prints every comparison table as an ASCII table, followed by the files
//! and scenarios that could not be evaluated.

use anyhow::Result;
use std::fmt::Write;

use crate::evaluator::{EvaluationReport, ScenarioOutcome, ScenarioStatus};
use crate::naming::ScenarioKind;
use crate::table::TableRow;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format an evaluation report for console output
    pub fn format(report: &EvaluationReport) -> Result<String> {
        let mut output = String::new();

        // Header
        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                            SPEEDUP EVALUATION                            ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Root:        {}", report.root.display())?;
        writeln!(output, "Started:     {}", report.started_at)?;
        writeln!(output, "Duration:    {}ms", report.duration_ms)?;
        writeln!(
            output,
            "Files:       {} found, {} summarized, {} skipped",
            report.files_discovered,
            report.files_summarized,
            report.skipped_files.len()
        )?;
        writeln!(output)?;

        for scenario in &report.scenarios {
            Self::format_scenario(&mut output, scenario)?;
        }

        writeln!(output, "────────────────────────────────────────────────────────────────────────────")?;
        let status = if report.passed { "PASSED" } else { "FAILED" };
        let status_symbol = if report.passed { "✓" } else { "✗" };
        writeln!(output, "Overall Status: {} {}", status_symbol, status)?;

        if !report.skipped_files.is_empty() {
            writeln!(output)?;
            writeln!(output, "Skipped Files:")?;
            for skipped in &report.skipped_files {
                writeln!(output, "  • {}", skipped.error)?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_scenario(output: &mut String, scenario: &ScenarioOutcome) -> Result<()> {
        let symbol = match scenario.status {
            ScenarioStatus::Failed => "✗",
            ScenarioStatus::Baseline | ScenarioStatus::Written => "✓",
        };
        let kind = match scenario.kind {
            ScenarioKind::Default => "default".to_string(),
            ScenarioKind::Optimized(level) => format!("opt level {}", level),
        };

        writeln!(output, "────────────────────────────────────────────────────────────────────────────")?;
        writeln!(output, "Scenario: {} ({}) {}", scenario.directory.display(), kind, symbol)?;
        writeln!(output, "────────────────────────────────────────────────────────────────────────────")?;

        if scenario.status == ScenarioStatus::Written {
            writeln!(output)?;
            Self::format_table(output, &scenario.rows)?;
        }

        if !scenario.artifacts.is_empty() {
            writeln!(output)?;
            writeln!(output, "  Artifacts:")?;
            for artifact in &scenario.artifacts {
                writeln!(output, "    {}", artifact.display())?;
            }
        }

        if !scenario.errors.is_empty() {
            writeln!(output)?;
            writeln!(output, "  Errors:")?;
            for error in &scenario.errors {
                writeln!(output, "    ✗ {}", error)?;
            }
        }

        writeln!(output)?;
        Ok(())
    }

    fn format_table(output: &mut String, rows: &[TableRow]) -> Result<()> {
        writeln!(output, "  ┌──────────┬─────────┬─────────┬──────────┬──────────┬──────────┬──────────┐")?;
        writeln!(output, "  │   Type   │ Threads │ Opt Lvl │   Init   │   Sort   │  Total   │ Speedup  │")?;
        writeln!(output, "  ├──────────┼─────────┼─────────┼──────────┼──────────┼──────────┼──────────┤")?;

        for row in rows {
            writeln!(
                output,
                "  │ {:<8} │ {:>7} │ {:>7} │ {:>8.5} │ {:>8.5} │ {:>8.5} │ {:>8.5} │",
                row.kind.as_str(),
                row.thread_count,
                row.opt_level,
                row.time_init,
                row.time_sort,
                row.time_elapsed,
                row.speedup
            )?;
        }

        writeln!(output, "  └──────────┴─────────┴─────────┴──────────┴──────────┴──────────┴──────────┘")?;

        if let Some(best) = rows
            .iter()
            .filter(|r| r.thread_count > 0)
            .max_by(|a, b| a.speedup.total_cmp(&b.speedup))
        {
            writeln!(
                output,
                "  Best: {:.3}x on {} threads (efficiency {:.3})",
                best.speedup, best.thread_count, best.efficiency
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::FileFailure;
    use crate::table::RowKind;
    use std::path::PathBuf;

    fn row(kind: RowKind, threads: u32, elapsed: f64, speedup: f64, efficiency: f64) -> TableRow {
        TableRow {
            kind,
            size: 1000,
            thread_count: threads,
            opt_level: if kind == RowKind::Default { 0 } else { 1 },
            time_init: elapsed / 4.0,
            time_sort: elapsed * 3.0 / 4.0,
            time_elapsed: elapsed,
            speedup,
            efficiency,
        }
    }

    fn create_test_report() -> EvaluationReport {
        EvaluationReport {
            root: PathBuf::from("measures"),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            duration_ms: 12,
            files_discovered: 5,
            files_summarized: 4,
            skipped_files: vec![FileFailure {
                path: PathBuf::from("measures/foo.csv"),
                error: "Malformed file name 'foo.csv': missing 'S' marker".to_string(),
            }],
            scenarios: vec![
                ScenarioOutcome {
                    directory: PathBuf::from("measures/opt_0"),
                    kind: ScenarioKind::Default,
                    status: ScenarioStatus::Baseline,
                    rows: vec![row(RowKind::Default, 0, 42.0, 1.0, 1.0)],
                    artifacts: vec![],
                    errors: vec![],
                },
                ScenarioOutcome {
                    directory: PathBuf::from("measures/opt_1"),
                    kind: ScenarioKind::Optimized(1),
                    status: ScenarioStatus::Written,
                    rows: vec![
                        row(RowKind::Default, 0, 42.0, 1.0, 1.0),
                        row(RowKind::Serial, 0, 10.0, 1.0, 1.0),
                        row(RowKind::Parallel, 4, 3.0, 3.33333, 0.83333),
                    ],
                    artifacts: vec![PathBuf::from("measures/opt_1/table.csv")],
                    errors: vec![],
                },
                ScenarioOutcome {
                    directory: PathBuf::from("measures/opt_2"),
                    kind: ScenarioKind::Optimized(2),
                    status: ScenarioStatus::Failed,
                    rows: vec![],
                    artifacts: vec![],
                    errors: vec!["No serial baseline precedes parallel run".to_string()],
                },
            ],
            passed: false,
        }
    }

    #[test]
    fn test_console_format_contains_tables() {
        let output = ConsoleReporter::format(&create_test_report()).unwrap();

        assert!(output.contains("SPEEDUP EVALUATION"));
        assert!(output.contains("measures/opt_1 (opt level 1) ✓"));
        assert!(output.contains("Parallel"));
        assert!(output.contains("3.33333"));
        assert!(output.contains("Best: 3.333x on 4 threads"));
    }

    #[test]
    fn test_console_format_lists_failures() {
        let output = ConsoleReporter::format(&create_test_report()).unwrap();

        assert!(output.contains("measures/opt_2 (opt level 2) ✗"));
        assert!(output.contains("No serial baseline"));
        assert!(output.contains("Skipped Files:"));
        assert!(output.contains("foo.csv"));
        assert!(output.contains("FAILED"));
    }

    #[test]
    fn test_baseline_has_no_table() {
        let output = ConsoleReporter::format(&create_test_report()).unwrap();
        let baseline = output
            .split("Scenario: ")
            .find(|s| s.starts_with("measures/opt_0"))
            .unwrap();
        assert!(!baseline.contains("┌"));
    }
}
