//! End-to-end evaluation of a measurement tree
//!
//! The evaluator walks the root directory, summarizes every measurement file
//! once, resolves the default row of each problem size, and then writes one
//! comparison table (plus charts) per optimized scenario directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::discovery::discover;
use crate::error::{EvalError, Result};
use crate::naming::{FileDescriptor, ScenarioKind};
use crate::reporter::{ChartRenderer, TableWriter};
use crate::summary::{MeasurementSummarizer, SummaryIndex};
use crate::table::{ComparisonTableBuilder, DefaultRows, InputFile, ScenarioGroup, TableRow};

/// Results of a complete evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Directory the measurements were read from
    pub root: PathBuf,
    /// Timestamp when the run started
    pub started_at: String,
    /// Wall-clock duration of the run
    pub duration_ms: u64,
    /// Number of qualifying files found
    pub files_discovered: usize,
    /// Number of files reduced to a summary
    pub files_summarized: usize,
    /// Files left out, with the reason
    pub skipped_files: Vec<FileFailure>,
    /// One entry per scenario directory, in path order
    pub scenarios: Vec<ScenarioOutcome>,
    /// No file skipped and no scenario failed
    pub passed: bool,
}

impl EvaluationReport {
    pub fn failed_scenarios(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.scenarios
            .iter()
            .filter(|s| s.status == ScenarioStatus::Failed)
    }

    pub fn tables_written(&self) -> usize {
        self.scenarios
            .iter()
            .filter(|s| s.status == ScenarioStatus::Written)
            .count()
    }
}

/// A measurement file that was left out of every table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

impl FileFailure {
    fn new(path: &Path, error: &EvalError) -> Self {
        Self {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Default directory whose row seeds other tables
    Baseline,
    /// Comparison table (and charts, if enabled) written
    Written,
    Failed,
}

/// What happened to one scenario directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub directory: PathBuf,
    pub kind: ScenarioKind,
    pub status: ScenarioStatus,
    pub rows: Vec<TableRow>,
    pub artifacts: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl ScenarioOutcome {
    fn new(group: &ScenarioGroup, status: ScenarioStatus) -> Self {
        Self {
            directory: group.directory.clone(),
            kind: group.kind,
            status,
            rows: Vec::new(),
            artifacts: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn fail(mut self, error: &EvalError) -> Self {
        self.status = ScenarioStatus::Failed;
        self.errors.push(error.to_string());
        self
    }
}

/// Runs the whole pipeline for one measurement tree
pub struct Evaluator {
    config: Config,
    table_writer: TableWriter,
    chart_renderer: ChartRenderer,
}

impl Evaluator {
    pub fn new(config: Config) -> Self {
        let table_writer = TableWriter::new(config.output.table_file.clone());
        let chart_renderer = ChartRenderer::new(&config.output, &config.chart);
        Self {
            config,
            table_writer,
            chart_renderer,
        }
    }

    /// Evaluate every scenario under `root`.
    ///
    /// Per-file and per-scenario problems are logged and recorded in the
    /// report; only a failure to read `root` itself, or finding nothing to
    /// evaluate, aborts the run.
    ///
    /// # Errors
    ///
    /// - [`EvalError::Walk`] if `root` cannot be read
    /// - [`EvalError::NoInputFiles`] if no qualifying file exists
    #[instrument(skip(self, root), fields(root = %root.display()))]
    pub fn run(&self, root: &Path) -> Result<EvaluationReport> {
        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();

        let files = discover(root, &self.config.input)?;
        if files.is_empty() {
            return Err(EvalError::NoInputFiles {
                root: root.to_path_buf(),
            });
        }
        info!("Found {} measurement files under {}", files.len(), root.display());

        let mut skipped_files = Vec::new();
        let mut decoded = Vec::with_capacity(files.len());
        for path in &files {
            match FileDescriptor::from_path(path) {
                Ok(descriptor) => decoded.push(InputFile {
                    path: path.clone(),
                    descriptor,
                }),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    skipped_files.push(FileFailure::new(path, &e));
                }
            }
        }

        info!("Calculating means...");
        let summarizer = MeasurementSummarizer::new(self.config.input.clone());
        let (summaries, failures) =
            SummaryIndex::build(&summarizer, decoded.iter().map(|f| &f.path));
        skipped_files.extend(
            failures
                .iter()
                .map(|(path, e)| FileFailure::new(path, e)),
        );

        let groups = ScenarioGroup::group(decoded);
        let (defaults, default_failures) = DefaultRows::collect(&groups, &summaries);
        for (directory, e) in &default_failures {
            warn!("Ignoring default scenario {}: {}", directory.display(), e);
        }

        info!("Creating tables and plots...");
        let builder = ComparisonTableBuilder::new(&summaries, &defaults);
        let scenarios: Vec<ScenarioOutcome> = groups
            .iter()
            .map(|group| {
                if group.is_default() {
                    Self::baseline_outcome(group, &defaults, &default_failures)
                } else {
                    self.evaluate_scenario(&builder, group)
                }
            })
            .collect();

        let passed = skipped_files.is_empty()
            && scenarios
                .iter()
                .all(|s| s.status != ScenarioStatus::Failed);

        let report = EvaluationReport {
            root: root.to_path_buf(),
            started_at,
            duration_ms: start_time.elapsed().as_millis() as u64,
            files_discovered: files.len(),
            files_summarized: summaries.len(),
            skipped_files,
            scenarios,
            passed,
        };

        if report.passed {
            info!(
                "Wrote {} tables in {}ms",
                report.tables_written(),
                report.duration_ms
            );
        } else {
            warn!(
                "Evaluation completed with {} skipped files and {} failed scenarios",
                report.skipped_files.len(),
                report.failed_scenarios().count()
            );
        }

        Ok(report)
    }

    fn baseline_outcome(
        group: &ScenarioGroup,
        defaults: &DefaultRows,
        failures: &[(PathBuf, EvalError)],
    ) -> ScenarioOutcome {
        let outcome = ScenarioOutcome::new(group, ScenarioStatus::Baseline);
        if let Some((_, e)) = failures.iter().find(|(dir, _)| *dir == group.directory) {
            return outcome.fail(e);
        }

        let row = group
            .files
            .first()
            .and_then(|f| defaults.get(f.descriptor.size))
            .cloned();
        ScenarioOutcome {
            rows: row.into_iter().collect(),
            ..outcome
        }
    }

    #[instrument(skip(self, builder, group), fields(scenario = %group.directory.display()))]
    fn evaluate_scenario(
        &self,
        builder: &ComparisonTableBuilder<'_>,
        group: &ScenarioGroup,
    ) -> ScenarioOutcome {
        let mut outcome = ScenarioOutcome::new(group, ScenarioStatus::Written);

        let table = match builder.build(group) {
            Ok(table) => table,
            Err(e) => {
                warn!("No table for {}: {}", group.directory.display(), e);
                return outcome.fail(&e);
            }
        };
        outcome.rows = table.rows.clone();

        match self
            .table_writer
            .write(&table.directory, table.fields(), &table.rows)
        {
            Ok(path) => outcome.artifacts.push(path),
            Err(e) => {
                error!("{}", e);
                return outcome.fail(&e);
            }
        }

        if self.config.output.charts {
            match self.chart_renderer.render(&table.directory, &table.rows) {
                Ok(paths) => outcome.artifacts.extend(paths),
                Err(e) => {
                    error!("{}", e);
                    return outcome.fail(&e);
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "size;threads;time_init;time_sort\n";

    fn write_measure(root: &Path, rel: &str, init: f64, sort: f64) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        // Three identical trials plus one that the trim drops
        let rows = format!(
            "{HEADER}0;0;{init};{sort}\n0;0;{init};{sort}\n0;0;{init};{sort}\n0;0;{};{}\n",
            init * 10.0,
            sort * 10.0
        );
        fs::write(path, rows).unwrap();
    }

    fn evaluator() -> Evaluator {
        let mut config = Config::default();
        config.output.charts = false;
        Evaluator::new(config)
    }

    #[test]
    fn test_empty_root_is_no_input() {
        let dir = TempDir::new().unwrap();
        let err = evaluator().run(dir.path()).unwrap_err();
        assert!(matches!(err, EvalError::NoInputFiles { .. }));
    }

    #[test]
    fn test_baseline_outcome_carries_default_row() {
        let dir = TempDir::new().unwrap();
        write_measure(dir.path(), "opt_0/S10_T0_O0.csv", 1.0, 2.0);
        write_measure(dir.path(), "opt_1/S10_T0_O1.csv", 1.0, 1.0);
        write_measure(dir.path(), "opt_1/S10_T2_O1.csv", 0.5, 0.5);

        let report = evaluator().run(dir.path()).unwrap();
        assert!(report.passed);
        assert_eq!(report.files_discovered, 3);
        assert_eq!(report.files_summarized, 3);
        assert_eq!(report.scenarios.len(), 2);

        let baseline = &report.scenarios[0];
        assert_eq!(baseline.status, ScenarioStatus::Baseline);
        assert_eq!(baseline.kind, ScenarioKind::Default);
        assert_eq!(baseline.rows.len(), 1);
        assert_eq!(baseline.rows[0].time_elapsed, 3.0);

        let written = &report.scenarios[1];
        assert_eq!(written.status, ScenarioStatus::Written);
        assert_eq!(written.kind, ScenarioKind::Optimized(1));
        assert_eq!(written.artifacts, vec![dir.path().join("opt_1/table.csv")]);
        assert_eq!(written.rows[2].speedup, 2.0);
        assert_eq!(report.tables_written(), 1);
    }

    #[test]
    fn test_invalid_default_fails_its_scenarios() {
        let dir = TempDir::new().unwrap();
        write_measure(dir.path(), "opt_0/S10_T0_O0.csv", 1.0, 2.0);
        write_measure(dir.path(), "opt_0/S10_T2_O0.csv", 1.0, 2.0);
        write_measure(dir.path(), "opt_1/S10_T0_O1.csv", 1.0, 1.0);

        let report = evaluator().run(dir.path()).unwrap();
        assert!(!report.passed);
        assert_eq!(report.scenarios[0].status, ScenarioStatus::Failed);
        assert_eq!(report.scenarios[1].status, ScenarioStatus::Failed);
        assert!(report.scenarios[1].errors[0].contains("No default measurement"));
        assert!(!dir.path().join("opt_1/table.csv").exists());
    }

    #[test]
    fn test_unwritable_table_fails_scenario() {
        let dir = TempDir::new().unwrap();
        write_measure(dir.path(), "opt_0/S10_T0_O0.csv", 1.0, 2.0);
        write_measure(dir.path(), "opt_1/S10_T0_O1.csv", 1.0, 1.0);
        write_measure(dir.path(), "opt_1/S10_T2_O1.csv", 0.5, 0.5);

        let mut config = Config::default();
        config.output.charts = false;
        config.output.table_file = "missing/table.csv".to_string();
        let report = Evaluator::new(config).run(dir.path()).unwrap();

        assert!(!report.passed);
        assert!(report.skipped_files.is_empty());
        let scenario = &report.scenarios[1];
        assert_eq!(scenario.status, ScenarioStatus::Failed);
        assert!(scenario.artifacts.is_empty());
        assert!(scenario.errors[0].starts_with("CSV error in"));
        // The rows were computed before the write failed
        assert_eq!(scenario.rows.len(), 3);
    }

    #[test]
    fn test_report_serializes() {
        let dir = TempDir::new().unwrap();
        write_measure(dir.path(), "opt_0/S10_T0_O0.csv", 1.0, 2.0);

        let report = evaluator().run(dir.path()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"baseline\""));
        assert!(json.contains("\"kind\":\"default\""));
    }
}
