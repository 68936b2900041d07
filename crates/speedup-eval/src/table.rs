//! Comparison tables of serial and parallel runs
//!
//! One table is built per scenario directory, i.e. per (size, optimization
//! level) pair. Every table opens with the *default* row of its problem size
//! (the serial run of the unoptimized build, which lives in its own
//! directory), followed by the serial run of the scenario and then its
//! parallel runs in increasing thread count:
//!
//! ```text
//! Type      Threads  Time Total  Speedup  Efficiency
//! Default   0        41.2        1        1
//! Serial    0        10.0        1        1
//! Parallel  2        5.2         1.92308  0.96154
//! Parallel  4        3.0         3.33333  0.83333
//! ```
//!
//! Speedup and efficiency of a parallel row are relative to the serial row
//! of the *same* scenario, not to the default row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::{EvalError, Result};
use crate::naming::{FileDescriptor, ScenarioKind};
use crate::stats::round5;
use crate::summary::{FileSummary, SummaryIndex};

/// Column headers of a comparison table, in row order
pub const FIELDS: [&str; 9] = [
    "Type",
    "Size",
    "Threads",
    "Opt Lvl",
    "Time Init",
    "Time Sort",
    "Time Total",
    "Speedup",
    "Efficiency",
];

/// Role of a row within its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RowKind {
    /// Serial run of the unoptimized build
    Default,
    /// Serial run of an optimized build
    Serial,
    Parallel,
}

impl RowKind {
    pub fn of(descriptor: &FileDescriptor) -> Self {
        match (descriptor.is_serial(), descriptor.opt_level) {
            (true, 0) => RowKind::Default,
            (true, _) => RowKind::Serial,
            (false, _) => RowKind::Parallel,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Default => "Default",
            RowKind::Serial => "Serial",
            RowKind::Parallel => "Parallel",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub kind: RowKind,
    pub size: u64,
    pub thread_count: u32,
    pub opt_level: u32,
    pub time_init: f64,
    pub time_sort: f64,
    pub time_elapsed: f64,
    pub speedup: f64,
    pub efficiency: f64,
}

impl TableRow {
    /// Row for a serial run; speedup and efficiency are 1 by definition.
    pub fn serial(descriptor: &FileDescriptor, summary: &FileSummary) -> Self {
        Self::with_ratios(descriptor, summary, 1.0, 1.0)
    }

    /// Row for a parallel run measured against `baseline_elapsed`.
    pub fn parallel(
        descriptor: &FileDescriptor,
        summary: &FileSummary,
        baseline_elapsed: f64,
    ) -> Self {
        let speedup = round5(baseline_elapsed / summary.time_elapsed);
        let efficiency = round5(speedup / f64::from(descriptor.thread_count));
        Self::with_ratios(descriptor, summary, speedup, efficiency)
    }

    fn with_ratios(
        descriptor: &FileDescriptor,
        summary: &FileSummary,
        speedup: f64,
        efficiency: f64,
    ) -> Self {
        Self {
            kind: RowKind::of(descriptor),
            size: descriptor.size,
            thread_count: descriptor.thread_count,
            opt_level: descriptor.opt_level,
            time_init: summary.time_init,
            time_sort: summary.time_sort,
            time_elapsed: summary.time_elapsed,
            speedup,
            efficiency,
        }
    }

    /// Cell values in [`FIELDS`] order.
    ///
    /// The unit ratios of default and serial rows are written as the
    /// integer `1`, computed ratios as decimals.
    pub fn to_record(&self) -> Vec<String> {
        let (speedup, efficiency) = match self.kind {
            RowKind::Parallel => (format_decimal(self.speedup), format_decimal(self.efficiency)),
            RowKind::Default | RowKind::Serial => ("1".to_string(), "1".to_string()),
        };
        vec![
            self.kind.to_string(),
            self.size.to_string(),
            self.thread_count.to_string(),
            self.opt_level.to_string(),
            format_decimal(self.time_init),
            format_decimal(self.time_sort),
            format_decimal(self.time_elapsed),
            speedup,
            efficiency,
        ]
    }
}

/// Shortest representation that parses back to the same value, always
/// with a fractional part (`3.0`, `3.33333`).
fn format_decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// A measurement file whose name has been decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub descriptor: FileDescriptor,
}

/// All decoded files of one directory
#[derive(Debug, Clone)]
pub struct ScenarioGroup {
    pub directory: PathBuf,
    pub kind: ScenarioKind,
    pub files: Vec<InputFile>,
}

impl ScenarioGroup {
    /// Group files by parent directory, in sorted directory order.
    ///
    /// A directory is a default group when all of its files come from the
    /// unoptimized build; otherwise its kind is the optimization level of its
    /// first optimized file.
    pub fn group(files: Vec<InputFile>) -> Vec<ScenarioGroup> {
        let mut by_dir: BTreeMap<PathBuf, Vec<InputFile>> = BTreeMap::new();
        for file in files {
            let dir = file
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            by_dir.entry(dir).or_default().push(file);
        }

        by_dir
            .into_iter()
            .map(|(directory, mut files)| {
                files.sort_by(|a, b| a.path.cmp(&b.path));
                let kind = files
                    .iter()
                    .map(|f| f.descriptor.scenario_kind())
                    .find(|kind| *kind != ScenarioKind::Default)
                    .unwrap_or(ScenarioKind::Default);
                ScenarioGroup {
                    directory,
                    kind,
                    files,
                }
            })
            .collect()
    }

    pub fn is_default(&self) -> bool {
        self.kind == ScenarioKind::Default
    }
}

/// Default rows keyed by problem size
#[derive(Debug, Clone, Default)]
pub struct DefaultRows {
    rows: BTreeMap<u64, TableRow>,
}

impl DefaultRows {
    /// Resolve the default row of every default group.
    ///
    /// A default directory must hold exactly one serial measurement, and each
    /// problem size must have only one default directory. Offending groups
    /// are reported and contribute no row.
    pub fn collect(
        groups: &[ScenarioGroup],
        summaries: &SummaryIndex,
    ) -> (Self, Vec<(PathBuf, EvalError)>) {
        let mut rows = BTreeMap::new();
        let mut failures = Vec::new();

        for group in groups.iter().filter(|g| g.is_default()) {
            match Self::resolve(group, summaries) {
                Ok(row) => {
                    if rows.contains_key(&row.size) {
                        failures.push((
                            group.directory.clone(),
                            EvalError::InvalidDefault {
                                scenario: group.directory.clone(),
                                reason: format!("a default for size {} already exists", row.size),
                            },
                        ));
                    } else {
                        debug!(
                            size = row.size,
                            directory = %group.directory.display(),
                            "Default row resolved"
                        );
                        rows.insert(row.size, row);
                    }
                }
                Err(e) => failures.push((group.directory.clone(), e)),
            }
        }

        (Self { rows }, failures)
    }

    fn resolve(group: &ScenarioGroup, summaries: &SummaryIndex) -> Result<TableRow> {
        let invalid = |reason: String| EvalError::InvalidDefault {
            scenario: group.directory.clone(),
            reason,
        };

        let file = match group.files.as_slice() {
            [file] => file,
            files => return Err(invalid(format!("expected 1 file, found {}", files.len()))),
        };
        if !file.descriptor.is_serial() {
            return Err(invalid(format!(
                "{} is not a serial run",
                file.path.display()
            )));
        }
        let summary = summaries
            .get(&file.path)
            .ok_or_else(|| invalid(format!("{} could not be summarized", file.path.display())))?;

        Ok(TableRow::serial(&file.descriptor, summary))
    }

    pub fn get(&self, size: u64) -> Option<&TableRow> {
        self.rows.get(&size)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows of one scenario, starting with the default row of its size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub directory: PathBuf,
    pub rows: Vec<TableRow>,
}

impl ComparisonTable {
    pub fn fields(&self) -> &'static [&'static str] {
        &FIELDS
    }

    pub fn default_row(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    pub fn parallel_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Parallel)
    }
}

/// Serial baseline tracking while rows are appended
#[derive(Debug, Clone, Copy, PartialEq)]
enum BaselineState {
    AwaitingBaseline,
    Accumulating { baseline_elapsed: f64 },
}

/// Builds the comparison table of one optimized scenario
pub struct ComparisonTableBuilder<'a> {
    summaries: &'a SummaryIndex,
    defaults: &'a DefaultRows,
}

impl<'a> ComparisonTableBuilder<'a> {
    pub fn new(summaries: &'a SummaryIndex, defaults: &'a DefaultRows) -> Self {
        Self {
            summaries,
            defaults,
        }
    }

    /// Build the table of `group`.
    ///
    /// Files without a summary (skipped earlier) are left out. Rows are
    /// ordered serial first, then by thread count, regardless of how the
    /// file names sort.
    ///
    /// # Errors
    ///
    /// - [`EvalError::MissingDefault`] if no default row exists for the size
    /// - [`EvalError::MixedScenario`] if a file has another size or opt level
    /// - [`EvalError::MissingBaseline`] if a parallel run has no serial run
    ///   before it
    /// - [`EvalError::ZeroElapsed`] if a parallel run has a zero total time
    #[instrument(skip(self, group), fields(scenario = %group.directory.display()))]
    pub fn build(&self, group: &ScenarioGroup) -> Result<ComparisonTable> {
        let mut files: Vec<(&InputFile, &FileSummary)> = group
            .files
            .iter()
            .filter_map(|f| self.summaries.get(&f.path).map(|s| (f, s)))
            .collect();
        files.sort_by(|(a, _), (b, _)| row_order(a).cmp(&row_order(b)));

        // Size and opt level of the scenario come from its first usable file
        let (size, opt_level) = match files.first() {
            Some((file, _)) => (file.descriptor.size, file.descriptor.opt_level),
            // Nothing usable left, so certainly no serial run
            None => {
                return Err(EvalError::MissingBaseline {
                    scenario: group.directory.clone(),
                    file: group.directory.clone(),
                })
            }
        };

        let default_row = self
            .defaults
            .get(size)
            .ok_or_else(|| EvalError::MissingDefault {
                scenario: group.directory.clone(),
                size,
            })?;

        let mut rows = Vec::with_capacity(files.len() + 1);
        rows.push(default_row.clone());

        let mut state = BaselineState::AwaitingBaseline;
        for (file, summary) in files {
            let desc = &file.descriptor;
            if desc.size != size || desc.opt_level != opt_level {
                return Err(EvalError::MixedScenario {
                    scenario: group.directory.clone(),
                    file: file.path.clone(),
                    size: desc.size,
                    opt_level: desc.opt_level,
                });
            }

            let row = if desc.is_serial() {
                state = BaselineState::Accumulating {
                    baseline_elapsed: summary.time_elapsed,
                };
                TableRow::serial(desc, summary)
            } else {
                let baseline_elapsed = match state {
                    BaselineState::Accumulating { baseline_elapsed } => baseline_elapsed,
                    BaselineState::AwaitingBaseline => {
                        return Err(EvalError::MissingBaseline {
                            scenario: group.directory.clone(),
                            file: file.path.clone(),
                        })
                    }
                };
                if summary.time_elapsed == 0.0 {
                    return Err(EvalError::ZeroElapsed {
                        file: file.path.clone(),
                    });
                }
                TableRow::parallel(desc, summary, baseline_elapsed)
            };
            rows.push(row);
        }

        debug!(rows = rows.len(), "Comparison table built");
        Ok(ComparisonTable {
            directory: group.directory.clone(),
            rows,
        })
    }
}

/// Serial runs first, then increasing thread count.
fn row_order(file: &InputFile) -> (bool, u32, &Path) {
    (
        !file.descriptor.is_serial(),
        file.descriptor.thread_count,
        file.path.as_path(),
    )
}
