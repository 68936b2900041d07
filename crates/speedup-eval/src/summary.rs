//! Per-file reduction of repeated trials
//!
//! Each measurement file holds one row per trial. The two timing components
//! are reduced independently with [`robust_mean`]; the total is derived as
//! their rounded sum so that `init + sort == total` holds in every table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::InputConfig;
use crate::error::{EvalError, Result};
use crate::stats::{robust_mean, round5};

/// Robust timings of one measurement file, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub time_init: f64,
    pub time_sort: f64,
    /// Always `round5(time_init + time_sort)`
    pub time_elapsed: f64,
    /// Number of trials read from the file
    pub trials: usize,
}

impl FileSummary {
    /// Build a summary from the two component means.
    pub fn from_components(time_init: f64, time_sort: f64, trials: usize) -> Self {
        Self {
            time_init,
            time_sort,
            time_elapsed: round5(time_init + time_sort),
            trials,
        }
    }
}

/// Raw trial columns read from one file
#[derive(Debug, Clone, Default)]
pub struct TrialColumns {
    pub time_init: Vec<f64>,
    pub time_sort: Vec<f64>,
}

/// Reads measurement files and reduces them to [`FileSummary`] values
#[derive(Debug, Clone)]
pub struct MeasurementSummarizer {
    input: InputConfig,
}

impl MeasurementSummarizer {
    pub fn new(input: InputConfig) -> Self {
        Self { input }
    }

    /// Read and summarize one measurement file.
    ///
    /// # Errors
    ///
    /// - [`EvalError::Csv`] if the file cannot be opened or parsed
    /// - [`EvalError::MissingColumn`] if a timing column is absent
    /// - [`EvalError::EmptyInput`] if the file has no data rows
    /// - [`EvalError::InvalidSample`] if a timing cell is not a number
    pub fn summarize_file(&self, path: &Path) -> Result<FileSummary> {
        let columns = self.read_columns(path)?;
        let summary = Self::summarize(&columns, path)?;
        debug!(
            path = %path.display(),
            time_init = summary.time_init,
            time_sort = summary.time_sort,
            time_elapsed = summary.time_elapsed,
            "Summarized measurement file"
        );
        Ok(summary)
    }

    /// Reduce already-read columns.
    pub fn summarize(columns: &TrialColumns, path: &Path) -> Result<FileSummary> {
        let empty = || EvalError::EmptyInput {
            path: path.to_path_buf(),
        };
        let time_init = robust_mean(&columns.time_init).ok_or_else(empty)?;
        let time_sort = robust_mean(&columns.time_sort).ok_or_else(empty)?;

        Ok(FileSummary::from_components(
            time_init,
            time_sort,
            columns.time_init.len(),
        ))
    }

    /// Read the two timing columns of a measurement file.
    pub fn read_columns(&self, path: &Path) -> Result<TrialColumns> {
        let csv_err = |source| EvalError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.input.delimiter_byte())
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        let column_index = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| EvalError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };
        let init_idx = column_index(&self.input.init_column)?;
        let sort_idx = column_index(&self.input.sort_column)?;

        let mut columns = TrialColumns::default();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            columns
                .time_init
                .push(parse_cell(&record, init_idx, &self.input.init_column, line, path)?);
            columns
                .time_sort
                .push(parse_cell(&record, sort_idx, &self.input.sort_column, line, path)?);
        }

        if columns.time_init.is_empty() {
            return Err(EvalError::EmptyInput {
                path: path.to_path_buf(),
            });
        }

        Ok(columns)
    }
}

fn parse_cell(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    line: u64,
    path: &Path,
) -> Result<f64> {
    let value = record.get(index).unwrap_or_default();
    value.parse::<f64>().map_err(|_| EvalError::InvalidSample {
        path: path.to_path_buf(),
        column: column.to_string(),
        line,
        value: value.to_string(),
    })
}

/// Immutable lookup from measurement file to its summary.
///
/// Built once before any table is assembled and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct SummaryIndex {
    summaries: BTreeMap<PathBuf, FileSummary>,
}

impl SummaryIndex {
    /// Summarize every file, collecting per-file failures instead of aborting.
    pub fn build<'a, I>(
        summarizer: &MeasurementSummarizer,
        files: I,
    ) -> (Self, Vec<(PathBuf, EvalError)>)
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        let mut summaries = BTreeMap::new();
        let mut failures = Vec::new();

        for path in files {
            match summarizer.summarize_file(path) {
                Ok(summary) => {
                    summaries.insert(path.clone(), summary);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    failures.push((path.clone(), e));
                }
            }
        }

        (Self { summaries }, failures)
    }

    pub fn get(&self, path: &Path) -> Option<&FileSummary> {
        self.summaries.get(path)
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

impl FromIterator<(PathBuf, FileSummary)> for SummaryIndex {
    fn from_iter<T: IntoIterator<Item = (PathBuf, FileSummary)>>(iter: T) -> Self {
        Self {
            summaries: iter.into_iter().collect(),
        }
    }
}
