//! Speedup evaluation for parallel sorting benchmarks
//!
//! This crate post-processes the timing files produced by a sorting
//! benchmark and compares serial and parallel runs of the same problem.
//!
//! # Features
//!
//! - **Robust means**: each timing column is reduced by a normal fit, a
//!   one-sigma trim and a refit, rounded to 5 decimal places
//! - **Comparison tables**: default, serial and parallel rows per scenario,
//!   with speedup and efficiency relative to the serial run
//! - **Charts**: speedup (against the ideal linear speedup) and efficiency
//!   over the thread count
//! - **Run reports**: Console and JSON summaries of what was evaluated
//!
//! # Input layout
//!
//! Measurement files are named `S<size>_T<threads>_O<opt>.csv`, one file per
//! run, one row per trial. Files of one scenario share a directory; the
//! directory of the unoptimized build (`O0`) holds the single serial run
//! every table of that size starts with:
//!
//! ```text
//! measures/
//! └── size1000/
//!     ├── opt_0/S1000_T0_O0.csv
//!     ├── opt_1/S1000_T0_O1.csv
//!     ├── opt_1/S1000_T2_O1.csv
//!     └── opt_1/S1000_T4_O1.csv
//! ```
//!
//! # Example
//!
//! ```no_run
//! use speedup_eval::{Config, Evaluator, reporter::{OutputFormat, Reporter}};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let evaluator = Evaluator::new(Config::default());
//! let report = evaluator.run(Path::new("measures"))?;
//!
//! Reporter::new(OutputFormat::Console).report(&report)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod evaluator;
pub mod naming;
pub mod reporter;
pub mod stats;
pub mod summary;
pub mod table;

// Re-export main types for convenience
pub use config::Config;
pub use error::{EvalError, Result};
pub use evaluator::{EvaluationReport, Evaluator, ScenarioOutcome, ScenarioStatus};
pub use naming::{FileDescriptor, ScenarioKind};
pub use reporter::{OutputFormat, Reporter};
pub use summary::{FileSummary, MeasurementSummarizer, SummaryIndex};
pub use table::{ComparisonTable, ComparisonTableBuilder, DefaultRows, TableRow};
