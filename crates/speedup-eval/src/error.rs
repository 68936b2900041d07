//! Error types for measurement evaluation
//!
//! How far an error reaches depends on the stage that raises it:
//!
//! - Decoding and summarizing a file (`MalformedName`, `MissingColumn`,
//!   `EmptyInput`, `InvalidSample`, and `Csv` while reading) skip that file.
//! - Resolving defaults and building a table (`InvalidDefault`,
//!   `MissingDefault`, `MissingBaseline`, `MixedScenario`, `ZeroElapsed`)
//!   abandon that scenario's table.
//! - Writing a scenario's artifacts (`Csv` and `Io` while writing, `Chart`)
//!   marks that scenario failed.
//! - `NoInputFiles` and a `Walk` failure on the root abort the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Malformed file name '{name}': {reason}")]
    MalformedName { name: String, reason: String },

    #[error("Missing column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("No data rows in {}", path.display())]
    EmptyInput { path: PathBuf },

    #[error("Invalid value '{value}' for column '{column}' at line {line} of {}", path.display())]
    InvalidSample {
        path: PathBuf,
        column: String,
        line: u64,
        value: String,
    },

    #[error("No serial baseline precedes parallel run {} in scenario {}", file.display(), scenario.display())]
    MissingBaseline { scenario: PathBuf, file: PathBuf },

    #[error("No default measurement for size {size} (needed by scenario {})", scenario.display())]
    MissingDefault { scenario: PathBuf, size: u64 },

    #[error("Invalid default scenario {}: {reason}", scenario.display())]
    InvalidDefault { scenario: PathBuf, reason: String },

    #[error("File {} does not belong to scenario {} (size {size}, opt level {opt_level})", file.display(), scenario.display())]
    MixedScenario {
        scenario: PathBuf,
        file: PathBuf,
        size: u64,
        opt_level: u32,
    },

    #[error("Parallel run {} has a zero total time; speedup is undefined", file.display())]
    ZeroElapsed { file: PathBuf },

    #[error("No input files found under {}", root.display())]
    NoInputFiles { root: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to render chart {}: {message}", path.display())]
    Chart { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_paths() {
        let err = EvalError::MissingColumn {
            path: PathBuf::from("opt_1/S10_T0_O1.csv"),
            column: "time_sort".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("time_sort"));
        assert!(message.contains("opt_1/S10_T0_O1.csv"));
    }
}
