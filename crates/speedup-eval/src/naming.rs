//! Decoding of measurement file names
//!
//! Every measurement file is named after the configuration it was produced
//! with: `S<size>_T<threads>_O<opt>.csv`, e.g. `S100000000_T8_O2.csv`.
//! A thread count of zero marks a serial run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EvalError, Result};

/// Configuration of a single measurement file, decoded from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Problem size (number of elements sorted)
    pub size: u64,
    /// Number of threads; zero for a serial run
    pub thread_count: u32,
    /// Compiler optimization level
    pub opt_level: u32,
}

/// Which kind of scenario directory a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Unoptimized build; holds the single default run of a problem size
    Default,
    /// Build with the given optimization level (> 0)
    Optimized(u32),
}

impl FileDescriptor {
    pub fn new(size: u64, thread_count: u32, opt_level: u32) -> Self {
        Self {
            size,
            thread_count,
            opt_level,
        }
    }

    /// Serial runs are recorded with zero threads.
    pub fn is_serial(&self) -> bool {
        self.thread_count == 0
    }

    pub fn scenario_kind(&self) -> ScenarioKind {
        match self.opt_level {
            0 => ScenarioKind::Default,
            level => ScenarioKind::Optimized(level),
        }
    }

    /// Decode the descriptor from a path's base name.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MalformedName`] if one of the `S`, `T` or `O`
    /// markers (or the separator closing its field) is missing, or if a
    /// field is not an unsigned integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use speedup_eval::naming::FileDescriptor;
    ///
    /// let desc = FileDescriptor::from_path("out/opt_2/S5000_T4_O2.csv").unwrap();
    /// assert_eq!(desc.size, 5000);
    /// assert_eq!(desc.thread_count, 4);
    /// assert_eq!(desc.opt_level, 2);
    /// assert!(!desc.is_serial());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_file_name(&name)
    }

    /// Decode the descriptor from a bare file name.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let size = field(name, 'S', '_')?;
        let thread_count = narrow(name, 'T', field(name, 'T', '_')?)?;
        let opt_level = narrow(name, 'O', field(name, 'O', '.')?)?;

        Ok(Self::new(size, thread_count, opt_level))
    }
}

/// Extract the integer between the first `marker` and the next `terminator`.
fn field(name: &str, marker: char, terminator: char) -> Result<u64> {
    let malformed = |reason: String| EvalError::MalformedName {
        name: name.to_string(),
        reason,
    };

    let start = name
        .find(marker)
        .ok_or_else(|| malformed(format!("missing '{}' marker", marker)))?
        + marker.len_utf8();
    let len = name[start..]
        .find(terminator)
        .ok_or_else(|| malformed(format!("missing '{}' after '{}' field", terminator, marker)))?;
    let digits = &name[start..start + len];

    digits
        .parse::<u64>()
        .map_err(|_| malformed(format!("'{}' field is not an integer: '{}'", marker, digits)))
}

fn narrow(name: &str, marker: char, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| EvalError::MalformedName {
        name: name.to_string(),
        reason: format!("'{}' field out of range: {}", marker, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_serial_default() {
        let desc = FileDescriptor::from_file_name("S1000_T0_O0.csv").unwrap();
        assert_eq!(desc, FileDescriptor::new(1000, 0, 0));
        assert!(desc.is_serial());
        assert_eq!(desc.scenario_kind(), ScenarioKind::Default);
    }

    #[test]
    fn test_decode_parallel_optimized() {
        let desc = FileDescriptor::from_file_name("S250000_T16_O3.csv").unwrap();
        assert_eq!(desc.size, 250_000);
        assert_eq!(desc.thread_count, 16);
        assert_eq!(desc.opt_level, 3);
        assert!(!desc.is_serial());
        assert_eq!(desc.scenario_kind(), ScenarioKind::Optimized(3));
    }

    #[test]
    fn test_decode_uses_base_name_only() {
        let desc = FileDescriptor::from_path("TIMES/S_out/opt_1/S42_T2_O1.csv");
        // Directory components containing markers must not be consulted
        assert_eq!(desc.unwrap(), FileDescriptor::new(42, 2, 1));
    }

    #[test]
    fn test_decode_missing_marker() {
        let err = FileDescriptor::from_file_name("foo.csv").unwrap_err();
        match err {
            EvalError::MalformedName { name, reason } => {
                assert_eq!(name, "foo.csv");
                assert!(reason.contains("'S'"));
            }
            other => panic!("Expected MalformedName, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_threads() {
        let err = FileDescriptor::from_file_name("S1000_O1.csv").unwrap_err();
        assert!(matches!(err, EvalError::MalformedName { .. }));
    }

    #[test]
    fn test_decode_non_integer_field() {
        let err = FileDescriptor::from_file_name("S1k_T2_O1.csv").unwrap_err();
        match err {
            EvalError::MalformedName { reason, .. } => assert!(reason.contains("1k")),
            other => panic!("Expected MalformedName, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_extension_dot() {
        let err = FileDescriptor::from_file_name("S10_T2_O1").unwrap_err();
        assert!(matches!(err, EvalError::MalformedName { .. }));
    }

    #[test]
    fn test_decode_empty_name() {
        assert!(FileDescriptor::from_path("").is_err());
    }

    #[test]
    fn test_serial_invariant_holds_by_construction() {
        for threads in [0, 1, 2, 64] {
            let desc = FileDescriptor::new(10, threads, 1);
            assert_eq!(desc.is_serial(), threads == 0);
        }
    }
}
