//! Discovery of measurement files below a root directory.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::InputConfig;
use crate::error::{EvalError, Result};

/// Collect every measurement file under `root`, sorted by path.
///
/// A file qualifies when its extension matches and its name does not contain
/// the exclude marker (previously written tables live next to the inputs).
/// Unreadable entries below the root are logged and skipped; a root that
/// cannot be read is an error.
pub fn discover(root: &Path, input: &InputConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(EvalError::Walk {
                    path: root.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.file_type().is_file() && is_measurement(entry.path(), input) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(count = files.len(), root = %root.display(), "Discovered measurement files");
    Ok(files)
}

fn is_measurement(path: &Path, input: &InputConfig) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    let suffix = format!(".{}", input.extension);

    name.ends_with(&suffix) && !name.contains(input.exclude_marker.as_str())
}
