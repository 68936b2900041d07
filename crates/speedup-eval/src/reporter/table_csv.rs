//! CSV serialization of comparison tables

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{EvalError, Result};
use crate::table::TableRow;

/// Writes `(fields, rows)` as a comma-separated file with CRLF line endings
#[derive(Debug, Clone)]
pub struct TableWriter {
    file_name: String,
}

impl TableWriter {
    /// Create a writer producing `file_name` inside each target directory
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Write the table into `directory`, returning the written path.
    pub fn write(&self, directory: &Path, fields: &[&str], rows: &[TableRow]) -> Result<PathBuf> {
        let path = directory.join(&self.file_name);

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_path(&path)
            .map_err(|source| EvalError::Csv {
                path: path.clone(),
                source,
            })?;
        write_rows(&mut writer, fields, rows, &path)?;

        Ok(path)
    }

    /// Render the table to a string without touching the filesystem.
    pub fn render(fields: &[&str], rows: &[TableRow]) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        write_rows(&mut writer, fields, rows, Path::new("<memory>"))?;

        let bytes = writer.into_inner().map_err(|e| EvalError::Io {
            path: PathBuf::from("<memory>"),
            source: e.into_error(),
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn write_rows<W: io::Write>(
    writer: &mut csv::Writer<W>,
    fields: &[&str],
    rows: &[TableRow],
    path: &Path,
) -> Result<()> {
    let csv_err = |source| EvalError::Csv {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record(fields).map_err(csv_err)?;
    for row in rows {
        writer.write_record(row.to_record()).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| EvalError::Io {
        path: path.to_path_buf(),
        source,
    })
}
