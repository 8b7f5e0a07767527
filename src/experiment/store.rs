//! Result Store - append-only CSV results files
//!
//! **Append-Only Write Pattern**:
//! - The first write creates the file (and its parent directories) with a header
//! - Every later write appends rows without a header
//! - Existing files are never truncated, rewritten, validated or deduplicated
//! - One writer per path; concurrent writers are not supported
//!
//! The first physical column is an implicit 0-based row index with an empty
//! header cell. [`ResultsParser`](super::ResultsParser) strips it again.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::ResultRow;
use crate::{Error, Result};

/// Outcome of a [`ResultStore::append`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file did not exist and was created with a header.
    Created {
        /// File written
        path: PathBuf,
        /// Rows written
        rows: usize,
    },
    /// The file existed and rows were appended to it.
    Appended {
        /// File written
        path: PathBuf,
        /// Rows written
        rows: usize,
    },
}

impl WriteStatus {
    /// Check whether this write created the file.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// Path that was written.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Created { path, .. } | Self::Appended { path, .. } => path,
        }
    }

    /// Number of rows written.
    #[must_use]
    pub const fn rows(&self) -> usize {
        match self {
            Self::Created { rows, .. } | Self::Appended { rows, .. } => *rows,
        }
    }

    /// Operator-facing status message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { path, .. } => write!(
                f,
                "Creating file '{}' and writing results to it",
                path.display()
            ),
            Self::Appended { path, .. } => write!(
                f,
                "File '{}' already exists, appending results to it",
                path.display()
            ),
        }
    }
}

/// Writer for append-only results files.
#[derive(Debug, Clone, Copy)]
pub struct ResultStore {
    delimiter: u8,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl ResultStore {
    /// Create a comma-separated store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Append rows to `path`, creating it if needed.
    ///
    /// The header comes from the first row's columns and is only written
    /// when the file is created. Keeping the schema consistent across
    /// appends is the caller's responsibility.
    ///
    /// The batch is encoded in memory and written with a single call, so
    /// a rejected batch leaves the file untouched and a failed create
    /// leaves no file behind.
    ///
    /// # Errors
    ///
    /// Returns error if `rows` is empty, rows in one call differ in their
    /// columns, or the file or its parent directory cannot be written
    pub fn append(&self, rows: &[ResultRow], path: impl AsRef<Path>) -> Result<WriteStatus> {
        let path = path.as_ref();
        let Some(first) = rows.first() else {
            return Err(Error::InvalidInput(format!(
                "no rows to write to '{}'",
                path.display()
            )));
        };
        if let Some(pos) = rows
            .iter()
            .position(|row| !row.column_names().eq(first.column_names()))
        {
            return Err(Error::InvalidInput(format!(
                "row {pos} of the batch for '{}' has different columns than row 0",
                path.display()
            )));
        }

        let status = if path.exists() {
            let bytes = self.encode(rows, false)?;
            OpenOptions::new().append(true).open(path)?.write_all(&bytes)?;
            WriteStatus::Appended {
                path: path.to_path_buf(),
                rows: rows.len(),
            }
        } else {
            let bytes = self.encode(rows, true)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
            if let Err(e) = file.write_all(&bytes).and_then(|()| file.sync_all()) {
                drop(file);
                let _ = fs::remove_file(path);
                return Err(e.into());
            }
            WriteStatus::Created {
                path: path.to_path_buf(),
                rows: rows.len(),
            }
        };

        info!("{status}");
        Ok(status)
    }

    /// Append a single row. See [`append`](Self::append).
    ///
    /// # Errors
    ///
    /// Returns error if the file or its parent directory cannot be written
    pub fn append_row(&self, row: &ResultRow, path: impl AsRef<Path>) -> Result<WriteStatus> {
        self.append(std::slice::from_ref(row), path)
    }

    fn encode(&self, rows: &[ResultRow], header: bool) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        if header {
            let mut record = vec![String::new()];
            record.extend(rows[0].column_names().map(str::to_string));
            writer.write_record(&record)?;
        }

        for (index, row) in rows.iter().enumerate() {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(index.to_string());
            record.extend(row.cells().map(|cell| cell.map(ToString::to_string).unwrap_or_default()));
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Io(std::io::Error::new(e.error().kind(), e.to_string())))
    }
}
