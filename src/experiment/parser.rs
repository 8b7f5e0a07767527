//! Results Parser - expands the embedded `config` column for analysis
//!
//! Historic results files mix rows written by different versions of the
//! training scripts, so the decoded configurations do not share one key set.
//! Columns are built from the union of keys, and each row looks its values
//! up by key. A row that lacks a key gets a missing cell in that column.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use super::result_row::CONFIG_COLUMN;
use crate::config::RunConfig;
use crate::{Error, Result};

/// Separator for sequence-valued hyperparameters in expanded cells.
const SEQUENCE_SEPARATOR: &str = "_";

/// Reads a results file written by [`ResultStore`](super::ResultStore).
#[derive(Debug, Clone)]
pub struct ResultsParser {
    config_column: String,
    delimiter: u8,
}

impl Default for ResultsParser {
    fn default() -> Self {
        Self {
            config_column: CONFIG_COLUMN.to_string(),
            delimiter: b',',
        }
    }
}

impl ResultsParser {
    /// Create a parser for comma-separated files with a `config` column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the serialized configuration from a differently named column.
    #[must_use]
    pub fn with_config_column(mut self, column: impl Into<String>) -> Self {
        self.config_column = column.into();
        self
    }

    /// Use a different field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse a results file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, has no config column, or
    /// any row's config is malformed
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<ResultsTable> {
        let path = path.as_ref();
        info!(
            "Reading file '{}' from folder '{}'",
            path.file_name().unwrap_or_default().to_string_lossy(),
            path.parent().unwrap_or_else(|| Path::new("")).display()
        );
        self.parse_reader(File::open(path)?)
    }

    /// Parse results from any reader.
    ///
    /// The first physical column (the row index) is dropped. Non-config
    /// columns keep their order; one column per configuration key follows,
    /// in first-seen order. Keys that clash with an existing column are not
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not valid CSV, has no config column, or
    /// any row's config is malformed
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ResultsTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().skip(1).map(str::to_string).collect();
        let config_idx = headers
            .iter()
            .position(|h| *h == self.config_column)
            .ok_or_else(|| Error::MissingColumn(self.config_column.clone()))?;

        let mut columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != config_idx)
            .map(|(_, h)| h.clone())
            .collect();

        let mut base_rows = Vec::new();
        let mut configs = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let cells: Vec<&str> = record.iter().skip(1).collect();

            configs.push(decode_config(cells.get(config_idx).copied().unwrap_or(""), row)?);
            base_rows.push(
                cells
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != config_idx)
                    .map(|(_, cell)| non_empty(cell))
                    .collect::<Vec<_>>(),
            );
        }
        debug!(rows = base_rows.len(), "decoded config column");

        let config_keys: Vec<String> = {
            let mut seen: HashSet<&str> = columns.iter().map(String::as_str).collect();
            let mut keys = Vec::new();
            for config in &configs {
                for key in config.keys() {
                    if seen.insert(key) {
                        keys.push(key.to_string());
                    }
                }
            }
            keys
        };
        info!(new_columns = config_keys.len(), "populating config columns");

        let rows = base_rows
            .into_iter()
            .zip(&configs)
            .map(|(mut row, config)| {
                row.extend(
                    config_keys
                        .iter()
                        .map(|key| config.get(key).map(|v| v.joined(SEQUENCE_SEPARATOR))),
                );
                row
            })
            .collect();

        columns.extend(config_keys);
        Ok(ResultsTable { columns, rows })
    }
}

fn decode_config(text: &str, row: usize) -> Result<RunConfig> {
    if text.trim().is_empty() {
        return Ok(RunConfig::new());
    }
    serde_json::from_str(text).map_err(|e| Error::ConfigDecode {
        row,
        message: e.to_string(),
    })
}

fn non_empty(cell: &str) -> Option<String> {
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Column-named table of optional text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl ResultsTable {
    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, each aligned with [`columns`](Self::columns).
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Index of a column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// A single cell. Returns `None` for unknown columns and missing cells.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Mean of `value` per distinct `by`, groups in first-seen order.
    ///
    /// Rows with a missing `by` cell are skipped, as are `value` cells that
    /// are missing or not numeric. A group with no numeric value has a NaN
    /// mean.
    ///
    /// # Errors
    ///
    /// Returns error if either column does not exist
    #[allow(clippy::cast_precision_loss)]
    pub fn group_mean(&self, by: &str, value: &str) -> Result<Vec<(String, f64)>> {
        let by_idx = self
            .column_index(by)
            .ok_or_else(|| Error::MissingColumn(by.to_string()))?;
        let value_idx = self
            .column_index(value)
            .ok_or_else(|| Error::MissingColumn(value.to_string()))?;

        let mut groups: Vec<(String, f64, usize)> = Vec::new();
        for row in &self.rows {
            let Some(key) = row[by_idx].as_deref() else {
                continue;
            };
            let slot = match groups.iter().position(|(k, _, _)| k == key) {
                Some(pos) => pos,
                None => {
                    groups.push((key.to_string(), 0.0, 0));
                    groups.len() - 1
                }
            };
            if let Some(v) = row[value_idx].as_deref().and_then(|v| v.parse::<f64>().ok()) {
                if !v.is_nan() {
                    groups[slot].1 += v;
                    groups[slot].2 += 1;
                }
            }
        }

        Ok(groups
            .into_iter()
            .map(|(key, sum, count)| {
                let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
                (key, mean)
            })
            .collect())
    }

    /// Write the table as CSV with a header and no index column.
    ///
    /// # Errors
    ///
    /// Returns error if writing fails
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;
        Ok(())
    }
}
