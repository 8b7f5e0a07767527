//! Result Row - the flat record persisted once per training run

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{MetricLog, MetricSummary};
use crate::config::value::format_float;
use crate::config::RunConfig;
use crate::Result;

/// Columns that open every row.
pub const LEADING_COLUMNS: [&str; 2] = ["trait", "sample_size"];

/// Run metadata and summary metric columns, after any wide hyperparameters.
pub const TRAILING_COLUMNS: [&str; 11] = [
    "validation_split",
    "n_epochs",
    "loss",
    "pearson",
    "rmse",
    "val_loss",
    "val_pearson",
    "val_rmse",
    "max_val_pearson",
    "nparams",
    "replicate",
];

/// Column holding the serialized [`RunConfig`] in the embedded layout.
pub const CONFIG_COLUMN: &str = "config";

/// Metric whose full-log maximum is reported as `max_val_pearson`.
const MAX_TRACKED_METRIC: &str = "val_pearson";

/// Separator for sequence-valued hyperparameters in wide cells.
const SEQUENCE_SEPARATOR: &str = "_";

/// How hyperparameters are laid out in a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One column per hyperparameter.
    Wide,
    /// A single trailing `config` column holding the configuration as JSON.
    #[default]
    Embedded,
}

/// A typed table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text
    Text(String),
    /// Integer
    Int(i64),
    /// Float; NaN is written as an empty field
    Float(f64),
}

impl CellValue {
    /// Numeric view of the cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(v) => v.parse().ok(),
        }
    }

    /// Text view of the cell, if it holds text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => f.write_str(v),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) if v.is_nan() => Ok(()),
            Self::Float(v) => f.write_str(&format_float(*v)),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// One flat record per training run, columns in canonical order.
///
/// A `None` cell is a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    cells: Vec<(String, Option<CellValue>)>,
}

impl ResultRow {
    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = Option<&CellValue>> {
        self.cells.iter().map(|(_, cell)| cell.as_ref())
    }

    /// Look up a cell. Returns `None` both for unknown and missing cells.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, cell)| cell.as_ref())
    }

    /// Check whether the row has a column, populated or not.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Run facts that do not come from the metric log or the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    trait_name: String,
    sample_size: usize,
    validation_split: Option<f64>,
    nparams: Option<u64>,
    replicate: Option<String>,
}

impl RunMetadata {
    /// Create metadata for a trait and the size of its phenotype set.
    #[must_use]
    pub fn new(trait_name: impl Into<String>, sample_size: usize) -> Self {
        Self {
            trait_name: trait_name.into(),
            sample_size,
            validation_split: None,
            nparams: None,
            replicate: None,
        }
    }

    /// Set the validation split fraction.
    #[must_use]
    pub const fn validation_split(mut self, split: f64) -> Self {
        self.validation_split = Some(split);
        self
    }

    /// Set the model parameter count.
    #[must_use]
    pub const fn nparams(mut self, nparams: u64) -> Self {
        self.nparams = Some(nparams);
        self
    }

    /// Set the replicate identifier.
    #[must_use]
    pub fn replicate(mut self, replicate: impl fmt::Display) -> Self {
        self.replicate = Some(replicate.to_string());
        self
    }

    /// Trait name.
    #[must_use]
    pub fn trait_name(&self) -> &str {
        &self.trait_name
    }

    /// Number of phenotyped samples of the trait.
    #[must_use]
    pub const fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Replicate identifier, if set.
    #[must_use]
    pub fn replicate_id(&self) -> Option<&str> {
        self.replicate.as_deref()
    }
}

/// Merges a run's summary, metadata and configuration into a [`ResultRow`].
#[derive(Debug, Clone, Default)]
pub struct ResultRowBuilder {
    layout: Layout,
    wide_columns: Option<Vec<String>>,
}

impl ResultRowBuilder {
    /// Create a builder for the given layout.
    #[must_use]
    pub const fn new(layout: Layout) -> Self {
        Self {
            layout,
            wide_columns: None,
        }
    }

    /// Fix the hyperparameter columns of the wide layout.
    ///
    /// Without this the wide columns follow the configuration's own keys.
    /// With it, every row carries exactly these columns and a key the
    /// configuration lacks becomes a missing cell.
    #[must_use]
    pub fn with_wide_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.wide_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Configured layout.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Canonical column order for a row built from `config`.
    ///
    /// Wide hyperparameter columns that share a name with a leading or
    /// trailing column are left out; the fixed column keeps its value.
    #[must_use]
    pub fn column_order(&self, config: &RunConfig) -> Vec<String> {
        let mut columns: Vec<String> = LEADING_COLUMNS.iter().map(ToString::to_string).collect();
        if self.layout == Layout::Wide {
            let keys: Vec<&str> = match &self.wide_columns {
                Some(fixed) => fixed.iter().map(String::as_str).collect(),
                None => config.keys().collect(),
            };
            for key in keys {
                if !is_fixed_column(key) && !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }
        columns.extend(TRAILING_COLUMNS.iter().map(ToString::to_string));
        if self.layout == Layout::Embedded {
            columns.push(CONFIG_COLUMN.to_string());
        }
        columns
    }

    /// Build the row.
    ///
    /// Cells are collected unordered, then reindexed to
    /// [`column_order`](Self::column_order). Columns with no value stay
    /// missing and summary metrics outside the canonical order are dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration cannot be serialized
    pub fn build(
        &self,
        log: &MetricLog,
        summary: &MetricSummary,
        config: &RunConfig,
        meta: &RunMetadata,
    ) -> Result<ResultRow> {
        let mut values: HashMap<String, CellValue> = HashMap::new();

        for (metric, mean) in summary.iter() {
            values.insert(metric.to_string(), CellValue::Float(mean));
        }
        if let Some(max) = log.max(MAX_TRACKED_METRIC) {
            values.insert("max_val_pearson".to_string(), CellValue::Float(max));
        }
        values.insert(
            "n_epochs".to_string(),
            CellValue::Int(i64::try_from(log.n_epochs()).unwrap_or(i64::MAX)),
        );
        values.insert(
            "sample_size".to_string(),
            CellValue::Int(i64::try_from(meta.sample_size).unwrap_or(i64::MAX)),
        );
        values.insert("trait".to_string(), CellValue::from(meta.trait_name.as_str()));
        if let Some(split) = meta.validation_split {
            values.insert("validation_split".to_string(), CellValue::Float(split));
        }
        if let Some(nparams) = meta.nparams {
            values.insert(
                "nparams".to_string(),
                CellValue::Int(i64::try_from(nparams).unwrap_or(i64::MAX)),
            );
        }
        if let Some(replicate) = &meta.replicate {
            values.insert("replicate".to_string(), CellValue::from(replicate.as_str()));
        }

        match self.layout {
            Layout::Wide => {
                for (key, value) in config.iter().filter(|(key, _)| !is_fixed_column(key)) {
                    values
                        .entry(key.to_string())
                        .or_insert_with(|| CellValue::Text(value.joined(SEQUENCE_SEPARATOR)));
                }
            }
            Layout::Embedded => {
                values.insert(CONFIG_COLUMN.to_string(), CellValue::Text(config.to_json()?));
            }
        }

        let cells = self
            .column_order(config)
            .into_iter()
            .map(|column| {
                let cell = values.remove(&column);
                (column, cell)
            })
            .collect();

        Ok(ResultRow { cells })
    }
}

fn is_fixed_column(name: &str) -> bool {
    LEADING_COLUMNS.contains(&name) || TRAILING_COLUMNS.contains(&name)
}
