//! Experiment results pipeline
//!
//! Turns the output of one training run into a persisted results row, and
//! reads accumulated results files back for analysis.
//!
//! ## Data Flow
//!
//! ```text
//! MetricLog ──> HistorySummarizer ──> MetricSummary ─┐
//!     │                                              ├──> ResultRowBuilder ──> ResultRow
//!     └──────── max_val_pearson, n_epochs ───────────┤                            │
//! RunConfig + RunMetadata ───────────────────────────┘                            v
//!                                                           ResultStore (append-only CSV)
//!                                                                                 │
//!                                              ResultsTable <── ResultsParser <───┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use breeding_results::config::RunConfig;
//! use breeding_results::experiment::{
//!     HistorySummarizer, Layout, MetricLog, ResultRowBuilder, RunMetadata,
//! };
//!
//! let log = MetricLog::from_series([
//!     ("loss", vec![1.0, 0.8, 0.7, 0.65]),
//!     ("val_pearson", vec![0.2, 0.4, 0.5, 0.45]),
//! ])?;
//! let config = RunConfig::new().with("conv_layers", vec![32, 64]);
//! let meta = RunMetadata::new("milk_yield", 1200).replicate(1);
//!
//! let summary = HistorySummarizer::new(2).summarize(&log);
//! let row = ResultRowBuilder::new(Layout::Embedded).build(&log, &summary, &config, &meta)?;
//! assert_eq!(row.column_names().last(), Some("config"));
//! # Ok::<(), breeding_results::Error>(())
//! ```

mod metric_log;
mod parser;
mod result_row;
mod store;
mod summary;

pub use metric_log::MetricLog;
pub use parser::{ResultsParser, ResultsTable};
pub use result_row::{
    CellValue, Layout, ResultRow, ResultRowBuilder, RunMetadata, CONFIG_COLUMN, LEADING_COLUMNS,
    TRAILING_COLUMNS,
};
pub use store::{ResultStore, WriteStatus};
pub use summary::{HistorySummarizer, MetricSummary, DEFAULT_WINDOW};
