//! # breeding-results: Results Aggregation for Genomic-Prediction Runs
//!
//! Collects the outcome of deep-learning genomic-prediction runs (kinship
//! matrices in, phenotype predictions out) into append-only CSV results
//! files, and reads those files back for analysis.
//!
//! ## Design Principles
//!
//! - **Append-only**: results files are created once and only ever appended to
//! - **Deterministic order**: hyperparameters keep their declared order in
//!   file names, rows and serialized configs
//! - **Missing, not failing**: absent metrics or hyperparameters become
//!   missing cells; I/O and decode errors always propagate
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use breeding_results::config::{ModelConfig, ReportSettings};
//! use breeding_results::experiment::{MetricLog, ResultsParser, RunMetadata};
//! use breeding_results::pipeline::RunRecorder;
//!
//! let settings = ReportSettings::default();
//! let model = ModelConfig::builder((100, 100, 15)).build()?;
//! let log = MetricLog::from_series([
//!     ("loss", vec![0.9, 0.7, 0.6]),
//!     ("val_pearson", vec![0.2, 0.3, 0.35]),
//! ])?;
//! let meta = RunMetadata::new("milk_yield", 1200)
//!     .validation_split(0.2)
//!     .nparams(model.parameter_count()?)
//!     .replicate(1);
//!
//! let path = settings.results_path("milk_yield");
//! let status = RunRecorder::from_settings(&settings).record(&path, &log, &model.to_run_config(), &meta)?;
//! println!("{status}");
//!
//! let table = ResultsParser::new().parse(&path)?;
//! println!("{} runs recorded", table.num_rows());
//! # Ok::<(), breeding_results::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod naming;
pub mod pipeline;

pub use error::{Error, Result};
