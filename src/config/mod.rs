//! Run and model configuration
//!
//! - [`RunConfig`]: ordered hyperparameter mapping persisted with each result
//! - [`ModelConfig`]: typed network configuration with defaults and validation
//! - [`ReportSettings`]: where results are written and how they are summarized

mod model;
mod run_config;
mod settings;
pub(crate) mod value;

pub use model::{Layer, ModelConfig, ModelConfigBuilder, Padding};
pub use run_config::RunConfig;
pub use settings::ReportSettings;
pub use value::ConfigValue;
