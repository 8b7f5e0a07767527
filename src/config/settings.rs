//! Report settings - where results go and how runs are summarized

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::experiment::{HistorySummarizer, Layout, ResultRowBuilder, DEFAULT_WINDOW};
use crate::naming::{ConfigNamer, DEFAULT_EXCLUSIONS};
use crate::{Error, Result};

/// Settings shared by every run of an experiment.
///
/// Every field has a default, so a settings file only lists what differs:
///
/// ```json
/// { "results_dir": "results/cattle", "window": 6, "layout": "wide" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory holding one results file per trait.
    pub results_dir: PathBuf,
    /// Trailing epochs averaged by the summarizer.
    pub window: usize,
    /// Hyperparameter layout of result rows.
    pub layout: Layout,
    /// Extension of generated per-run file names.
    pub name_extension: String,
    /// Hyperparameters left out of generated file names.
    pub name_exclusions: Vec<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            window: DEFAULT_WINDOW,
            layout: Layout::Embedded,
            name_extension: "png".to_string(),
            name_exclusions: DEFAULT_EXCLUSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ReportSettings {
    /// Load settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid settings JSON
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check field ranges.
    ///
    /// # Errors
    ///
    /// Returns error if the window is zero or the extension is empty
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::InvalidInput(
                "window must cover at least one epoch".to_string(),
            ));
        }
        if self.name_extension.is_empty() {
            return Err(Error::InvalidInput(
                "name_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Results file for a trait: `<results_dir>/<trait>.csv`.
    #[must_use]
    pub fn results_path(&self, trait_name: &str) -> PathBuf {
        self.results_dir.join(format!("{trait_name}.csv"))
    }

    /// Summarizer using the configured window.
    #[must_use]
    pub const fn summarizer(&self) -> HistorySummarizer {
        HistorySummarizer::new(self.window)
    }

    /// Row builder using the configured layout.
    #[must_use]
    pub const fn row_builder(&self) -> ResultRowBuilder {
        ResultRowBuilder::new(self.layout)
    }

    /// File namer using the configured extension and exclusions.
    #[must_use]
    pub fn namer(&self) -> ConfigNamer {
        ConfigNamer::new(self.name_extension.clone()).with_exclusions(self.name_exclusions.clone())
    }
}
