//! Recording a finished run end to end

use std::path::Path;

use tracing::debug;

use crate::config::{ReportSettings, RunConfig};
use crate::experiment::{
    HistorySummarizer, MetricLog, ResultRow, ResultRowBuilder, ResultStore, RunMetadata,
    WriteStatus,
};
use crate::Result;

/// Summarizes a run, builds its row and appends it to a results file.
#[derive(Debug, Clone, Default)]
pub struct RunRecorder {
    summarizer: HistorySummarizer,
    builder: ResultRowBuilder,
    store: ResultStore,
}

impl RunRecorder {
    /// Create a recorder from its parts.
    #[must_use]
    pub const fn new(summarizer: HistorySummarizer, builder: ResultRowBuilder, store: ResultStore) -> Self {
        Self {
            summarizer,
            builder,
            store,
        }
    }

    /// Create a recorder from report settings.
    #[must_use]
    pub fn from_settings(settings: &ReportSettings) -> Self {
        Self::new(settings.summarizer(), settings.row_builder(), ResultStore::new())
    }

    /// Build the result row without persisting it.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration cannot be serialized
    pub fn row(&self, log: &MetricLog, config: &RunConfig, meta: &RunMetadata) -> Result<ResultRow> {
        let summary = self.summarizer.summarize(log);
        self.builder.build(log, &summary, config, meta)
    }

    /// Build the result row and append it to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the row cannot be built or the file cannot be written
    pub fn record(
        &self,
        path: impl AsRef<Path>,
        log: &MetricLog,
        config: &RunConfig,
        meta: &RunMetadata,
    ) -> Result<WriteStatus> {
        let row = self.row(log, config, meta)?;
        debug!(trait_name = meta.trait_name(), columns = row.len(), "recording run");
        self.store.append_row(&row, path)
    }
}
