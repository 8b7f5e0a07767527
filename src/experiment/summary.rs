//! History summarization - one aggregate row per run

use tracing::debug;

use super::MetricLog;

/// Default trailing window: the five epochs before the last one.
pub const DEFAULT_WINDOW: usize = 5;

/// Reduces a [`MetricLog`] to the mean of each metric over a trailing window.
///
/// The window covers epochs `max(0, N - W - 1) ..= N - 2`: the `W` epochs
/// before the final one. The final epoch is left out. Short runs shrink
/// the window instead of failing; a single-epoch run has an empty window and
/// every metric summarizes to NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySummarizer {
    window: usize,
}

impl Default for HistorySummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl HistorySummarizer {
    /// Create a summarizer averaging over `window` epochs.
    #[must_use]
    pub const fn new(window: usize) -> Self {
        Self { window }
    }

    /// Configured window size.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Epoch index range averaged for a log of `n_epochs` epochs.
    #[must_use]
    pub const fn window_range(&self, n_epochs: usize) -> std::ops::Range<usize> {
        let end = n_epochs.saturating_sub(1);
        let start = n_epochs.saturating_sub(self.window.saturating_add(1));
        start..end
    }

    /// Average every metric of `log` over the window.
    #[must_use]
    pub fn summarize(&self, log: &MetricLog) -> MetricSummary {
        let range = self.window_range(log.n_epochs());
        debug!(
            n_epochs = log.n_epochs(),
            start = range.start,
            end = range.end,
            "summarizing metric log"
        );

        let entries = log
            .iter()
            .map(|(name, values)| (name.to_string(), mean(&values[range.clone()])))
            .collect();

        MetricSummary { entries }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Windowed mean of every metric, in log order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    entries: Vec<(String, f64)>,
}

impl MetricSummary {
    /// Summarized value of a metric.
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, value)| *value)
    }

    /// Iterate over `(metric, mean)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of summarized metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no metric was summarized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_range() {
        let summarizer = HistorySummarizer::new(6);
        assert_eq!(summarizer.window_range(10), 3..9);
        assert_eq!(summarizer.window_range(4), 0..3);
        assert_eq!(summarizer.window_range(1), 0..0);
    }

    #[test]
    fn test_default_window_matches_trailing_five() {
        let summarizer = HistorySummarizer::default();
        assert_eq!(summarizer.window_range(20), 14..19);
    }

    #[test]
    fn test_summarize_excludes_last_epoch() {
        let log = MetricLog::from_series([("loss", vec![4.0, 3.0, 2.0, 100.0])]).unwrap();
        let summary = HistorySummarizer::new(2).summarize(&log);
        assert!((summary.get("loss").unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_epoch_is_nan() {
        let log = MetricLog::from_series([("loss", vec![0.3]), ("val_loss", vec![0.4])]).unwrap();
        let summary = HistorySummarizer::new(6).summarize(&log);
        assert_eq!(summary.len(), 2);
        assert!(summary.get("loss").unwrap().is_nan());
        assert!(summary.get("val_loss").unwrap().is_nan());
    }

    #[test]
    fn test_huge_window_covers_whole_log() {
        let summarizer = HistorySummarizer::new(usize::MAX);
        assert_eq!(summarizer.window_range(4), 0..3);

        let log = MetricLog::from_series([("loss", vec![4.0, 3.0, 2.0, 100.0])]).unwrap();
        let summary = summarizer.summarize(&log);
        assert!((summary.get("loss").unwrap() - 3.0).abs() < 1e-12);
    }
}
