//! Metric Log - per-epoch training/validation metrics of one run

use crate::{Error, Result};

/// Per-epoch metric values produced by a training run.
///
/// Stored column-wise: one series per metric, all of equal length. Metric
/// order is the order in which the metrics were first declared.
///
/// ## Invariants
///
/// - At least one epoch
/// - Every epoch carries the same metric key set
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLog {
    series: Vec<(String, Vec<f64>)>,
}

impl MetricLog {
    /// Build a log from per-metric series, as a Keras-style history mapping.
    ///
    /// # Errors
    ///
    /// Returns error if no metric is given, a series is empty, series
    /// lengths differ, or a metric name repeats
    pub fn from_series<K, I>(series: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Vec<f64>)>,
    {
        let series: Vec<(String, Vec<f64>)> =
            series.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let Some((_, first)) = series.first() else {
            return Err(Error::InvalidInput(
                "metric log needs at least one metric".to_string(),
            ));
        };
        let n_epochs = first.len();
        if n_epochs == 0 {
            return Err(Error::InvalidInput(
                "metric log needs at least one epoch".to_string(),
            ));
        }

        for (idx, (name, values)) in series.iter().enumerate() {
            if values.len() != n_epochs {
                return Err(Error::InvalidInput(format!(
                    "metric '{name}' has {} epochs, expected {n_epochs}",
                    values.len()
                )));
            }
            if series[..idx].iter().any(|(other, _)| other == name) {
                return Err(Error::InvalidInput(format!(
                    "metric '{name}' appears more than once"
                )));
            }
        }

        Ok(Self { series })
    }

    /// Build a log from epoch records, one `(metric, value)` list per epoch.
    ///
    /// # Errors
    ///
    /// Returns error if there are no epochs or an epoch's key set differs
    /// from the first epoch's
    pub fn from_epochs<K, E, I>(epochs: I) -> Result<Self>
    where
        K: AsRef<str>,
        E: IntoIterator<Item = (K, f64)>,
        I: IntoIterator<Item = E>,
    {
        let mut series: Vec<(String, Vec<f64>)> = Vec::new();

        for (epoch, record) in epochs.into_iter().enumerate() {
            let record: Vec<(K, f64)> = record.into_iter().collect();
            if epoch == 0 {
                series = record
                    .iter()
                    .map(|(k, v)| (k.as_ref().to_string(), vec![*v]))
                    .collect();
                continue;
            }

            if record.len() != series.len() {
                return Err(Error::InvalidInput(format!(
                    "epoch {epoch} has {} metrics, expected {}",
                    record.len(),
                    series.len()
                )));
            }
            for (key, value) in &record {
                let (_, values) = series
                    .iter_mut()
                    .find(|(name, _)| name == key.as_ref())
                    .ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "epoch {epoch} has unexpected metric '{}'",
                            key.as_ref()
                        ))
                    })?;
                values.push(*value);
            }
        }

        Self::from_series(series)
    }

    /// Number of completed epochs.
    #[must_use]
    pub fn n_epochs(&self) -> usize {
        self.series[0].1.len()
    }

    /// Metric names in declaration order.
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(name, _)| name.as_str())
    }

    /// All values of one metric, ordered by epoch.
    #[must_use]
    pub fn series(&self, metric: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate over `(metric, values)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Maximum of a metric over the whole log.
    ///
    /// NaN epochs are ignored; a metric that is NaN throughout yields NaN.
    #[must_use]
    pub fn max(&self, metric: &str) -> Option<f64> {
        self.series(metric)
            .map(|values| values.iter().copied().fold(f64::NAN, f64::max))
    }
}
