//! File names that encode a run's hyperparameters

use crate::config::RunConfig;

/// Keys left out of generated names unless the caller says otherwise.
pub const DEFAULT_EXCLUSIONS: [&str; 3] = ["input_shape", "conv_padding", "batch_size"];

/// Builds deterministic, filesystem-safe base names for run outputs
/// (plots, per-run files).
///
/// ```rust
/// use breeding_results::config::RunConfig;
/// use breeding_results::naming::ConfigNamer;
///
/// let config = RunConfig::new()
///     .with("input_shape", vec![100, 100, 15])
///     .with("conv_layers", vec![32, 64])
///     .with("drop_rate", 0.25);
///
/// let name = ConfigNamer::new("png").name("milk", &config, 3);
/// assert_eq!(name, "milk_32_64_0.25_3.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNamer {
    exclusions: Vec<String>,
    extension: String,
}

impl ConfigNamer {
    /// Create a namer with the default exclusion set.
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            exclusions: DEFAULT_EXCLUSIONS.iter().map(ToString::to_string).collect(),
            extension: extension.into(),
        }
    }

    /// Replace the exclusion set. Keys absent from a config are ignored.
    #[must_use]
    pub fn with_exclusions<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.exclusions = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Keys left out of names.
    #[must_use]
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// Build `<trait>_<values…>_<replicate>.<extension>`.
    ///
    /// Values follow the configuration's key order in canonical form.
    /// `,[]()` are removed and spaces become `_`.
    #[must_use]
    pub fn name(&self, trait_name: &str, config: &RunConfig, replicate: impl std::fmt::Display) -> String {
        let mut parts = vec![trait_name.to_string()];
        parts.extend(
            config
                .iter()
                .filter(|(key, _)| !self.exclusions.iter().any(|e| e.as_str() == *key))
                .map(|(_, value)| value.canonical()),
        );

        let stem: String = parts
            .join("_")
            .chars()
            .filter(|c| !matches!(c, ',' | '[' | ']' | '(' | ')'))
            .map(|c| if c == ' ' { '_' } else { c })
            .collect();

        format!("{stem}_{replicate}.{}", self.extension)
    }
}
