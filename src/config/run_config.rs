//! Run configuration - the hyperparameter set of one training run

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::ConfigValue;
use crate::Result;

/// Ordered mapping from hyperparameter name to value.
///
/// Iteration, file naming and serialization all follow the declaration
/// order of the keys. Inserting an existing key replaces its value in place
/// and keeps its position.
///
/// ## Example
///
/// ```rust
/// use breeding_results::config::RunConfig;
///
/// let config = RunConfig::new()
///     .with("conv_layers", vec![32, 64])
///     .with("learn_rate", 0.001);
///
/// let json = config.to_json()?;
/// assert_eq!(json, r#"{"conv_layers":[32,64],"learn_rate":0.001}"#);
/// assert_eq!(RunConfig::from_json(&json)?, config);
/// # Ok::<(), breeding_results::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    entries: Vec<(String, ConfigValue)>,
}

impl RunConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of hyperparameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the configuration has no hyperparameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as a compact JSON object, keys in declaration order.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON object, keeping the key order of the text.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a JSON object of supported values
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for RunConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.insert(key, value);
        }
        config
    }
}

impl Serialize for RunConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct RunConfigVisitor;

impl<'de> Visitor<'de> for RunConfigVisitor {
    type Value = RunConfig;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping hyperparameter names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<RunConfig, A::Error> {
        let mut config = RunConfig::new();
        while let Some((key, value)) = access.next_entry::<String, ConfigValue>()? {
            config.insert(key, value);
        }
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for RunConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RunConfigVisitor)
    }
}
