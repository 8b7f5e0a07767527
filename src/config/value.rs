//! Hyperparameter values and their canonical text forms

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single hyperparameter value.
///
/// Values map one-to-one onto JSON scalars and arrays, so a [`RunConfig`]
/// survives an encode/decode cycle without changing type: integers stay
/// integers and floats stay floats.
///
/// [`RunConfig`]: super::RunConfig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// JSON `null`
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer (layer sizes, step counts, epochs)
    Int(i64),
    /// Floating-point (rates, regularizers)
    Float(f64),
    /// Free text (padding mode, optimizer name)
    Text(String),
    /// Ordered sequence, e.g. `conv_layers = [32, 64]`
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Canonical text form.
    ///
    /// Scalars render as their literal; sequences render bracketed and
    /// comma-separated (`[32, 64]`). Floats with no fractional part keep a
    /// trailing `.0` so they stay distinguishable from integers.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Self::canonical).collect();
                format!("[{}]", inner.join(", "))
            }
            scalar => scalar.to_string(),
        }
    }

    /// Flat text form used in table cells: sequence elements joined by `sep`.
    ///
    /// Scalars are identical to [`canonical`](Self::canonical).
    #[must_use]
    pub fn joined(&self, sep: &str) -> String {
        match self {
            Self::List(items) => items
                .iter()
                .map(|item| item.joined(sep))
                .collect::<Vec<_>>()
                .join(sep),
            scalar => scalar.to_string(),
        }
    }

    /// Numeric view of a scalar, if it has one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Text(v) => f.write_str(v),
            Self::List(_) => f.write_str(&self.canonical()),
        }
    }
}

/// Shortest round-trip rendering of a float that never reads as an integer:
/// `2.0`, `0.001`, `1e16`.
pub(crate) fn format_float(value: f64) -> String {
    format!("{value:?}")
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ConfigValue {
                fn from(value: $t) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for ConfigValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ConfigValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for ConfigValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
