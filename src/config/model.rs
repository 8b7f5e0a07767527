//! Convolutional network configuration
//!
//! The model itself is built and trained elsewhere. This module owns the
//! configuration handed to that builder: named fields with documented
//! defaults, validated once at construction, plus the layer stack and
//! parameter count it implies.

use serde::{Deserialize, Serialize};

use super::RunConfig;
use crate::{Error, Result};

/// Convolution padding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// Output keeps the input's spatial size.
    #[default]
    Same,
    /// No padding; output shrinks by `filter - 1`.
    Valid,
}

impl Padding {
    /// Name as used by the model builder.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Valid => "valid",
        }
    }
}

/// One layer of the stacked network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer {
    /// 2-D convolution with ReLU activation.
    Conv2D {
        /// Number of filters
        filters: usize,
        /// Kernel size (rows, cols)
        kernel: (usize, usize),
        /// Padding mode
        padding: Padding,
    },
    /// Dropout with the given rate.
    Dropout {
        /// Fraction of units dropped
        rate: f64,
    },
    /// 2-D max pooling, stride equal to the pool size.
    MaxPool2D {
        /// Pool size (rows, cols)
        pool: (usize, usize),
    },
    /// Flattens the convolutional section into the dense section.
    Flatten,
    /// Fully connected layer (ReLU, or linear for the output unit).
    Dense {
        /// Number of units
        units: usize,
    },
}

/// Network configuration with named fields and defaults.
///
/// | field            | default    |
/// |------------------|------------|
/// | `input_shape`    | required   |
/// | `conv_layers`    | `[32, 64]` |
/// | `conv_filter`    | `(3, 3)`   |
/// | `conv_padding`   | `same`     |
/// | `dense_layers`   | `[128]`    |
/// | `pool_filter`    | `(2, 2)`   |
/// | `pool_step`      | `2`        |
/// | `drop_rate`      | `0.25`     |
/// | `regularizer_l1` | `0.0`      |
/// | `regularizer_l2` | `0.0`      |
///
/// Only [`ModelConfigBuilder::build`] produces a `ModelConfig`, so every
/// instance has passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    input_shape: (usize, usize, usize),
    conv_layers: Vec<usize>,
    conv_filter: (usize, usize),
    conv_padding: Padding,
    dense_layers: Vec<usize>,
    pool_filter: (usize, usize),
    pool_step: usize,
    drop_rate: f64,
    regularizer_l1: f64,
    regularizer_l2: f64,
}

impl ModelConfig {
    /// Start a builder for the given input shape (rows, cols, channels).
    #[must_use]
    pub fn builder(input_shape: (usize, usize, usize)) -> ModelConfigBuilder {
        ModelConfigBuilder::new(input_shape)
    }

    /// Input shape (rows, cols, channels).
    #[must_use]
    pub const fn input_shape(&self) -> (usize, usize, usize) {
        self.input_shape
    }

    /// Filters per convolutional layer.
    #[must_use]
    pub fn conv_layers(&self) -> &[usize] {
        &self.conv_layers
    }

    /// Units per hidden dense layer.
    #[must_use]
    pub fn dense_layers(&self) -> &[usize] {
        &self.dense_layers
    }

    /// Dropout rate applied after every hidden layer.
    #[must_use]
    pub const fn drop_rate(&self) -> f64 {
        self.drop_rate
    }

    /// Layer stack in build order.
    ///
    /// Every convolution is followed by dropout. A max-pooling layer is
    /// inserted after every `pool_step` convolutions, counting the first, but
    /// never directly after the first one. Dense layers are followed by
    /// dropout, and a single linear output unit closes the stack.
    #[must_use]
    pub fn layer_plan(&self) -> Vec<Layer> {
        let conv = |filters| Layer::Conv2D {
            filters,
            kernel: self.conv_filter,
            padding: self.conv_padding,
        };
        let dropout = Layer::Dropout {
            rate: self.drop_rate,
        };

        let mut layers = Vec::new();
        if let Some((&first, rest)) = self.conv_layers.split_first() {
            layers.push(conv(first));
            layers.push(dropout);
            let mut since_pool = 1;
            for &filters in rest {
                layers.push(conv(filters));
                since_pool += 1;
                if since_pool >= self.pool_step {
                    layers.push(Layer::MaxPool2D {
                        pool: self.pool_filter,
                    });
                    since_pool = 0;
                }
                layers.push(dropout);
            }
        }

        layers.push(Layer::Flatten);
        for &units in &self.dense_layers {
            layers.push(Layer::Dense { units });
            layers.push(dropout);
        }
        layers.push(Layer::Dense { units: 1 });
        layers
    }

    /// Trainable parameter count of [`layer_plan`](Self::layer_plan).
    ///
    /// # Errors
    ///
    /// Returns error if a `valid` convolution or a pooling layer shrinks a
    /// spatial dimension to zero
    pub fn parameter_count(&self) -> Result<u64> {
        let (mut rows, mut cols, mut channels) = self.input_shape;
        let mut features = 0;
        let mut total: u64 = 0;

        for layer in self.layer_plan() {
            match layer {
                Layer::Conv2D {
                    filters,
                    kernel: (kr, kc),
                    padding,
                } => {
                    total += ((kr * kc * channels + 1) * filters) as u64;
                    if padding == Padding::Valid {
                        if rows < kr || cols < kc {
                            return Err(Error::InvalidConfig(format!(
                                "valid convolution {kr}x{kc} does not fit a {rows}x{cols} input"
                            )));
                        }
                        rows = rows - kr + 1;
                        cols = cols - kc + 1;
                    }
                    channels = filters;
                }
                Layer::MaxPool2D { pool: (pr, pc) } => {
                    rows /= pr;
                    cols /= pc;
                    if rows == 0 || cols == 0 {
                        return Err(Error::InvalidConfig(format!(
                            "max pooling {pr}x{pc} reduces the feature map to nothing"
                        )));
                    }
                }
                Layer::Flatten => features = rows * cols * channels,
                Layer::Dense { units } => {
                    total += ((features + 1) * units) as u64;
                    features = units;
                }
                Layer::Dropout { .. } => {}
            }
        }

        Ok(total)
    }

    /// Hyperparameters in field declaration order.
    #[must_use]
    pub fn to_run_config(&self) -> RunConfig {
        let (rows, cols, channels) = self.input_shape;
        RunConfig::new()
            .with("input_shape", [rows, cols, channels])
            .with("conv_layers", self.conv_layers.clone())
            .with("conv_filter", [self.conv_filter.0, self.conv_filter.1])
            .with("conv_padding", self.conv_padding.as_str())
            .with("dense_layers", self.dense_layers.clone())
            .with("pool_filter", [self.pool_filter.0, self.pool_filter.1])
            .with("pool_step", self.pool_step)
            .with("drop_rate", self.drop_rate)
            .with("regularizer_l1", self.regularizer_l1)
            .with("regularizer_l2", self.regularizer_l2)
    }
}

/// Builder for `ModelConfig`.
#[derive(Debug, Clone)]
pub struct ModelConfigBuilder {
    config: ModelConfig,
}

impl ModelConfigBuilder {
    /// Create a builder holding the documented defaults.
    #[must_use]
    pub fn new(input_shape: (usize, usize, usize)) -> Self {
        Self {
            config: ModelConfig {
                input_shape,
                conv_layers: vec![32, 64],
                conv_filter: (3, 3),
                conv_padding: Padding::Same,
                dense_layers: vec![128],
                pool_filter: (2, 2),
                pool_step: 2,
                drop_rate: 0.25,
                regularizer_l1: 0.0,
                regularizer_l2: 0.0,
            },
        }
    }

    /// Set filters per convolutional layer.
    #[must_use]
    pub fn conv_layers(mut self, layers: Vec<usize>) -> Self {
        self.config.conv_layers = layers;
        self
    }

    /// Set the convolution kernel size.
    #[must_use]
    pub const fn conv_filter(mut self, rows: usize, cols: usize) -> Self {
        self.config.conv_filter = (rows, cols);
        self
    }

    /// Set the convolution padding mode.
    #[must_use]
    pub const fn conv_padding(mut self, padding: Padding) -> Self {
        self.config.conv_padding = padding;
        self
    }

    /// Set units per hidden dense layer.
    #[must_use]
    pub fn dense_layers(mut self, layers: Vec<usize>) -> Self {
        self.config.dense_layers = layers;
        self
    }

    /// Set the max-pooling size.
    #[must_use]
    pub const fn pool_filter(mut self, rows: usize, cols: usize) -> Self {
        self.config.pool_filter = (rows, cols);
        self
    }

    /// Set how many convolutions separate two pooling layers.
    #[must_use]
    pub const fn pool_step(mut self, step: usize) -> Self {
        self.config.pool_step = step;
        self
    }

    /// Set the dropout rate.
    #[must_use]
    pub const fn drop_rate(mut self, rate: f64) -> Self {
        self.config.drop_rate = rate;
        self
    }

    /// Set the L1 kernel regularization factor.
    #[must_use]
    pub const fn regularizer_l1(mut self, factor: f64) -> Self {
        self.config.regularizer_l1 = factor;
        self
    }

    /// Set the L2 kernel regularization factor.
    #[must_use]
    pub const fn regularizer_l2(mut self, factor: f64) -> Self {
        self.config.regularizer_l2 = factor;
        self
    }

    /// Validate and build the `ModelConfig`.
    ///
    /// # Errors
    ///
    /// Returns error if any field is outside its valid range
    pub fn build(self) -> Result<ModelConfig> {
        let c = self.config;
        let (rows, cols, channels) = c.input_shape;

        if rows == 0 || cols == 0 || channels == 0 {
            return Err(Error::InvalidConfig(format!(
                "input_shape must be positive, got ({rows}, {cols}, {channels})"
            )));
        }
        if c.conv_layers.is_empty() {
            return Err(Error::InvalidConfig(
                "conv_layers needs at least one layer".to_string(),
            ));
        }
        if c.conv_layers.contains(&0) || c.dense_layers.contains(&0) {
            return Err(Error::InvalidConfig(
                "layer sizes must be positive".to_string(),
            ));
        }
        if c.conv_filter.0 == 0 || c.conv_filter.1 == 0 {
            return Err(Error::InvalidConfig(
                "conv_filter must be positive".to_string(),
            ));
        }
        if c.pool_filter.0 == 0 || c.pool_filter.1 == 0 {
            return Err(Error::InvalidConfig(
                "pool_filter must be positive".to_string(),
            ));
        }
        if c.pool_step == 0 {
            return Err(Error::InvalidConfig(
                "pool_step must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&c.drop_rate) {
            return Err(Error::InvalidConfig(format!(
                "drop_rate must be in [0, 1), got {}",
                c.drop_rate
            )));
        }
        if c.regularizer_l1 < 0.0 || c.regularizer_l2 < 0.0 {
            return Err(Error::InvalidConfig(
                "regularizer factors must be non-negative".to_string(),
            ));
        }

        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::builder((10, 10, 1)).build().unwrap();
        assert_eq!(config.conv_layers(), &[32, 64]);
        assert_eq!(config.dense_layers(), &[128]);
        assert!((config.drop_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_layer_plan_default() {
        let config = ModelConfig::builder((10, 10, 1)).build().unwrap();
        let plan = config.layer_plan();
        let pools = plan
            .iter()
            .filter(|l| matches!(l, Layer::MaxPool2D { .. }))
            .count();
        assert_eq!(pools, 1);
        assert_eq!(plan.last(), Some(&Layer::Dense { units: 1 }));
        assert!(matches!(plan[2], Layer::Conv2D { filters: 64, .. }));
        assert!(matches!(plan[3], Layer::MaxPool2D { pool: (2, 2) }));
    }

    #[test]
    fn test_parameter_count_default() {
        // conv 320 + conv 18_496 + dense 204_928 + output 129
        let config = ModelConfig::builder((10, 10, 1)).build().unwrap();
        assert_eq!(config.parameter_count().unwrap(), 223_873);
    }

    #[test]
    fn test_parameter_count_valid_padding_too_small() {
        let config = ModelConfig::builder((2, 2, 1))
            .conv_padding(Padding::Valid)
            .build()
            .unwrap();
        assert!(config.parameter_count().is_err());
    }

    #[test]
    fn test_build_rejects_bad_drop_rate() {
        let result = ModelConfig::builder((10, 10, 1)).drop_rate(1.5).build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_build_rejects_empty_conv_layers() {
        let result = ModelConfig::builder((10, 10, 1))
            .conv_layers(vec![])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_layer_plan_without_convolutions() {
        let config = ModelConfig {
            conv_layers: Vec::new(),
            ..ModelConfig::builder((4, 4, 1)).build().unwrap()
        };
        let plan = config.layer_plan();
        assert_eq!(plan[0], Layer::Flatten);
        // dense (16 + 1) * 128 + output 129
        assert_eq!(config.parameter_count().unwrap(), 2_305);
    }

    #[test]
    fn test_to_run_config_order() {
        let config = ModelConfig::builder((10, 10, 1)).build().unwrap();
        let run = config.to_run_config();
        let keys: Vec<&str> = run.keys().collect();
        assert_eq!(
            keys,
            vec![
                "input_shape",
                "conv_layers",
                "conv_filter",
                "conv_padding",
                "dense_layers",
                "pool_filter",
                "pool_step",
                "drop_rate",
                "regularizer_l1",
                "regularizer_l2",
            ]
        );
        assert_eq!(run.get("conv_padding").unwrap().canonical(), "same");
    }
}
