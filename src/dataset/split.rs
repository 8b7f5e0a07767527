//! Seeded train/validation split

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::{Error, Result};

/// Sample indices held out for validation, and the rest.
///
/// `floor(n * fraction)` samples are drawn without replacement for
/// validation. The same `n`, fraction and seed always give the same split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainValSplit {
    train: Vec<usize>,
    validation: Vec<usize>,
}

impl TrainValSplit {
    /// Split `0..n` with a validation `fraction` in `[0, 1)`.
    ///
    /// Validation indices are in draw order; training indices ascend.
    ///
    /// # Errors
    ///
    /// Returns error if `fraction` is outside `[0, 1)`
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(n: usize, fraction: f64, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(Error::InvalidInput(format!(
                "validation fraction must be in [0, 1), got {fraction}"
            )));
        }
        let n_val = ((n as f64) * fraction).floor() as usize;

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let validation = order[..n_val].to_vec();
        let mut train = order[n_val..].to_vec();
        train.sort_unstable();

        info!(
            "Splitting {n} samples with seed {seed}: {} train, {} validation",
            train.len(),
            validation.len()
        );
        Ok(Self { train, validation })
    }

    /// Training indices.
    #[must_use]
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    /// Validation indices.
    #[must_use]
    pub fn validation(&self) -> &[usize] {
        &self.validation
    }

    /// Pick `items` into `(train, validation)`.
    ///
    /// # Errors
    ///
    /// Returns error if `items` does not have one entry per split index
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<(Vec<T>, Vec<T>)> {
        let expected = self.train.len() + self.validation.len();
        if items.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: items.len(),
            });
        }
        let pick = |indices: &[usize]| -> Vec<T> { indices.iter().map(|&i| items[i].clone()).collect() };
        Ok((pick(&self.train), pick(&self.validation)))
    }
}
