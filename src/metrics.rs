//! Prediction-quality metrics
//!
//! Pure functions over two equal-length sequences: ground truth first,
//! predictions second. Length mismatches fail immediately.

use crate::{Error, Result};

fn check_shapes(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::ShapeMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(Error::InvalidInput("metric needs at least one value".to_string()));
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient.
///
/// Constant input has zero variance and yields NaN.
///
/// # Errors
///
/// Returns error if the inputs differ in length or are empty
pub fn pearson(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_shapes(y_true, y_pred)?;

    let mean_true = mean(y_true);
    let mean_pred = mean(y_pred);

    let mut num = 0.0;
    let mut ss_true = 0.0;
    let mut ss_pred = 0.0;
    for (t, p) in y_true.iter().zip(y_pred) {
        let dt = t - mean_true;
        let dp = p - mean_pred;
        num += dt * dp;
        ss_true += dt * dt;
        ss_pred += dp * dp;
    }

    Ok(num / (ss_true.sqrt() * ss_pred.sqrt()))
}

/// Root mean square error.
///
/// # Errors
///
/// Returns error if the inputs differ in length or are empty
#[allow(clippy::cast_precision_loss)]
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_shapes(y_true, y_pred)?;

    let sse: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    Ok((sse / y_true.len() as f64).sqrt())
}

/// Normalized discounted cumulative gain over the top fraction `k`.
///
/// Items are ranked by descending prediction; the gain of an item is its
/// true value, discounted by `log2(rank + 1)` with 1-based ranks. Both the
/// achieved and the ideal sum cover the first `round(k * n)` items (at least
/// one) of their own ordering.
///
/// A perfect ranking scores 1.0. When the ideal sum is zero, as with all-zero
/// gains, the ratio is undefined and the result is NaN.
///
/// ```rust
/// use breeding_results::metrics::ndcg_at_k;
///
/// let y = [3.0, 1.0, 2.0, 5.0];
/// assert_eq!(ndcg_at_k(&y, &y, 0.5)?, 1.0);
/// # Ok::<(), breeding_results::Error>(())
/// ```
///
/// # Errors
///
/// Returns error if the inputs differ in length or are empty, or `k` is
/// outside `(0, 1]`
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn ndcg_at_k(y_true: &[f64], y_pred: &[f64], k: f64) -> Result<f64> {
    check_shapes(y_true, y_pred)?;
    if !(k > 0.0 && k <= 1.0) {
        return Err(Error::InvalidInput(format!("k must be in (0, 1], got {k}")));
    }

    let n = y_true.len();
    let top = ((k * n as f64).round() as usize).clamp(1, n);

    let mut by_prediction: Vec<usize> = (0..n).collect();
    by_prediction.sort_by(|&a, &b| y_pred[b].total_cmp(&y_pred[a]));
    let achieved = discounted_gain(by_prediction.iter().map(|&i| y_true[i]).take(top));

    let mut ideal = y_true.to_vec();
    ideal.sort_by(|a, b| b.total_cmp(a));
    let best = discounted_gain(ideal.into_iter().take(top));

    Ok(achieved / best)
}

#[allow(clippy::cast_precision_loss)]
fn discounted_gain(gains: impl Iterator<Item = f64>) -> f64 {
    gains
        .enumerate()
        .map(|(i, gain)| gain / ((i + 2) as f64).log2())
        .sum()
}
