use crate::measurement::Measurement;
use crate::stats::{linear_regression_lse, std};

/// Least Squares Projection
///
/// Fits a line to the whole window and flags the series if the average of
/// the last three residuals exceeds three standard deviations of all
/// residuals. Fits whose residual spread or tail truncates to zero are
/// treated as exact and never flagged.
pub fn least_squares(window: &[Measurement]) -> bool {
    let Some((alpha, beta)) = linear_regression_lse(window) else {
        return false;
    };
    let residuals: Vec<f64> = window
        .iter()
        .map(|m| m.value - (beta * m.timestamp as f64 + alpha))
        .collect();

    let &[.., a, b, c] = residuals.as_slice() else {
        return false;
    };
    let sd = std(&residuals);
    let t = (c + b + a) / 3.0;

    t.abs() > sd * 3.0 && sd.trunc() != 0.0 && t.trunc() != 0.0
}
