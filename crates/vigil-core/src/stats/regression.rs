use super::moments::{covariance, mean, variance};
use crate::measurement::Measurement;

/// Ordinary least squares fit of value on timestamp.
///
/// Returns `(alpha, beta)` where `value ≈ beta * timestamp + alpha`.
/// `None` when the slope is undefined: fewer than two points, or every
/// timestamp equal.
pub fn linear_regression_lse(window: &[Measurement]) -> Option<(f64, f64)> {
    if window.len() < 2 {
        return None;
    }
    let times: Vec<f64> = window.iter().map(|m| m.timestamp as f64).collect();
    let values: Vec<f64> = window.iter().map(|m| m.value).collect();

    let time_var = variance(&times);
    if time_var == 0.0 {
        return None;
    }

    let beta = covariance(&times, &values) / time_var;
    let alpha = mean(&values) - beta * mean(&times);
    Some((alpha, beta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_exact_line() {
        let window: Vec<Measurement> = (0..10)
            .map(|i| Measurement::new(i, i as f64 * 3.1 - 2.1))
            .collect();

        let (alpha, beta) = linear_regression_lse(&window).unwrap();

        assert!((beta - 3.1).abs() < 1e-12, "beta = {}", beta);
        assert!((alpha + 2.1).abs() < 1e-12, "alpha = {}", alpha);
    }

    #[test]
    fn test_flat_series() {
        let window: Vec<Measurement> = (100..110).map(|t| Measurement::new(t, 7.0)).collect();
        let (alpha, beta) = linear_regression_lse(&window).unwrap();
        assert_eq!(beta, 0.0);
        assert_eq!(alpha, 7.0);
    }

    #[test]
    fn test_undefined_slope() {
        let same_time = vec![Measurement::new(5, 1.0), Measurement::new(5, 2.0)];
        assert_eq!(linear_regression_lse(&same_time), None);
        assert_eq!(linear_regression_lse(&[Measurement::new(1, 1.0)]), None);
        assert_eq!(linear_regression_lse(&[]), None);
    }
}
