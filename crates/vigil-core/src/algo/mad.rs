use crate::stats::median;

/// Deviation multiple (in median absolute deviations) beyond which the
/// latest point is anomalous.
const MAD_THRESHOLD: f64 = 6.0;

/// Median Absolute Deviation
///
/// A series is anomalous if the deviation of its latest point from the
/// median is more than six times the median of all deviations. A series
/// whose median deviation is zero (e.g. constant) is never anomalous.
pub fn median_absolute_deviation(values: &[f64]) -> bool {
    let Some(&latest) = values.last() else {
        return false;
    };
    let med = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    let median_deviation = median(&deviations);
    if median_deviation == 0.0 {
        return false;
    }
    (latest - med).abs() / median_deviation > MAD_THRESHOLD
}
