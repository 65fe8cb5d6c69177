//! Detectors comparing the tail of a series against an average of the
//! series (plain, exponentially weighted, or a historical baseline).

use crate::measurement::{Measurement, values};
use crate::stats::{ewm_std, ewma, mean, std, tail_avg};

/// Number of standard deviations that counts as anomalous.
const SIGMA: f64 = 3.0;

/// Center of mass for the exponentially weighted detector.
const EWMA_COM: f64 = 50.0;

const HOUR: i64 = 3600;

/// First Hour Average
///
/// The baseline is every point older than `now - (full_duration - 1h)`,
/// i.e. the first hour of a window spanning `full_duration` seconds. The
/// series is anomalous if the tail average is more than three standard
/// deviations from the baseline mean.
pub fn first_hour_average(window: &[Measurement], full_duration: i64, now: i64) -> bool {
    let cutoff = now - (full_duration - HOUR);
    let baseline: Vec<f64> = window
        .iter()
        .filter(|m| m.timestamp < cutoff)
        .map(|m| m.value)
        .collect();
    if baseline.len() < 2 {
        return false;
    }

    let t = tail_avg(&values(window));
    (t - mean(&baseline)).abs() > SIGMA * std(&baseline)
}

/// Simple Stddev From Moving Average
///
/// Anomalous if the tail average is more than three standard deviations from
/// the mean of the whole series. Unweighted, so it judges the tail against the
/// entire window rather than recent trends.
pub fn simple_stddev_from_moving_average(values: &[f64]) -> bool {
    if values.len() < 2 {
        return false;
    }
    (tail_avg(values) - mean(values)).abs() > SIGMA * std(values)
}

/// Stddev From Exponential Moving Average
///
/// Anomalous if the latest point is more than three exponentially weighted
/// standard deviations from the exponentially weighted mean. Sensitive to
/// short-term trends.
pub fn stddev_from_moving_average(values: &[f64]) -> bool {
    let Some(&latest) = values.last() else {
        return false;
    };
    let average = ewma(values, EWMA_COM);
    let spread = ewm_std(values, EWMA_COM);

    match (average.last().copied().flatten(), spread.last().copied().flatten()) {
        (Some(avg), Some(sd)) => (latest - avg).abs() > SIGMA * sd,
        _ => false,
    }
}

/// Mean Subtraction Cumulation
///
/// Subtracts the mean of all but the latest point from every point, then
/// flags the series if the latest centred value lies more than three standard
/// deviations (of the other centred points) from zero.
///
/// Takes the values by value: they are rewritten in place.
pub fn mean_subtraction_cumulation(mut values: Vec<f64>) -> bool {
    let n = values.len();
    if n < 3 {
        return false;
    }
    let m = mean(&values[..n - 1]);
    for v in values.iter_mut() {
        *v -= m;
    }
    let sd = std(&values[..n - 1]);
    values[n - 1].abs() > SIGMA * sd
}
