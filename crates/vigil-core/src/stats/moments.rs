//! Location and dispersion estimators over plain `f64` slices.

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let total: f64 = xs.iter().sum();
    total / xs.len() as f64
}

/// Median of a sorted copy. Even lengths average the two central elements.
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let lhs = (sorted.len() - 1) / 2;
    let rhs = sorted.len() / 2;
    if lhs == rhs {
        sorted[lhs]
    } else {
        (sorted[lhs] + sorted[rhs]) / 2.0
    }
}

/// Sample covariance (divisor `n - 1`).
///
/// Unpaired or empty inputs return `0.0`, as does a single pair, whose
/// sample covariance is undefined.
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    if a.len() < 2 {
        return 0.0;
    }
    let a_mean = mean(a);
    let b_mean = mean(b);
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b) {
        sum += (x - a_mean) * (y - b_mean);
    }
    sum / (a.len() - 1) as f64
}

pub fn variance(xs: &[f64]) -> f64 {
    covariance(xs, xs)
}

pub fn std(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Average of the last three points, trading a little sensitivity for noise
/// reduction. Shorter series return their last point.
pub fn tail_avg(xs: &[f64]) -> f64 {
    match xs {
        [] => 0.0,
        [.., a, b, c] => (c + b + a) / 3.0,
        [.., last] => *last,
    }
}
