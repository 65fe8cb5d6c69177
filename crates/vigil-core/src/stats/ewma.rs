//! Exponentially weighted moments over a finite series.
//!
//! Undefined entries (NaN, ±Inf) are carried as `None` instead of leaking
//! through the arithmetic. Undefined inputs take the previous average
//! unchanged; only a leading run of undefined inputs stays `None`.

fn defined(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Bias-corrected exponentially weighted moving average.
///
/// `com` is the center of mass (`alpha = 1 / (1 + com)`), and must be `>= 0`.
pub fn ewma(series: &[f64], com: f64) -> Vec<Option<f64>> {
    let mut ret: Vec<Option<f64>> = Vec::with_capacity(series.len());
    let Some(&first) = series.first() else {
        return ret;
    };

    let old_weight = com / (1.0 + com);
    ret.push(defined(first).map(|v| v / (1.0 + com)));

    for &raw in &series[1..] {
        let prev = ret[ret.len() - 1];
        let next = match (defined(raw), prev) {
            (None, prev) => prev,
            (Some(cur), None) => Some(cur / (1.0 + com)),
            (Some(cur), Some(prev)) => Some((com * prev + cur) / (1.0 + com)),
        };
        ret.push(next);
    }

    // Start-up bias: early averages are dominated by the implicit zero seed.
    let mut adjustment = old_weight;
    for i in 0..ret.len() {
        if series[i].is_finite() {
            if let Some(v) = ret[i] {
                ret[i] = Some(v / (1.0 - adjustment));
                adjustment *= old_weight;
            }
        } else if i > 0 {
            ret[i] = ret[i - 1];
        }
    }
    ret
}

/// Exponentially weighted moving standard deviation (bias-corrected).
///
/// Requires `com > 0`.
pub fn ewm_std(series: &[f64], com: f64) -> Vec<Option<f64>> {
    let first_moment = ewma(series, com);
    let squared: Vec<f64> = series.iter().map(|v| v * v).collect();
    let second_moment = ewma(&squared, com);

    let bias = (1.0 + 2.0 * com) / (2.0 * com);
    first_moment
        .iter()
        .zip(&second_moment)
        .map(|(m1, m2)| match (m1, m2) {
            (Some(m1), Some(m2)) => {
                let mut variance = m2 - m1 * m1;
                variance *= bias;
                // Cancellation can leave a tiny negative residue
                Some(variance.max(0.0).sqrt())
            }
            _ => None,
        })
        .collect()
}
