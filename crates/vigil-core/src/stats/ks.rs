//! Two-sample Kolmogorov-Smirnov test with the asymptotic distribution.

use crate::error::StatsError;

/// Leftmost insertion point of `key` in `sorted` (`searchsorted` with
/// side="left"): the number of elements strictly less than `key`.
pub fn empirical_cdf_index(sorted: &[f64], key: f64) -> usize {
    sorted.partition_point(|&x| x < key)
}

/// Vectorised [`empirical_cdf_index`].
pub fn searchsorted(sorted: &[f64], keys: &[f64]) -> Vec<usize> {
    keys.iter().map(|&k| empirical_cdf_index(sorted, k)).collect()
}

const SERIES_SWITCH: f64 = 1.18;

fn check_z(function: &'static str, z: f64) -> Result<(), StatsError> {
    if z < 0.0 || z.is_nan() {
        return Err(StatsError::InvalidArgument { function, value: z });
    }
    Ok(())
}

/// Asymptotic Kolmogorov-Smirnov CDF, `P(K <= z)`.
pub fn pks(z: f64) -> Result<f64, StatsError> {
    check_z("pks", z)?;
    if z == 0.0 {
        return Ok(0.0);
    }
    if z < SERIES_SWITCH {
        let y = (-1.233_700_550_136_169_83 / (z * z)).exp();
        return Ok(2.256_758_334_191_025_15
            * (-y.ln()).sqrt()
            * (y + y.powi(9) + y.powi(25) + y.powi(49)));
    }
    let x = (-2.0 * (z * z)).exp();
    Ok(1.0 - 2.0 * (x - x.powi(4) + x.powi(9)))
}

/// Asymptotic Kolmogorov-Smirnov tail, `P(K > z)`.
pub fn qks(z: f64) -> Result<f64, StatsError> {
    check_z("qks", z)?;
    if z == 0.0 {
        return Ok(1.0);
    }
    if z < SERIES_SWITCH {
        return Ok(1.0 - pks(z)?);
    }
    let x = (-2.0 * (z * z)).exp();
    Ok(2.0 * (x - x.powi(4) + x.powi(9)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsStatistic {
    /// Largest gap between the two empirical CDFs
    pub d: f64,
    pub p_value: f64,
}

/// Two-sample KS test for the hypothesis that `a` and `b` share a
/// distribution. Inputs are not reordered.
///
/// `d` is the largest gap between the empirical CDFs evaluated at every
/// pooled observation; the p-value is the asymptotic tail [`qks`] at
/// `(sqrt(ne) + 0.12 + 0.11 / sqrt(ne)) * d` with `ne = n1 * n2 / (n1 + n2)`.
pub fn two_sample_ks(a: &[f64], b: &[f64]) -> Result<KsStatistic, StatsError> {
    if a.is_empty() {
        return Err(StatsError::EmptySample("a"));
    }
    if b.is_empty() {
        return Err(StatsError::EmptySample("b"));
    }

    let mut a_sorted = a.to_vec();
    let mut b_sorted = b.to_vec();
    a_sorted.sort_by(f64::total_cmp);
    b_sorted.sort_by(f64::total_cmp);

    let mut pooled = Vec::with_capacity(a.len() + b.len());
    pooled.extend_from_slice(&a_sorted);
    pooled.extend_from_slice(&b_sorted);
    pooled.sort_by(f64::total_cmp);

    let n1 = a_sorted.len() as f64;
    let n2 = b_sorted.len() as f64;

    let mut d: f64 = 0.0;
    for &x in &pooled {
        let cdf1 = empirical_cdf_index(&a_sorted, x) as f64 / n1;
        let cdf2 = empirical_cdf_index(&b_sorted, x) as f64 / n2;
        d = d.max((cdf1 - cdf2).abs());
    }

    // Stephens' small-sample correction to the effective sample size
    let en = ((n1 * n2) / (n1 + n2)).sqrt();
    let p_value = qks((en + 0.12 + 0.11 / en) * d)?;

    Ok(KsStatistic { d, p_value })
}
