use crate::stats::{Histogram, tail_avg};

const BINS: usize = 15;

/// Buckets holding at most this many points are considered sparse.
const SPARSE_BIN: usize = 20;

/// Histogram Bins
///
/// Anomalous if the tail average falls into a sparsely populated bucket of a
/// 15-bin histogram of the series. The first bucket only matches values at or
/// below its lower edge; interior buckets match strictly between their edges.
pub fn histogram_bins(values: &[f64]) -> bool {
    if values.is_empty() {
        return false;
    }
    let t = tail_avg(values);
    let hist = Histogram::build(values, BINS);

    hist.counts.iter().enumerate().any(|(i, &count)| {
        if count > SPARSE_BIN {
            return false;
        }
        if i == 0 {
            t <= hist.edges[0]
        } else {
            t > hist.edges[i] && t < hist.edges[i + 1]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense_uniform(per_value: usize) -> Vec<f64> {
        let mut values = Vec::new();
        for _ in 0..per_value {
            for v in 0..15 {
                values.push(v as f64 + 0.5);
            }
        }
        values
    }

    #[test]
    fn test_tail_in_dense_region() {
        let values = dense_uniform(30);
        assert!(!histogram_bins(&values));
    }

    #[test]
    fn test_tail_in_sparse_region() {
        let mut values = dense_uniform(30);
        // Stretch the range so the tail lands in an empty interior bucket
        values.push(300.0);
        values.extend([150.0, 150.0, 150.0]);
        assert!(histogram_bins(&values));
    }

    #[test]
    fn test_tail_on_interior_edge_matches_no_bucket() {
        // Range 0..15 in 15 buckets puts every edge on an integer; the tail
        // average 7.0 sits on the edge between two sparse buckets
        assert!(!histogram_bins(&[0.0, 15.0, 7.0, 7.0, 7.0]));
    }

    #[test]
    fn test_small_series_flags_minimum() {
        // Few points: every bucket is sparse, and a tail at the minimum hits
        // the first-bucket rule
        assert!(histogram_bins(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0]));
        assert!(!histogram_bins(&[]));
    }
}
