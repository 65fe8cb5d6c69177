/// Equal-width histogram over the observed range of a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    /// Count per bucket, `edges.len() - 1` entries
    pub counts: Vec<usize>,
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Build from an unsorted series with `bins` equal-width buckets.
    ///
    /// Buckets are `[edge[i], edge[i+1])` except the last, which is closed on
    /// both ends so the maximum is counted. Edge generation stops early once
    /// an edge reaches the maximum (a constant series gets a single bucket),
    /// then the theoretical final edge `min + bins * width` is appended.
    pub fn build(series: &[f64], bins: usize) -> Self {
        if series.is_empty() || bins == 0 {
            return Self::default();
        }
        let mut sorted = series.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let width = (max - min) / bins as f64;

        let mut edges = Vec::with_capacity(bins + 1);
        for i in 0..bins {
            let edge = width * i as f64 + min;
            edges.push(edge);
            if edge >= max {
                break;
            }
        }
        edges.push(width * bins as f64 + min);

        let last = edges.len() - 2;
        let mut counts = vec![0usize; edges.len() - 1];
        for (i, count) in counts.iter_mut().enumerate() {
            let (lo, hi) = (edges[i], edges[i + 1]);
            *count = sorted
                .iter()
                .filter(|&&v| v >= lo && (v < hi || (i == last && v <= hi)))
                .count();
        }

        Self { counts, edges }
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }
}

/// Convenience form returning `(counts, edges)`.
pub fn histogram(series: &[f64], bins: usize) -> (Vec<usize>, Vec<f64>) {
    let h = Histogram::build(series, bins);
    (h.counts, h.edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        let (counts, edges) = histogram(&[], 15);
        assert!(counts.is_empty());
        assert!(edges.is_empty());
    }

    #[test]
    fn test_constant_series_collapses_to_one_bucket() {
        let h = Histogram::build(&[3.0; 5], 15);
        assert_eq!(h.edges, vec![3.0, 3.0]);
        assert_eq!(h.counts, vec![5]);
    }

    #[test]
    fn test_maximum_lands_in_last_bucket() {
        let h = Histogram::build(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_eq!(h.counts.iter().sum::<usize>(), 5);
    }
}
