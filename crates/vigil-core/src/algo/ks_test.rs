use tracing::debug;

use crate::measurement::Measurement;
use crate::stats::{KsStatistic, two_sample_ks};

const REFERENCE_START: i64 = 3600;
const PROBE_START: i64 = 600;
const MIN_BAND_POINTS: usize = 20;

const MAX_P_VALUE: f64 = 0.05;
const MIN_STATISTIC: f64 = 0.5;

/// What the two-sample comparison of the last hour found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KsOutcome {
    /// One of the bands has fewer than 20 points
    InsufficientData { reference: usize, probe: usize },
    Similar(KsStatistic),
    /// The last ten minutes look differently distributed from the 50 minutes
    /// before them
    Divergent(KsStatistic),
}

/// Split the window into a reference band `[now - 1h, now - 10m)` and a probe
/// band `[now - 10m, now]` and compare their distributions.
pub fn ks_test_outcome(window: &[Measurement], now: i64) -> KsOutcome {
    let hour_ago = now - REFERENCE_START;
    let ten_minutes_ago = now - PROBE_START;

    let mut reference = Vec::new();
    let mut probe = Vec::new();
    for m in window {
        if m.timestamp >= hour_ago && m.timestamp < ten_minutes_ago {
            reference.push(m.value);
        } else if m.timestamp >= ten_minutes_ago && m.timestamp <= now {
            probe.push(m.value);
        }
    }

    let insufficient = KsOutcome::InsufficientData {
        reference: reference.len(),
        probe: probe.len(),
    };
    if reference.len() < MIN_BAND_POINTS || probe.len() < MIN_BAND_POINTS {
        return insufficient;
    }

    match two_sample_ks(&reference, &probe) {
        Ok(stat) if stat.p_value < MAX_P_VALUE && stat.d > MIN_STATISTIC => {
            KsOutcome::Divergent(stat)
        }
        Ok(stat) => KsOutcome::Similar(stat),
        Err(_) => insufficient,
    }
}

/// Two-Sample Kolmogorov-Smirnov
///
/// A divergence only becomes an anomaly once the reference band is shown to
/// be stationary (an augmented Dickey-Fuller check); non-stationary series
/// produce false positives otherwise. That check is not implemented, so this
/// detector never flags. Use [`ks_test_outcome`] to inspect the statistic.
pub fn ks_test(window: &[Measurement], now: i64) -> bool {
    if let KsOutcome::Divergent(stat) = ks_test_outcome(window, now) {
        debug!(
            d = stat.d,
            p_value = stat.p_value,
            "Distribution shift pending stationarity check"
        );
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    /// One point per 30s over the last hour.
    fn hour_window(reference: impl Fn(usize) -> f64, probe: impl Fn(usize) -> f64) -> Vec<Measurement> {
        let mut window = Vec::new();
        for i in 0..100 {
            window.push(Measurement::new(NOW - 3600 + i as i64 * 30, reference(i)));
        }
        for i in 0..20 {
            window.push(Measurement::new(NOW - 600 + i as i64 * 30, probe(i)));
        }
        window
    }

    #[test]
    fn test_insufficient_bands() {
        let window: Vec<Measurement> = (0..30).map(|i| Measurement::new(NOW - i, 1.0)).collect();
        assert_eq!(
            ks_test_outcome(&window, NOW),
            KsOutcome::InsufficientData {
                reference: 0,
                probe: 30
            }
        );
        assert!(!ks_test(&window, NOW));
    }

    #[test]
    fn test_same_distribution() {
        let window = hour_window(|i| (i % 10) as f64, |i| (i % 10) as f64);
        assert!(matches!(ks_test_outcome(&window, NOW), KsOutcome::Similar(_)));
    }

    #[test]
    fn test_shift_is_detected_but_not_flagged() {
        let window = hour_window(|i| (i % 10) as f64, |i| 100.0 + (i % 10) as f64);
        match ks_test_outcome(&window, NOW) {
            KsOutcome::Divergent(stat) => {
                assert_eq!(stat.d, 1.0);
                assert!(stat.p_value < 0.05);
            }
            other => panic!("expected divergence, got {:?}", other),
        }
        assert!(!ks_test(&window, NOW));
    }

    #[test]
    fn test_reference_band_includes_its_start() {
        let mut window: Vec<Measurement> = (0..20)
            .map(|i| Measurement::new(NOW - 3600 + i * 30, (i % 10) as f64))
            .collect();
        window.extend((0..20).map(|i| Measurement::new(NOW - 600 + i * 30, (i % 10) as f64)));

        assert!(matches!(ks_test_outcome(&window, NOW), KsOutcome::Similar(_)));
    }

    #[test]
    fn test_future_points_are_ignored() {
        let mut window = hour_window(|i| (i % 10) as f64, |i| (i % 10) as f64);
        window.push(Measurement::new(NOW + 60, 1e9));
        assert!(matches!(ks_test_outcome(&window, NOW), KsOutcome::Similar(_)));
    }
}
