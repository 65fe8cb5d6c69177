//! Per-shard metric windows.

use std::collections::HashMap;

use tracing::debug;
use vigil_core::Measurement;

use crate::codec::{self, CodecError};

#[derive(Debug, Default)]
struct Series {
    encoded: Vec<u8>,
    points: usize,
    dirty: bool,
}

/// Metric name to encoded measurement buffer. Owned by exactly one shard.
#[derive(Debug)]
pub struct MetricStore {
    series: HashMap<String, Series>,
    max_points: usize,
}

impl MetricStore {
    pub fn new(max_points: usize) -> Self {
        Self {
            series: HashMap::new(),
            max_points,
        }
    }

    pub fn append(&mut self, name: &str, measurement: Measurement) -> Result<(), CodecError> {
        let series = self.series.entry(name.to_string()).or_default();
        codec::encode_tuple(&mut series.encoded, &measurement)?;
        series.points += 1;
        series.dirty = true;
        Ok(())
    }

    /// Cut every series back to its most recent `max_points`. Returns the
    /// number of series that were shortened.
    pub fn trim_all(&mut self) -> Result<usize, CodecError> {
        let mut trimmed = 0;
        for (name, series) in self.series.iter_mut() {
            if series.points <= self.max_points {
                continue;
            }
            series.encoded = codec::trim(&series.encoded, self.max_points)?;
            debug!(metric = %name, dropped = series.points - self.max_points, "Trimmed series");
            series.points = self.max_points;
            trimmed += 1;
        }
        Ok(trimmed)
    }

    /// Measurements of `name` no older than `now - lookback`, sorted by
    /// timestamp. Arrival order is kept for equal timestamps.
    pub fn window(
        &self,
        name: &str,
        lookback: i64,
        now: i64,
    ) -> Result<Vec<Measurement>, CodecError> {
        let Some(series) = self.series.get(name) else {
            return Ok(Vec::new());
        };
        let oldest = now - lookback;
        let mut window: Vec<Measurement> = codec::decode_all(&series.encoded)?
            .into_iter()
            .filter(|m| m.timestamp >= oldest)
            .collect();
        window.sort_by_key(|m| m.timestamp);
        Ok(window)
    }

    /// Names of metrics that received data since the last call, clearing
    /// their dirty flags.
    pub fn take_dirty(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        for (name, series) in self.series.iter_mut() {
            if std::mem::take(&mut series.dirty) {
                names.push(name.clone());
            }
        }
        names.sort();
        names
    }

    pub fn points(&self, name: &str) -> usize {
        self.series.get(name).map_or(0, |s| s.points)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(timestamp: i64, value: f64) -> Measurement {
        Measurement::new(timestamp, value)
    }

    #[test]
    fn test_append_and_window() {
        let mut store = MetricStore::new(100);
        for ts in [10, 20, 30, 40] {
            store.append("cpu", m(ts, ts as f64)).unwrap();
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.points("cpu"), 4);
        assert_eq!(store.window("cpu", 15, 40).unwrap(), vec![m(30, 30.0), m(40, 40.0)]);
        assert!(store.window("mem", 100, 40).unwrap().is_empty());
    }

    #[test]
    fn test_window_restores_time_order() {
        let mut store = MetricStore::new(100);
        store.append("cpu", m(30, 1.0)).unwrap();
        store.append("cpu", m(10, 2.0)).unwrap();
        store.append("cpu", m(20, 3.0)).unwrap();
        store.append("cpu", m(10, 4.0)).unwrap();

        let window = store.window("cpu", 1_000, 30).unwrap();
        assert_eq!(window, vec![m(10, 2.0), m(10, 4.0), m(20, 3.0), m(30, 1.0)]);
    }

    #[test]
    fn test_trim_all() {
        let mut store = MetricStore::new(3);
        for ts in 0..5 {
            store.append("cpu", m(ts, ts as f64)).unwrap();
        }
        store.append("mem", m(0, 0.0)).unwrap();

        assert_eq!(store.trim_all().unwrap(), 1);
        assert_eq!(store.points("cpu"), 3);
        assert_eq!(
            store.window("cpu", 100, 4).unwrap(),
            vec![m(2, 2.0), m(3, 3.0), m(4, 4.0)]
        );
        assert_eq!(store.trim_all().unwrap(), 0);
    }

    #[test]
    fn test_take_dirty() {
        let mut store = MetricStore::new(10);
        store.append("b", m(1, 1.0)).unwrap();
        store.append("a", m(1, 1.0)).unwrap();

        assert_eq!(store.take_dirty(), vec!["a".to_string(), "b".to_string()]);
        assert!(store.take_dirty().is_empty());

        store.append("b", m(2, 1.0)).unwrap();
        assert_eq!(store.take_dirty(), vec!["b".to_string()]);
    }
}
