use serde::{Deserialize, Serialize};

/// A single observation of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    /// Unix seconds
    pub timestamp: i64,
}

impl Measurement {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { value, timestamp }
    }
}

/// A recorded instance of a metric being flagged.
pub type TriggerRecord = Measurement;

/// Owned copy of the window's values, in window order.
pub fn values(window: &[Measurement]) -> Vec<f64> {
    window.iter().map(|m| m.value).collect()
}

pub fn timestamps(window: &[Measurement]) -> Vec<i64> {
    window.iter().map(|m| m.timestamp).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_projections() {
        let window = vec![Measurement::new(10, 1.5), Measurement::new(20, -2.0)];

        assert_eq!(values(&window), vec![1.5, -2.0]);
        assert_eq!(timestamps(&window), vec![10, 20]);
    }

    #[test]
    fn test_serde_shape() {
        let m = Measurement::new(1234567890, 42.0);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"value":42.0,"timestamp":1234567890}"#);
    }
}
