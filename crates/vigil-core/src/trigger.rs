//! Trigger History: Meta-Analysis of Past Alerts
//!
//! A metric that keeps firing at a regular cadence is less interesting than
//! one whose latest alert breaks its usual rhythm. The tracker records every
//! trigger per metric and reports whether the newest one arrived at an
//! unusual interval.
//!
//! The history is an owned value: callers fetch it, pass it in, and store the
//! returned copy. Calls for one metric must be serialised by the caller
//! (shard by metric, or lock per metric); different metrics are independent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::measurement::TriggerRecord;
use crate::stats::{mean, std};

/// Repeats of the same value within this many seconds are one trigger.
const DEDUP_WINDOW_SECS: i64 = 300;

const SIGMA: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Empty,
    Tracking,
}

/// Chronological record of one metric's triggers. Never truncated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerHistory {
    records: Vec<TriggerRecord>,
}

impl TriggerHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackerState {
        if self.records.is_empty() {
            TrackerState::Empty
        } else {
            TrackerState::Tracking
        }
    }

    pub fn records(&self) -> &[TriggerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TriggerRecord> {
        self.records.last()
    }

    /// Gaps between consecutive triggers, in seconds.
    pub fn intervals(&self) -> Vec<f64> {
        self.records
            .windows(2)
            .map(|pair| (pair[1].timestamp - pair[0].timestamp) as f64)
            .collect()
    }
}

impl From<Vec<TriggerRecord>> for TriggerHistory {
    fn from(records: Vec<TriggerRecord>) -> Self {
        Self { records }
    }
}

/// Result of feeding one trigger to the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerVerdict {
    /// Whether the trigger is unusual given past trigger timing
    pub significant: bool,
    /// History to persist for the next call
    pub history: TriggerHistory,
}

/// Decide whether `trigger` is itself anomalous given the metric's history.
///
/// - The first trigger ever is significant.
/// - The same value again within 300 seconds of the last trigger is dropped
///   and not significant.
/// - Otherwise the trigger is appended, and it is significant if the newest
///   interval lies more than three standard deviations from the mean of all
///   intervals.
pub fn is_anomalously_anomalous(
    mut history: TriggerHistory,
    trigger: TriggerRecord,
) -> TriggerVerdict {
    let Some(last) = history.last().copied() else {
        history.records.push(trigger);
        return TriggerVerdict {
            significant: true,
            history,
        };
    };

    if trigger.value == last.value && trigger.timestamp - last.timestamp <= DEDUP_WINDOW_SECS {
        trace!(timestamp = trigger.timestamp, "Duplicate trigger dropped");
        return TriggerVerdict {
            significant: false,
            history,
        };
    }

    history.records.push(trigger);
    let intervals = history.intervals();
    let latest = intervals[intervals.len() - 1];
    let significant = (latest - mean(&intervals)).abs() > SIGMA * std(&intervals);

    TriggerVerdict {
        significant,
        history,
    }
}

/// Caller-supplied storage for trigger histories.
pub trait TriggerSink {
    /// History for `metric`, empty if none was stored.
    fn get(&self, metric: &str) -> TriggerHistory;
    fn put(&mut self, metric: &str, history: TriggerHistory);
}

/// Fetch, evaluate and store in one step.
pub fn track<S: TriggerSink + ?Sized>(sink: &mut S, metric: &str, trigger: TriggerRecord) -> bool {
    let verdict = is_anomalously_anomalous(sink.get(metric), trigger);
    sink.put(metric, verdict.history);
    verdict.significant
}

/// HashMap-backed sink for single-owner use (one per shard).
#[derive(Debug, Default)]
pub struct InMemoryTriggerSink {
    histories: HashMap<String, TriggerHistory>,
}

impl InMemoryTriggerSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl TriggerSink for InMemoryTriggerSink {
    fn get(&self, metric: &str) -> TriggerHistory {
        self.histories.get(metric).cloned().unwrap_or_default()
    }

    fn put(&mut self, metric: &str, history: TriggerHistory) {
        self.histories.insert(metric.to_string(), history);
    }
}
