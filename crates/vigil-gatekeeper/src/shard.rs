//! Shard workers (actor model).
//!
//! Every metric name hashes to exactly one shard, and a shard is one OS
//! thread that owns its `MetricStore` and trigger histories outright. The
//! single-writer rule for trigger histories therefore holds without locks.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use vigil_core::trigger::{InMemoryTriggerSink, track};
use vigil_core::{Algorithm, EvalContext};

use crate::consensus::ConsensusPolicy;
use crate::line::{MetricSample, parse_datagram};
use crate::metrics::{
    ANOMALIES_DROPPED_TOTAL, ANOMALIES_TOTAL, DROPPED_TOTAL, EVAL_LATENCY, EVALUATIONS_TOTAL, LINES_TOTAL,
    PARSE_ERRORS_TOTAL, SIGNIFICANT_TOTAL, TRACKED_METRICS,
};
use crate::store::MetricStore;

/// How long a worker blocks on its queue before checking its timers.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shard index for a metric name.
pub fn shard_for(name: &str, shards: usize) -> usize {
    (xxhash_rust::xxh3::xxh3_64(name.as_bytes()) % shards as u64) as usize
}

/// A significant anomaly, as written to the anomaly log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyOutput {
    pub metric: String,
    /// Timestamp of the measurement that triggered
    pub timestamp: i64,
    pub value: f64,
    pub fired: Vec<Algorithm>,
    /// Evaluation time, unix seconds
    pub evaluated_at: i64,
}

#[derive(Debug, Clone)]
pub struct ShardSettings {
    pub max_points: usize,
    pub full_duration: i64,
    pub eval_interval: Duration,
    pub trim_interval: Duration,
}

pub struct ShardWorker {
    id: usize,
    rx: Receiver<MetricSample>,
    store: MetricStore,
    triggers: InMemoryTriggerSink,
    policy: Arc<ConsensusPolicy>,
    alerts: Sender<AnomalyOutput>,
    settings: ShardSettings,
}

impl ShardWorker {
    pub fn new(
        id: usize,
        rx: Receiver<MetricSample>,
        policy: Arc<ConsensusPolicy>,
        alerts: Sender<AnomalyOutput>,
        settings: ShardSettings,
    ) -> Self {
        Self {
            id,
            rx,
            store: MetricStore::new(settings.max_points),
            triggers: InMemoryTriggerSink::new(),
            policy,
            alerts,
            settings,
        }
    }

    pub fn spawn(mut self) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("vigil-shard-{}", self.id))
            .spawn(move || {
                self.run();
                info!(shard = self.id, "Shard worker stopped.");
            })
    }

    /// Drain the queue until every sender is gone, trimming and evaluating
    /// on their intervals.
    pub fn run(&mut self) {
        info!(shard = self.id, "Shard worker active.");
        let mut last_trim = Instant::now();
        let mut last_eval = Instant::now();

        loop {
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(sample) => self.ingest(sample),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_trim.elapsed() >= self.settings.trim_interval {
                self.trim();
                last_trim = Instant::now();
            }
            if last_eval.elapsed() >= self.settings.eval_interval {
                let ctx = EvalContext::current(self.settings.full_duration);
                for anomaly in self.evaluate(&ctx) {
                    self.emit(anomaly);
                }
                last_eval = Instant::now();
            }
        }
    }

    pub fn ingest(&mut self, sample: MetricSample) {
        let before = self.store.len();
        if let Err(e) = self.store.append(&sample.name, sample.measurement) {
            error!(shard = self.id, metric = %sample.name, error = %e, "Failed to store sample");
            return;
        }
        if self.store.len() > before {
            TRACKED_METRICS.inc();
        }
    }

    pub fn trim(&mut self) {
        match self.store.trim_all() {
            Ok(0) => {}
            Ok(trimmed) => debug!(shard = self.id, trimmed, "Trimmed series"),
            Err(e) => error!(shard = self.id, error = %e, "Trim failed"),
        }
    }

    /// Evaluate every metric that received data since the previous cycle.
    /// Returns the anomalies that were significant to the trigger tracker.
    pub fn evaluate(&mut self, ctx: &EvalContext) -> Vec<AnomalyOutput> {
        let mut significant = Vec::new();

        for name in self.store.take_dirty() {
            let timer = EVAL_LATENCY.start_timer();
            let window = match self.store.window(&name, ctx.full_duration, ctx.now) {
                Ok(window) => window,
                Err(e) => {
                    timer.stop_and_discard();
                    error!(shard = self.id, metric = %name, error = %e, "Corrupt series");
                    continue;
                }
            };
            let Some(verdict) = self.policy.evaluate(&window, ctx) else {
                timer.stop_and_discard();
                continue;
            };
            EVALUATIONS_TOTAL.inc();
            timer.observe_duration();

            if !verdict.anomalous {
                continue;
            }
            let Some(&latest) = window.last() else {
                continue;
            };
            ANOMALIES_TOTAL.inc();
            debug!(shard = self.id, metric = %name, fired = verdict.fired.len(), "Consensus anomaly");

            if !track(&mut self.triggers, &name, latest) {
                continue;
            }
            SIGNIFICANT_TOTAL.inc();
            warn!(
                shard = self.id,
                metric = %name,
                value = latest.value,
                timestamp = latest.timestamp,
                "ANOMALY"
            );
            significant.push(AnomalyOutput {
                metric: name,
                timestamp: latest.timestamp,
                value: latest.value,
                fired: verdict.fired,
                evaluated_at: ctx.now,
            });
        }

        significant
    }

    fn emit(&self, anomaly: AnomalyOutput) {
        match self.alerts.try_send(anomaly) {
            Ok(()) => {}
            Err(TrySendError::Full(anomaly)) => {
                ANOMALIES_DROPPED_TOTAL.inc();
                warn!(shard = self.id, metric = %anomaly.metric, "Persistence queue full, anomaly dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                error!(shard = self.id, "Persistence channel closed");
            }
        }
    }

    pub fn store(&self) -> &MetricStore {
        &self.store
    }
}

/// Spawn one parser thread: datagrams in, samples routed to their shard.
/// Exits once the datagram channel is closed.
pub fn spawn_parser(
    id: usize,
    rx: Receiver<Vec<u8>>,
    shards: Arc<Vec<Sender<MetricSample>>>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("vigil-parser-{}", id))
        .spawn(move || {
            info!(parser = id, "Parser active.");
            while let Ok(datagram) = rx.recv() {
                route_datagram(&datagram, &shards);
            }
            info!(parser = id, "Parser stopped.");
        })
}

/// Parse a datagram and hand each sample to its shard without blocking.
pub fn route_datagram(datagram: &[u8], shards: &[Sender<MetricSample>]) {
    for parsed in parse_datagram(datagram) {
        let sample = match parsed {
            Ok(sample) => sample,
            Err(e) => {
                PARSE_ERRORS_TOTAL.inc();
                debug!(error = %e, "Dropping malformed line");
                continue;
            }
        };
        LINES_TOTAL.inc();
        let shard = shard_for(&sample.name, shards.len());
        if shards[shard].try_send(sample).is_err() {
            DROPPED_TOTAL.inc();
        }
    }
}
