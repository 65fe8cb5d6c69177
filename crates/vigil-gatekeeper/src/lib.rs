//! Vigil Gatekeeper
//!
//! Graphite-over-UDP ingest in front of the `vigil-core` detectors. Samples
//! are routed by metric name to shard threads, each of which owns its
//! metrics' windows and trigger histories, so no metric is ever touched by
//! two threads.

pub mod codec;
pub mod config;
pub mod consensus;
pub mod http;
pub mod line;
pub mod listener;
pub mod metrics;
pub mod persistence;
pub mod shard;
pub mod store;

pub use codec::CodecError;
pub use config::{ConfigError, GatekeeperConfig};
pub use consensus::{ConsensusPolicy, ConsensusVerdict};
pub use line::{LineError, MetricSample};
pub use shard::{AnomalyOutput, ShardSettings, ShardWorker, shard_for};
pub use store::MetricStore;
