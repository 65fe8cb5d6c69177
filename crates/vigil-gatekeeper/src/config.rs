//! Gatekeeper configuration: command-line flags with `VIGIL_*` environment
//! fallbacks.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use vigil_core::{Algorithm, UnknownAlgorithm};

use crate::consensus::ConsensusPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("quorum {quorum} exceeds the {algorithms} configured algorithms")]
    QuorumTooLarge { quorum: usize, algorithms: usize },
    #[error("quorum must be at least 1")]
    ZeroQuorum,
    #[error("no algorithms configured")]
    NoAlgorithms,
    #[error("shard count must be at least 1")]
    ZeroShards,
    #[error("parser count must be at least 1")]
    ZeroParsers,
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error(transparent)]
    UnknownAlgorithm(#[from] UnknownAlgorithm),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "gatekeeper", version, about = "Streaming anomaly detection for Graphite metrics")]
pub struct GatekeeperConfig {
    /// UDP address for Graphite plaintext lines
    #[arg(long, env = "VIGIL_LISTEN", default_value = "0.0.0.0:2001")]
    pub listen: SocketAddr,

    /// HTTP address for /metrics, /health and /stats
    #[arg(long, env = "VIGIL_HTTP", default_value = "0.0.0.0:9101")]
    pub http: SocketAddr,

    /// Number of shard workers (defaults to available parallelism)
    #[arg(long, env = "VIGIL_SHARDS")]
    pub shards: Option<usize>,

    #[arg(long, env = "VIGIL_PARSERS", default_value_t = 2)]
    pub parsers: usize,

    /// Measurements kept per metric
    #[arg(long, env = "VIGIL_MAX_POINTS", default_value_t = 5000)]
    pub max_points: usize,

    #[arg(long, env = "VIGIL_TRIM_INTERVAL_SECS", default_value_t = 1)]
    pub trim_interval_secs: u64,

    #[arg(long, env = "VIGIL_EVAL_INTERVAL_SECS", default_value_t = 10)]
    pub eval_interval_secs: u64,

    /// Seconds of history each evaluation looks at
    #[arg(long, env = "VIGIL_FULL_DURATION", default_value_t = 86_400)]
    pub full_duration: i64,

    /// Windows shorter than this are not evaluated
    #[arg(long, env = "VIGIL_MIN_POINTS", default_value_t = 10)]
    pub min_points: usize,

    /// Detectors that must agree before a window is anomalous
    #[arg(long, env = "VIGIL_QUORUM", default_value_t = crate::consensus::DEFAULT_QUORUM)]
    pub quorum: usize,

    /// Comma-separated detector names (defaults to all)
    #[arg(long, env = "VIGIL_ALGORITHMS", value_delimiter = ',')]
    pub algorithms: Vec<String>,

    /// Directory for hourly anomaly logs
    #[arg(long, env = "VIGIL_ANOMALY_DIR", default_value = ".")]
    pub anomaly_dir: PathBuf,

    /// Capacity of the raw datagram queue
    #[arg(long, env = "VIGIL_DATAGRAM_QUEUE", default_value_t = 1_000_000)]
    pub datagram_queue: usize,

    /// Capacity of each shard's sample queue
    #[arg(long, env = "VIGIL_SHARD_QUEUE", default_value_t = 100_000)]
    pub shard_queue: usize,

    /// Capacity of the persistence queue
    #[arg(long, env = "VIGIL_PERSIST_QUEUE", default_value_t = 200_000)]
    pub persist_queue: usize,
}

impl GatekeeperConfig {
    pub fn shard_count(&self) -> usize {
        self.shards.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(8)
        })
    }

    /// Configured detectors, all of them when none are named.
    pub fn algorithms(&self) -> Result<Vec<Algorithm>, ConfigError> {
        if self.algorithms.is_empty() {
            return Ok(Algorithm::ALL.to_vec());
        }
        let mut resolved = Vec::with_capacity(self.algorithms.len());
        for name in &self.algorithms {
            let algorithm: Algorithm = name.trim().parse()?;
            if !resolved.contains(&algorithm) {
                resolved.push(algorithm);
            }
        }
        Ok(resolved)
    }

    pub fn consensus_policy(&self) -> Result<ConsensusPolicy, ConfigError> {
        ConsensusPolicy::new(self.algorithms()?, self.quorum, self.min_points)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shard_count() == 0 {
            return Err(ConfigError::ZeroShards);
        }
        if self.parsers == 0 {
            return Err(ConfigError::ZeroParsers);
        }
        if self.eval_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("eval_interval_secs"));
        }
        if self.trim_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("trim_interval_secs"));
        }
        self.consensus_policy().map(|_| ())
    }

    pub fn eval_interval(&self) -> Duration {
        Duration::from_secs(self.eval_interval_secs)
    }

    pub fn trim_interval(&self) -> Duration {
        Duration::from_secs(self.trim_interval_secs)
    }
}
