//! Synthetic Graphite traffic for exercising a gatekeeper.
//!
//! Each simulated metric has its own Gaussian baseline; an optional spike
//! multiplies every value after a given offset so that detectors have
//! something to find.

use std::net::SocketAddr;

use clap::Parser;
use rand::Rng;
use rand::distr::{Alphanumeric, Distribution};
use rand_distr::{Normal, NormalError};

/// Metric names are this many alphanumeric characters.
pub const NAME_LEN: usize = 32;

/// Keep datagrams below a typical Ethernet MTU.
pub const MAX_DATAGRAM: usize = 1_400;

#[derive(Parser, Debug, Clone)]
#[command(name = "vigil-sim", about = "UDP Graphite load generator")]
pub struct SimConfig {
    /// Gatekeeper UDP address
    #[arg(long, default_value = "127.0.0.1:2001")]
    pub target: SocketAddr,

    /// Distinct metric names
    #[arg(long, default_value_t = 1000)]
    pub metrics: usize,

    /// Lines per second across all senders
    #[arg(long, default_value_t = 1000)]
    pub rate: u64,

    /// Seconds to run
    #[arg(long, default_value_t = 30)]
    pub duration: u64,

    #[arg(long, default_value_t = 4)]
    pub senders: usize,

    /// Seconds after start at which values are multiplied
    #[arg(long)]
    pub spike_after: Option<u64>,

    #[arg(long, default_value_t = 10.0)]
    pub spike_factor: f64,
}

/// Random metric name of [`NAME_LEN`] characters.
pub fn metric_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(Alphanumeric)
        .take(NAME_LEN)
        .map(char::from)
        .collect()
}

pub fn format_line(name: &str, value: f64, timestamp: i64) -> String {
    format!("{} {} {}\n", name, value, timestamp)
}

/// The simulated metrics and their value distributions.
#[derive(Debug, Clone)]
pub struct MetricUniverse {
    names: Vec<String>,
    baselines: Vec<Normal<f64>>,
}

impl MetricUniverse {
    /// `count` metrics with means drawn from `[10, 1000)` and a 5% spread.
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Self, NormalError> {
        let mut names = Vec::with_capacity(count);
        let mut baselines = Vec::with_capacity(count);
        for _ in 0..count {
            names.push(metric_name(rng));
            let mean = rng.random_range(10.0..1000.0);
            baselines.push(Normal::new(mean, mean * 0.05)?);
        }
        Ok(Self { names, baselines })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// One line for a random metric, its value scaled by `factor`.
    pub fn sample_line<R: Rng + ?Sized>(&self, rng: &mut R, timestamp: i64, factor: f64) -> String {
        let i = rng.random_range(0..self.names.len());
        let value = self.baselines[i].sample(rng) * factor;
        format_line(&self.names[i], value, timestamp)
    }

    /// Pack `lines` sampled lines into datagrams of at most
    /// [`MAX_DATAGRAM`] bytes (a single oversized line gets its own).
    pub fn datagrams<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        lines: usize,
        timestamp: i64,
        factor: f64,
    ) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }
        let mut current = Vec::with_capacity(MAX_DATAGRAM);
        for _ in 0..lines {
            let line = self.sample_line(rng, timestamp, factor);
            if !current.is_empty() && current.len() + line.len() > MAX_DATAGRAM {
                out.push(std::mem::replace(&mut current, Vec::with_capacity(MAX_DATAGRAM)));
            }
            current.extend_from_slice(line.as_bytes());
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

/// Spreads a per-second line budget over fixed ticks without losing the
/// remainder: over any whole second the sender emits exactly its share.
#[derive(Debug, Clone)]
pub struct TickBudget {
    lines_per_sec: u64,
    ticks_per_sec: u64,
    carry: u64,
}

impl TickBudget {
    /// `rate` lines per second shared by `senders` senders.
    pub fn new(rate: u64, senders: usize, ticks_per_sec: u64) -> Self {
        let senders = senders.max(1) as u64;
        Self {
            lines_per_sec: rate,
            ticks_per_sec: ticks_per_sec.max(1) * senders,
            carry: 0,
        }
    }

    /// Lines to send on the next tick.
    pub fn next_tick(&mut self) -> usize {
        self.carry += self.lines_per_sec;
        let lines = self.carry / self.ticks_per_sec;
        self.carry %= self.ticks_per_sec;
        lines as usize
    }
}

/// Multiplier in effect `elapsed_secs` into the run.
pub fn spike_multiplier(config: &SimConfig, elapsed_secs: u64) -> f64 {
    match config.spike_after {
        Some(after) if elapsed_secs >= after => config.spike_factor,
        _ => 1.0,
    }
}
