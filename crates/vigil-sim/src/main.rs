//! vigil-sim - UDP Graphite load generator
//!
//! Usage:
//!   vigil-sim --target 127.0.0.1:2001 --metrics 1000 --rate 1000 --duration 30
//!   vigil-sim --rate 5000 --spike-after 20 --spike-factor 10

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::net::UdpSocket;
use tokio::time;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vigil_sim::{MetricUniverse, SimConfig, TickBudget, spike_multiplier};

/// Sends are paced in slices of this length.
const TICK: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(SimConfig::parse());
    anyhow::ensure!(config.metrics > 0, "--metrics must be at least 1");
    anyhow::ensure!(config.senders > 0, "--senders must be at least 1");

    let mut seed_rng = StdRng::seed_from_u64(fastrand::u64(..));
    let universe = Arc::new(
        MetricUniverse::generate(config.metrics, &mut seed_rng).context("building metric baselines")?,
    );

    info!(
        addr = %config.target,
        metrics = config.metrics,
        rate = config.rate,
        senders = config.senders,
        "Load generator initializing"
    );

    let sent_lines = Arc::new(AtomicUsize::new(0));
    let failed_datagrams = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();
    let ticks_per_sec = (Duration::from_secs(1).as_millis() / TICK.as_millis()) as u64;

    let mut handles = Vec::with_capacity(config.senders);
    for _ in 0..config.senders {
        let socket = UdpSocket::bind("0.0.0.0:0").await.context("binding sender socket")?;
        socket.connect(config.target).await.context("connecting to target")?;
        let config = config.clone();
        let universe = universe.clone();
        let sent_lines = sent_lines.clone();
        let failed_datagrams = failed_datagrams.clone();

        handles.push(tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(fastrand::u64(..));
            let mut budget = TickBudget::new(config.rate, config.senders, ticks_per_sec);
            let mut ticker = time::interval(TICK);
            loop {
                ticker.tick().await;
                let elapsed = start.elapsed().as_secs();
                if elapsed >= config.duration {
                    break;
                }
                let factor = spike_multiplier(&config, elapsed);
                let timestamp = chrono::Utc::now().timestamp();
                let lines = budget.next_tick();
                for datagram in universe.datagrams(&mut rng, lines, timestamp, factor) {
                    let lines = datagram.iter().filter(|&&b| b == b'\n').count();
                    match socket.send(&datagram).await {
                        Ok(_) => {
                            sent_lines.fetch_add(lines, Ordering::Relaxed);
                        }
                        Err(_) => {
                            failed_datagrams.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            }
        }));
    }

    // Monitor
    let monitor_lines = sent_lines.clone();
    let duration = config.duration;
    let spike_after = config.spike_after;
    let monitor = tokio::spawn(async move {
        let mut last = 0;
        loop {
            time::sleep(Duration::from_secs(1)).await;
            let current = monitor_lines.load(Ordering::Relaxed);
            let elapsed = start.elapsed().as_secs();
            let spiking = spike_after.is_some_and(|after| elapsed >= after);
            info!(elapsed, lps = current - last, total = current, spiking, "Throughput");
            last = current;
            if elapsed >= duration {
                break;
            }
        }
    });

    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Sender task failed");
        }
    }
    let _ = monitor.await;

    let elapsed = start.elapsed();
    let total = sent_lines.load(Ordering::SeqCst);
    let failed = failed_datagrams.load(Ordering::SeqCst);
    info!(
        total_lines = total,
        failed_datagrams = failed,
        elapsed = ?elapsed,
        average_lps = (total as f64 / elapsed.as_secs_f64()).round(),
        "Run complete"
    );
    Ok(())
}
