use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use crossbeam_channel::bounded;
use tokio::net::{TcpListener, UdpSocket};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vigil_gatekeeper::http::{self, Stats};
use vigil_gatekeeper::listener::run_udp_listener;
use vigil_gatekeeper::persistence::PersistenceManager;
use vigil_gatekeeper::shard::spawn_parser;
use vigil_gatekeeper::{GatekeeperConfig, MetricSample, ShardSettings, ShardWorker, metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatekeeperConfig::parse();
    config.validate()?;
    let policy = Arc::new(config.consensus_policy()?);
    let shard_count = config.shard_count();

    info!(
        shards = shard_count,
        parsers = config.parsers,
        quorum = policy.quorum(),
        algorithms = policy.algorithms().len(),
        "Initializing Vigil gatekeeper"
    );
    metrics::init();

    // Persistence
    std::fs::create_dir_all(&config.anomaly_dir)
        .with_context(|| format!("creating {}", config.anomaly_dir.display()))?;
    let (alert_tx, alert_rx) = bounded(config.persist_queue);
    let persistence_handle = PersistenceManager::spawn(alert_rx, config.anomaly_dir.clone())?;

    // Shards
    let settings = ShardSettings {
        max_points: config.max_points,
        full_duration: config.full_duration,
        eval_interval: config.eval_interval(),
        trim_interval: config.trim_interval(),
    };
    let mut shard_txs = Vec::with_capacity(shard_count);
    let mut shard_handles = Vec::with_capacity(shard_count);
    for id in 0..shard_count {
        let (tx, rx) = bounded::<MetricSample>(config.shard_queue);
        shard_txs.push(tx);
        let worker = ShardWorker::new(id, rx, policy.clone(), alert_tx.clone(), settings.clone());
        shard_handles.push(worker.spawn()?);
    }
    // Only the shards hold the alert sender from here on.
    drop(alert_tx);

    // Parsers
    let shard_txs = Arc::new(shard_txs);
    let (datagram_tx, datagram_rx) = bounded::<Vec<u8>>(config.datagram_queue);
    let mut parser_handles = Vec::with_capacity(config.parsers);
    for id in 0..config.parsers {
        parser_handles.push(spawn_parser(id, datagram_rx.clone(), shard_txs.clone())?);
    }
    drop(datagram_rx);
    drop(shard_txs);

    // UDP
    let socket = UdpSocket::bind(config.listen)
        .await
        .with_context(|| format!("binding UDP {}", config.listen))?;
    let udp_task = tokio::spawn(async move {
        if let Err(e) = run_udp_listener(socket, datagram_tx).await {
            error!(error = %e, "UDP listener failed");
        }
    });

    // HTTP
    let app = http::router(Stats::new(&policy, shard_count));
    let listener = TcpListener::bind(config.http)
        .await
        .with_context(|| format!("binding HTTP {}", config.http))?;
    info!(addr = %config.http, "HTTP listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to install CTRL+C handler");
            }
            info!("Shutting down... (Waiting for queues to drain)");
        })
        .await
        .context("HTTP server")?;

    // Dropping the listener closes the datagram queue; closure then cascades
    // through parsers, shards and persistence.
    udp_task.abort();
    let _ = udp_task.await;

    for handle in parser_handles {
        handle.join().map_err(|_| anyhow!("parser panicked"))?;
    }
    for handle in shard_handles {
        handle.join().map_err(|_| anyhow!("shard worker panicked"))?;
    }
    info!("All shards drained and stopped.");

    persistence_handle
        .join()
        .map_err(|_| anyhow!("persistence panicked"))?;
    info!("Persistence flushed. Goodbye.");
    Ok(())
}
