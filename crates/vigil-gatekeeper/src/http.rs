//! Operational HTTP endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::consensus::ConsensusPolicy;
use crate::metrics;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub version: &'static str,
    pub algorithms: Vec<&'static str>,
    pub quorum: usize,
    pub shards: usize,
}

impl Stats {
    pub fn new(policy: &ConsensusPolicy, shards: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            algorithms: policy.algorithms().iter().map(|a| a.name()).collect(),
            quorum: policy.quorum(),
            shards,
        }
    }
}

async fn metrics_handler() -> String {
    metrics::render()
}

async fn stats_handler(State(stats): State<Arc<Stats>>) -> Json<Stats> {
    Json(stats.as_ref().clone())
}

pub fn router(stats: Stats) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(|| async { "OK" }))
        .route("/stats", get(stats_handler))
        .with_state(Arc::new(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn get_body(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[test]
    fn test_stats_reflect_policy() {
        let stats = Stats::new(&ConsensusPolicy::default(), 4);
        assert_eq!(stats.algorithms.len(), 8);
        assert_eq!(stats.algorithms[0], "median_absolute_deviation");
        assert_eq!(stats.quorum, 6);
        assert_eq!(stats.shards, 4);
    }

    #[tokio::test]
    async fn test_routes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Stats::new(&ConsensusPolicy::default(), 2));
        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        let health = get_body(addr, "/health").await;
        assert!(health.starts_with("HTTP/1.1 200"));
        assert!(health.ends_with("OK"));

        let stats = get_body(addr, "/stats").await;
        assert!(stats.contains("\"quorum\":6"));
        assert!(stats.contains("\"shards\":2"));

        server.abort();
    }
}
