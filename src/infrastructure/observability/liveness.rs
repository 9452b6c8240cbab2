//! Liveness endpoint.
//!
//! `GET /` answers with a static alive message for uptime pingers;
//! `GET /metrics` serves the Prometheus text rendering.

use crate::infrastructure::observability::metrics::Metrics;
use axum::{Router, extract::State, routing::get};
use tracing::info;

pub const ALIVE_MESSAGE: &str = "Futures pump bot is alive";

pub struct LivenessServer {
    metrics: Metrics,
}

impl LivenessServer {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(alive))
            .route("/metrics", get(render_metrics))
            .with_state(self.metrics.clone())
    }

    /// Bind and serve until the process exits.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Liveness endpoint listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

async fn alive() -> &'static str {
    ALIVE_MESSAGE
}

async fn render_metrics(State(metrics): State<Metrics>) -> String {
    metrics.render()
}
