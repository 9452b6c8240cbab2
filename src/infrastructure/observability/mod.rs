//! Observability for Pumpscout
//!
//! 1. **Prometheus registry**: counters and gauges for the stream pipeline
//! 2. **Structured JSON Logs**: periodic `METRICS_JSON:` snapshots to stdout
//! 3. **Liveness endpoint**: static alive route plus `/metrics`

pub mod liveness;
pub mod metrics;
pub mod reporter;

pub use liveness::LivenessServer;
pub use metrics::Metrics;
pub use reporter::MetricsReporter;
