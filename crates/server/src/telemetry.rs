//! Prometheus bridge for Smart Match and HTTP metrics.

use std::sync::Arc;
use std::time::Duration;

use matcher::{set_match_metrics, MatchMetrics};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const MATCH_REQUESTS: &str = "lostfound_match_requests_total";
pub const MATCH_EMPTY: &str = "lostfound_match_empty_total";
pub const MATCH_LATENCY: &str = "lostfound_match_latency_seconds";
pub const MATCH_CANDIDATES: &str = "lostfound_match_candidates";
pub const MATCH_HITS: &str = "lostfound_match_hits";
pub const HTTP_REQUESTS: &str = "lostfound_http_requests_total";

/// Forwards matcher observations to the global `metrics` recorder.
#[derive(Debug, Default)]
pub struct PrometheusMatchMetrics;

impl MatchMetrics for PrometheusMatchMetrics {
    fn record_match(&self, latency: Duration, candidates: usize, hit_count: usize) {
        metrics::counter!(MATCH_REQUESTS).increment(1);
        if hit_count == 0 {
            metrics::counter!(MATCH_EMPTY).increment(1);
        }
        metrics::histogram!(MATCH_LATENCY).record(latency.as_secs_f64());
        metrics::histogram!(MATCH_CANDIDATES).record(candidates as f64);
        metrics::histogram!(MATCH_HITS).record(hit_count as f64);
    }
}

/// Install the process-wide Prometheus recorder and hook the matcher into it.
///
/// Can only succeed once per process.
pub fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    set_match_metrics(Some(Arc::new(PrometheusMatchMetrics)));
    Ok(handle)
}
