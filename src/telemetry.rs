use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe the series.
    pub fn init() -> anyhow::Result<Self> {
        static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();
        let handle = HANDLE
            .get_or_try_init(|| {
                // Use default buckets to avoid API differences across crate versions.
                PrometheusBuilder::new()
                    .install_recorder()
                    .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))
            })?
            .clone();
        describe();
        Ok(Self { handle })
    }

    /// `DEBUG_ROUTES=1` exposes `/metrics`.
    pub fn enabled_by_env() -> bool {
        std::env::var(ENV_DEBUG_ROUTES).ok().as_deref() == Some("1")
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metric descriptions (so series show up on /metrics with help text).
fn describe() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("analysis_requests_total", "Articles scored by the engine.");
        describe_histogram!("analysis_duration_ms", "End-to-end scoring time in milliseconds.");
        describe_counter!(
            "enrichment_calls_total",
            "Calls to the remote enrichment services, by service."
        );
        describe_counter!(
            "enrichment_failures_total",
            "Enrichment calls that degraded to defaults, by service and kind."
        );
    });
}
