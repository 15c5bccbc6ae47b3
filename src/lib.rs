// src/lib.rs
// Public library surface for the service binary, the CLI and integration tests.

pub mod analyze;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod lexicon;
pub mod model;
pub mod source_reliability;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::bootstrap::Runtime;
pub use crate::engine::ScoringEngine;
pub use crate::error::EnrichmentError;
pub use crate::lexicon::Lexicon;
pub use crate::model::{AnalysisResult, Article};

use axum::Router;
use tracing::info;

/// Full in-process app: runtime from env, API routes, and `/metrics` when
/// `DEBUG_ROUTES=1`. Used by the Shuttle entrypoint and by router tests.
pub async fn app() -> anyhow::Result<Router> {
    let runtime = Runtime::from_env()?;
    let mut router = create_router(AppState::new(runtime.engine.clone()));
    if telemetry::Metrics::enabled_by_env() {
        let m = telemetry::Metrics::init()?;
        router = router.merge(m.router());
        info!("debug routes enabled: /metrics");
    }
    Ok(router)
}

/// Call this from your Shuttle entrypoint (after tracing init) to run one sample
/// article through the configured engine. It won't panic on failure; it just logs.
pub async fn run_quick_probe() -> anyhow::Result<()> {
    let rt = Runtime::from_env()?;
    rt.quick_probe().await;
    info!("quick probe finished");
    Ok(())
}
