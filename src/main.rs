//! News Credibility Analyzer: Binary Entrypoint
//! Boots the Axum HTTP server with the scoring engine, history and optional metrics.
//!
//! See `README.md` for quickstart and configuration.

use news_credibility_analyzer::analyze::ENV_DEV_LOG;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - CREDIBILITY_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var(ENV_DEV_LOG).ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("news_credibility_analyzer=debug,engine=debug,warn"));

    // Shuttle may already have installed a global subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let router = news_credibility_analyzer::app().await?;

    if std::env::var("CREDIBILITY_QUICK_PROBE").ok().as_deref() == Some("1") {
        if let Err(e) = news_credibility_analyzer::run_quick_probe().await {
            tracing::warn!(error = ?e, "quick probe didn't run");
        }
    }

    Ok(router.into())
}
