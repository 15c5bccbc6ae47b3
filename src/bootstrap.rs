// src/bootstrap.rs
use crate::analyze::enrichment::build_gateway;
use crate::config::EnrichmentConfig;
use crate::engine::ScoringEngine;
use crate::lexicon::Lexicon;
use crate::model::Article;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the service and the CLI need, built once from env + config files.
pub struct Runtime {
    pub cfg: EnrichmentConfig,
    pub engine: Arc<ScoringEngine>,
}

impl Runtime {
    pub fn from_env() -> anyhow::Result<Self> {
        let lexicon = Lexicon::from_env()?;
        let cfg = EnrichmentConfig::from_env()?;
        Ok(Self::with_parts(lexicon, cfg))
    }

    pub fn with_parts(lexicon: Arc<Lexicon>, cfg: EnrichmentConfig) -> Self {
        let gateway = build_gateway(&cfg);
        let (ai, claims) = gateway.provider_names();
        // Safe diagnostics: only providers + enabled + key length
        info!(
            "enrichment cfg loaded: enabled={}, ai={}, claims={}, timeout_ms={}, key_len={}",
            cfg.enabled,
            ai,
            claims,
            cfg.timeout_ms,
            cfg.api_key.len()
        );
        let engine = Arc::new(ScoringEngine::new(lexicon, gateway));
        Self { cfg, engine }
    }

    /// One-off smoke analysis; logs the outcome and never fails.
    pub async fn quick_probe(&self) {
        if !self.cfg.enabled && !EnrichmentConfig::test_mode() {
            warn!("quick_probe: enrichment is disabled, probing local signals only");
        }
        let sample = Article::new(
            "Council approves budget after heated debate",
            "According to the city report, spending rises 4% next year. However, critics argue \
             the plan ignores rising rents.",
        );
        let out = self.engine.score(&sample).await;
        info!(
            "quick_probe => bias={:.2}, factual={:.2}, ai={}, fact_checks={}",
            out.overall_bias_score,
            out.overall_factual_score,
            out.ai_detection.is_ai_generated,
            out.fact_check.len()
        );
    }
}
