// src/config/enrichment.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};

pub const DEFAULT_ENRICHMENT_CONFIG_PATH: &str = "config/enrichment.json";

pub const ENV_ENRICHMENT_CONFIG_PATH: &str = "ENRICHMENT_CONFIG_PATH";
pub const ENV_ENRICHMENT_ENABLED: &str = "ENRICHMENT_ENABLED";
pub const ENV_ENRICHMENT_AI_URL: &str = "ENRICHMENT_AI_URL";
pub const ENV_ENRICHMENT_CLAIMS_URL: &str = "ENRICHMENT_CLAIMS_URL";
pub const ENV_ENRICHMENT_TIMEOUT_MS: &str = "ENRICHMENT_TIMEOUT_MS";
pub const ENV_ENRICHMENT_API_KEY: &str = "ENRICHMENT_API_KEY";
pub const ENV_ENRICHMENT_TEST_MODE: &str = "ENRICHMENT_TEST_MODE";

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 60_000;

pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub enabled: bool,
    /// POST `{ "text" }` → `{ "score" }`
    #[serde(default)]
    pub ai_detector_url: Option<String>,
    /// POST `{ "text" }` → `[{ "text", "score" }]`
    #[serde(default)]
    pub claim_detector_url: Option<String>,
    /// Bearer token; "ENV" means: read from ENRICHMENT_API_KEY. Empty = no auth header.
    #[serde(default)]
    pub api_key: String,
    /// Per-call timeout. Clamped to 100..=60000 ms.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ai_detector_url: None,
            claim_detector_url: None,
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl EnrichmentConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> anyhow::Result<Self> {
        let mut cfg: EnrichmentConfig = serde_json::from_str(data)?;

        // Resolve api key if "ENV"
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = env::var(ENV_ENRICHMENT_API_KEY)
                .map_err(|_| anyhow::anyhow!("Missing {ENV_ENRICHMENT_API_KEY} env var"))?;
        }

        cfg.sanitize();
        Ok(cfg)
    }

    /// Config file (if present) + env overrides.
    /// A missing file means "disabled defaults"; a broken file is an error.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = env::var(ENV_ENRICHMENT_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_ENRICHMENT_CONFIG_PATH.to_string());

        let mut cfg = if Path::new(&path).exists() {
            Self::load_from_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load enrichment config at {path}: {e}"))?
        } else {
            Self::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var(ENV_ENRICHMENT_ENABLED) {
            self.enabled = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = env::var(ENV_ENRICHMENT_AI_URL) {
            self.ai_detector_url = Some(v);
        }
        if let Ok(v) = env::var(ENV_ENRICHMENT_CLAIMS_URL) {
            self.claim_detector_url = Some(v);
        }
        if let Some(ms) = env::var(ENV_ENRICHMENT_TIMEOUT_MS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            self.timeout_ms = ms;
        }
        if self.api_key.is_empty() {
            if let Ok(k) = env::var(ENV_ENRICHMENT_API_KEY) {
                self.api_key = k;
            }
        }
        self.sanitize();
    }

    fn sanitize(&mut self) {
        self.timeout_ms = self.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        for url in [&mut self.ai_detector_url, &mut self.claim_detector_url] {
            if url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                *url = None;
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `ENRICHMENT_TEST_MODE=mock` swaps in deterministic mock detectors.
    pub fn test_mode() -> bool {
        env::var(ENV_ENRICHMENT_TEST_MODE)
            .map(|v| v == "mock")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = EnrichmentConfig::from_json_str(r#"{ "enabled": true }"#).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.timeout_ms, 8_000);
        assert_eq!(cfg.ai_detector_url, None);
    }

    #[test]
    fn timeout_is_clamped_and_blank_urls_dropped() {
        let cfg = EnrichmentConfig::from_json_str(
            r#"{ "enabled": true, "timeout_ms": 5, "ai_detector_url": "  ", "claim_detector_url": "http://x/claims" }"#,
        )
        .unwrap();
        assert_eq!(cfg.timeout_ms, 100);
        assert_eq!(cfg.ai_detector_url, None);
        assert_eq!(cfg.claim_detector_url.as_deref(), Some("http://x/claims"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(EnrichmentConfig::from_json_str("{ nope").is_err());
    }
}
