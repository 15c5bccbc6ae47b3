//! Enrichment gateway: detector abstraction + HTTP providers + failure-tolerant calls.
//!
//! Two independent remote capabilities:
//! - AI-authorship detection: `POST { "text" }` → `{ "score": f32 }`
//! - check-worthy claim detection: `POST { "text" }` → `[{ "text", "score" }]`
//!
//! The gateway never returns an error. Transport errors, non-2xx statuses, malformed
//! bodies, timeouts and disabled services are logged, counted, and turned into the safe
//! defaults (`not AI, confidence 0` / no claims).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::error::EnrichmentError;
use crate::model::{AiDetectionResult, Claim};

/// Scores strictly above this mark the article as AI-generated.
pub const AI_GENERATED_THRESHOLD: f32 = 0.8;

const SERVICE_AI: &str = "ai_detection";
const SERVICE_CLAIMS: &str = "claim_detection";

// ------------------------------------------------------------
// Detector traits
// ------------------------------------------------------------

#[async_trait]
pub trait AiDetector: Send + Sync {
    /// Probability in `<0, 1>` that the text was machine-written.
    async fn detect(&self, text: &str) -> Result<f32, EnrichmentError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait ClaimDetector: Send + Sync {
    /// Check-worthy claims in service order.
    async fn detect(&self, text: &str) -> Result<Vec<Claim>, EnrichmentError>;
    fn name(&self) -> &'static str;
}

pub type DynAiDetector = Arc<dyn AiDetector>;
pub type DynClaimDetector = Arc<dyn ClaimDetector>;

// ------------------------------------------------------------
// HTTP providers
// ------------------------------------------------------------

#[derive(Serialize)]
struct TextReq<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct AiResp {
    score: f32,
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, EnrichmentError> {
    let http = reqwest::Client::builder()
        .user_agent("news-credibility-analyzer/0.1")
        .connect_timeout(Duration::from_secs(4))
        .timeout(timeout)
        .build()?;
    Ok(http)
}

async fn post_text<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    text: &str,
) -> Result<T, EnrichmentError> {
    let mut req = http.post(url).json(&TextReq { text });
    if !api_key.is_empty() {
        req = req.bearer_auth(api_key);
    }
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(EnrichmentError::Status(status.as_u16()));
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| EnrichmentError::Malformed(e.to_string()))
}

pub struct HttpAiDetector {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpAiDetector {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, EnrichmentError> {
        Ok(Self {
            http: http_client(timeout)?,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl AiDetector for HttpAiDetector {
    async fn detect(&self, text: &str) -> Result<f32, EnrichmentError> {
        let body: AiResp = post_text(&self.http, &self.url, &self.api_key, text).await?;
        if !body.score.is_finite() || !(0.0..=1.0).contains(&body.score) {
            return Err(EnrichmentError::Malformed(format!(
                "score out of range: {}",
                body.score
            )));
        }
        Ok(body.score)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

pub struct HttpClaimDetector {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpClaimDetector {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, EnrichmentError> {
        Ok(Self {
            http: http_client(timeout)?,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ClaimDetector for HttpClaimDetector {
    async fn detect(&self, text: &str) -> Result<Vec<Claim>, EnrichmentError> {
        post_text(&self.http, &self.url, &self.api_key, text).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Always fails with `Disabled`; used when a service is not configured.
pub struct DisabledDetector;

#[async_trait]
impl AiDetector for DisabledDetector {
    async fn detect(&self, _text: &str) -> Result<f32, EnrichmentError> {
        Err(EnrichmentError::Disabled)
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[async_trait]
impl ClaimDetector for DisabledDetector {
    async fn detect(&self, _text: &str) -> Result<Vec<Claim>, EnrichmentError> {
        Err(EnrichmentError::Disabled)
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic AI detector for tests/local runs. `None` simulates an outage.
#[derive(Clone)]
pub struct MockAiDetector {
    pub fixed: Option<f32>,
}

#[async_trait]
impl AiDetector for MockAiDetector {
    async fn detect(&self, _text: &str) -> Result<f32, EnrichmentError> {
        self.fixed.ok_or(EnrichmentError::Status(503))
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Deterministic claim detector for tests/local runs. `None` simulates an outage.
#[derive(Clone)]
pub struct MockClaimDetector {
    pub fixed: Option<Vec<Claim>>,
}

#[async_trait]
impl ClaimDetector for MockClaimDetector {
    async fn detect(&self, _text: &str) -> Result<Vec<Claim>, EnrichmentError> {
        self.fixed.clone().ok_or(EnrichmentError::Status(503))
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

// ------------------------------------------------------------
// Gateway
// ------------------------------------------------------------

/// Output of both enrichment calls for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub ai_detection: AiDetectionResult,
    pub claims: Vec<Claim>,
}

#[derive(Clone)]
pub struct EnrichmentGateway {
    ai: DynAiDetector,
    claims: DynClaimDetector,
    timeout: Duration,
}

impl EnrichmentGateway {
    pub fn new(ai: DynAiDetector, claims: DynClaimDetector, timeout: Duration) -> Self {
        Self {
            ai,
            claims,
            timeout,
        }
    }

    pub fn disabled() -> Self {
        Self::new(
            Arc::new(DisabledDetector),
            Arc::new(DisabledDetector),
            Duration::from_millis(crate::config::enrichment::DEFAULT_TIMEOUT_MS),
        )
    }

    /// `(ai provider, claim provider)` names for diagnostics.
    pub fn provider_names(&self) -> (&'static str, &'static str) {
        (self.ai.name(), self.claims.name())
    }

    pub async fn detect_ai_authorship(&self, text: &str) -> AiDetectionResult {
        counter!("enrichment_calls_total", "service" => SERVICE_AI).increment(1);
        let res = match tokio::time::timeout(self.timeout, self.ai.detect(text)).await {
            Ok(r) => r,
            Err(_) => Err(EnrichmentError::Timeout(self.timeout)),
        };
        match res {
            Ok(score) => AiDetectionResult {
                is_ai_generated: score > AI_GENERATED_THRESHOLD,
                confidence: score,
            },
            Err(e) => {
                record_failure(SERVICE_AI, self.ai.name(), &e);
                AiDetectionResult::not_detected()
            }
        }
    }

    pub async fn detect_checkworthy_claims(&self, text: &str) -> Vec<Claim> {
        counter!("enrichment_calls_total", "service" => SERVICE_CLAIMS).increment(1);
        let res = match tokio::time::timeout(self.timeout, self.claims.detect(text)).await {
            Ok(r) => r,
            Err(_) => Err(EnrichmentError::Timeout(self.timeout)),
        };
        res.unwrap_or_else(|e| {
            record_failure(SERVICE_CLAIMS, self.claims.name(), &e);
            Vec::new()
        })
    }

    /// Both calls concurrently; neither failure affects the other.
    pub async fn enrich(&self, text: &str) -> Enrichment {
        let (ai_detection, claims) = tokio::join!(
            self.detect_ai_authorship(text),
            self.detect_checkworthy_claims(text)
        );
        Enrichment {
            ai_detection,
            claims,
        }
    }
}

fn record_failure(service: &'static str, provider: &'static str, err: &EnrichmentError) {
    if matches!(err, EnrichmentError::Disabled) {
        debug!(service, "enrichment service disabled; using default");
        return;
    }
    warn!(service, provider, kind = err.kind(), error = %err, "enrichment call failed; using default");
    counter!("enrichment_failures_total", "service" => service, "kind" => err.kind()).increment(1);
}

/// Factory: build the gateway according to config and environment variables.
///
/// * If `ENRICHMENT_TEST_MODE=mock`, returns deterministic mock detectors.
/// * Else if `config.enabled == false`, both services are disabled.
/// * Else each service with a URL gets an HTTP provider; the other stays disabled.
pub fn build_gateway(config: &EnrichmentConfig) -> EnrichmentGateway {
    let timeout = config.timeout();

    if EnrichmentConfig::test_mode() {
        return EnrichmentGateway::new(
            Arc::new(MockAiDetector { fixed: Some(0.1) }),
            Arc::new(MockClaimDetector {
                fixed: Some(Vec::new()),
            }),
            timeout,
        );
    }

    if !config.enabled {
        return EnrichmentGateway::disabled();
    }

    let ai: DynAiDetector = match config.ai_detector_url.as_deref() {
        Some(url) => match HttpAiDetector::new(url, config.api_key.clone(), timeout) {
            Ok(d) => Arc::new(d),
            Err(e) => {
                warn!(error = %e, "AI detector client build failed; disabled");
                Arc::new(DisabledDetector)
            }
        },
        None => Arc::new(DisabledDetector),
    };

    let claims: DynClaimDetector = match config.claim_detector_url.as_deref() {
        Some(url) => match HttpClaimDetector::new(url, config.api_key.clone(), timeout) {
            Ok(d) => Arc::new(d),
            Err(e) => {
                warn!(error = %e, "claim detector client build failed; disabled");
                Arc::new(DisabledDetector)
            }
        },
        None => Arc::new(DisabledDetector),
    };

    EnrichmentGateway::new(ai, claims, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowDetector;

    #[async_trait]
    impl AiDetector for SlowDetector {
        async fn detect(&self, _text: &str) -> Result<f32, EnrichmentError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(0.99)
        }
        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn gateway(ai: Option<f32>, claims: Option<Vec<Claim>>) -> EnrichmentGateway {
        EnrichmentGateway::new(
            Arc::new(MockAiDetector { fixed: ai }),
            Arc::new(MockClaimDetector { fixed: claims }),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn ai_threshold_is_strict() {
        let at = gateway(Some(0.8), None).detect_ai_authorship("x").await;
        assert!(!at.is_ai_generated);
        assert_eq!(at.confidence, 0.8);

        let above = gateway(Some(0.81), None).detect_ai_authorship("x").await;
        assert!(above.is_ai_generated);
    }

    #[tokio::test]
    async fn failures_degrade_to_defaults() {
        let e = gateway(None, None).enrich("x").await;
        assert_eq!(e.ai_detection, AiDetectionResult::not_detected());
        assert!(e.claims.is_empty());
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_the_other() {
        let claims = vec![Claim {
            text: "Unemployment fell to 3%.".into(),
            score: 0.95,
        }];
        let e = gateway(None, Some(claims.clone())).enrich("x").await;
        assert_eq!(e.ai_detection, AiDetectionResult::not_detected());
        assert_eq!(e.claims, claims);
    }

    #[tokio::test]
    async fn timeout_degrades_to_default() {
        let gw = EnrichmentGateway::new(
            Arc::new(SlowDetector),
            Arc::new(DisabledDetector),
            Duration::from_millis(50),
        );
        let res = gw.detect_ai_authorship("x").await;
        assert_eq!(res, AiDetectionResult::not_detected());
    }

    #[test]
    fn disabled_config_builds_disabled_gateway() {
        let gw = build_gateway(&EnrichmentConfig::default());
        if !EnrichmentConfig::test_mode() {
            assert_eq!(gw.provider_names(), ("disabled", "disabled"));
        }
    }
}
