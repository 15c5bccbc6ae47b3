// tests/enrichment_http.rs
//
// HTTP providers against a local axum server on an ephemeral port.
//
// Covered:
// - AI score parsing + strict threshold
// - claims parsing and bearer auth
// - non-2xx, malformed body, out-of-range score, timeout → safe defaults

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use news_credibility_analyzer::analyze::enrichment::{
    build_gateway, EnrichmentGateway, HttpAiDetector, HttpClaimDetector,
};
use news_credibility_analyzer::config::EnrichmentConfig;

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/ai", post(|| async { Json(json!({ "score": 0.93, "model": "stub" })) }))
        .route("/ai-low", post(|| async { Json(json!({ "score": 0.8 })) }))
        .route("/ai-range", post(|| async { Json(json!({ "score": 1.7 })) }))
        .route(
            "/claims",
            post(|| async {
                Json(json!([
                    { "text": "Unemployment fell to 3%", "score": 0.95 },
                    { "text": "The mayor smiled", "score": 0.2 }
                ]))
            }),
        )
        .route(
            "/claims-auth",
            post(|headers: HeaderMap| async move {
                let ok = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer secret");
                if ok {
                    Json(json!([{ "text": "authorized claim", "score": 0.75 }])).into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        )
        .route("/fail", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/garbage", post(|| async { "definitely not json" }))
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "score": 0.5 }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn gateway(base: &str, ai: &str, claims: &str, key: &str, timeout: Duration) -> EnrichmentGateway {
    EnrichmentGateway::new(
        Arc::new(HttpAiDetector::new(format!("{base}{ai}"), key, timeout).expect("ai client")),
        Arc::new(HttpClaimDetector::new(format!("{base}{claims}"), key, timeout).expect("claims client")),
        timeout,
    )
}

#[tokio::test]
async fn successful_calls_are_parsed() {
    let base = spawn_server().await;
    let gw = gateway(&base, "/ai", "/claims", "", Duration::from_secs(2));

    let e = gw.enrich("Some article body").await;
    assert!(e.ai_detection.is_ai_generated);
    assert!((e.ai_detection.confidence - 0.93).abs() < 1e-6);
    assert_eq!(e.claims.len(), 2);
    assert_eq!(e.claims[0].text, "Unemployment fell to 3%");
}

#[tokio::test]
async fn score_at_threshold_is_not_ai() {
    let base = spawn_server().await;
    let gw = gateway(&base, "/ai-low", "/claims", "", Duration::from_secs(2));
    let r = gw.detect_ai_authorship("text").await;
    assert!(!r.is_ai_generated);
    assert!((r.confidence - 0.8).abs() < 1e-6);
}

#[tokio::test]
async fn bearer_key_is_sent() {
    let base = spawn_server().await;
    let with_key = gateway(&base, "/ai", "/claims-auth", "secret", Duration::from_secs(2));
    assert_eq!(with_key.detect_checkworthy_claims("t").await.len(), 1);

    let without = gateway(&base, "/ai", "/claims-auth", "", Duration::from_secs(2));
    assert!(without.detect_checkworthy_claims("t").await.is_empty());
}

#[tokio::test]
async fn server_errors_degrade_independently() {
    let base = spawn_server().await;
    let gw = gateway(&base, "/fail", "/claims", "", Duration::from_secs(2));
    let e = gw.enrich("text").await;
    assert!(!e.ai_detection.is_ai_generated);
    assert_eq!(e.ai_detection.confidence, 0.0);
    assert_eq!(e.claims.len(), 2, "claims unaffected by AI failure");
}

#[tokio::test]
async fn malformed_bodies_degrade() {
    let base = spawn_server().await;
    let gw = gateway(&base, "/ai-range", "/garbage", "", Duration::from_secs(2));
    let e = gw.enrich("text").await;
    assert_eq!(e.ai_detection.confidence, 0.0);
    assert!(e.claims.is_empty());
}

#[tokio::test]
async fn slow_service_times_out() {
    let base = spawn_server().await;
    let gw = gateway(&base, "/slow", "/slow", "", Duration::from_millis(200));
    let started = std::time::Instant::now();
    let e = gw.enrich("text").await;
    assert!(started.elapsed() < Duration::from_secs(2), "calls run concurrently under timeout");
    assert_eq!(e.ai_detection.confidence, 0.0);
    assert!(e.claims.is_empty());
}

#[tokio::test]
async fn connection_refused_degrades() {
    // Nothing listens on port 9 locally.
    let gw = gateway("http://127.0.0.1:9", "/ai", "/claims", "", Duration::from_millis(500));
    let e = gw.enrich("text").await;
    assert!(!e.ai_detection.is_ai_generated);
    assert!(e.claims.is_empty());
}

#[tokio::test]
async fn config_with_urls_builds_http_gateway() {
    let base = spawn_server().await;
    let cfg = EnrichmentConfig {
        enabled: true,
        ai_detector_url: Some(format!("{base}/ai")),
        claim_detector_url: None,
        api_key: String::new(),
        timeout_ms: 2_000,
    };
    let gw = build_gateway(&cfg);
    assert_eq!(gw.provider_names(), ("http", "disabled"));
    let e = gw.enrich("text").await;
    assert!(e.ai_detection.is_ai_generated);
    assert!(e.claims.is_empty());
}
