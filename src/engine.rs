//! # Scoring Engine
//! Orchestrates one article end to end: text signals for title and content, the
//! source verdict, remote enrichment, bias and factual aggregation, then the summary.
//!
//! Never fails. Remote problems degrade to defaults inside the gateway, and
//! malformed input maps to documented verdicts.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::analyze::enrichment::{Enrichment, EnrichmentGateway};
use crate::analyze::signals::{TextAnalysis, TextAnalyzer};
use crate::analyze::{anon_hash, bias, dev_logging_enabled, factual, summary, truncate_vec};
use crate::lexicon::Lexicon;
use crate::model::{AiDetectionResult, AnalysisResult, Article, SourceAnalysis};
use crate::source_reliability::SourceClassifier;

pub struct ScoringEngine {
    analyzer: TextAnalyzer,
    classifier: SourceClassifier,
    gateway: EnrichmentGateway,
}

impl ScoringEngine {
    pub fn new(lexicon: Arc<Lexicon>, gateway: EnrichmentGateway) -> Self {
        Self {
            analyzer: TextAnalyzer::new(lexicon.clone()),
            classifier: SourceClassifier::new(lexicon),
            gateway,
        }
    }

    /// Built-in lexicon, no remote services.
    pub fn offline() -> Self {
        Self::new(Lexicon::builtin(), EnrichmentGateway::disabled())
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }

    pub fn classifier(&self) -> &SourceClassifier {
        &self.classifier
    }

    pub fn gateway(&self) -> &EnrichmentGateway {
        &self.gateway
    }

    pub async fn score(&self, article: &Article) -> AnalysisResult {
        let started = Instant::now();
        let id = anon_hash(&article.content);

        let title = self.analyzer.analyze(&article.title);
        let content = self.analyzer.analyze(&article.content);
        let source = self.classifier.classify(article.source.as_deref());
        debug!(target: "engine", %id, words = content.word_count, source_reliable = source.is_reliable, "signals ready");

        // Nothing to send for an empty body.
        let enrichment = if article.content.trim().is_empty() {
            Enrichment {
                ai_detection: AiDetectionResult::not_detected(),
                claims: Vec::new(),
            }
        } else {
            self.gateway.enrich(&article.content).await
        };

        let result = assemble(&title, &content, source, enrichment);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        counter!("analysis_requests_total").increment(1);
        histogram!("analysis_duration_ms").record(elapsed_ms);
        debug!(
            target: "engine",
            %id,
            bias = result.overall_bias_score,
            factual = result.overall_factual_score,
            findings = result.biases.len(),
            elapsed_ms,
            "analysis done"
        );
        if dev_logging_enabled() {
            let categories: Vec<&str> = result.biases.iter().map(|b| b.category.as_str()).collect();
            debug!(target: "engine", %id, categories = ?truncate_vec(&categories, 5), "dev: bias findings");
        }
        result
    }
}

/// Pure tail of the pipeline: signals + source verdict + enrichment → result.
pub fn assemble(
    title: &TextAnalysis,
    content: &TextAnalysis,
    source: SourceAnalysis,
    enrichment: Enrichment,
) -> AnalysisResult {
    let biases = bias::aggregate(title, content);
    let overall_bias_score = bias::overall_bias_score(&biases);
    let facts = factual::aggregate(title, content, &enrichment.claims, &source);

    let summary = summary::render(
        overall_bias_score,
        facts.overall,
        &enrichment.ai_detection,
        &biases,
        &facts.fact_checks,
        &source,
    );

    debug_assert!((0.0..=1.0).contains(&overall_bias_score));
    debug_assert!((0.0..=1.0).contains(&facts.overall));

    AnalysisResult {
        summary,
        overall_bias_score,
        overall_factual_score: facts.overall,
        detailed_factual_scores: facts.detailed,
        biases,
        fact_check: facts.fact_checks,
        ai_detection: enrichment.ai_detection,
        source_reliability: source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::enrichment::{MockAiDetector, MockClaimDetector};
    use crate::model::Claim;
    use std::time::Duration;

    fn mocked(ai: Option<f32>, claims: Option<Vec<Claim>>) -> ScoringEngine {
        let gateway = EnrichmentGateway::new(
            Arc::new(MockAiDetector { fixed: ai }),
            Arc::new(MockClaimDetector { fixed: claims }),
            Duration::from_secs(1),
        );
        ScoringEngine::new(Lexicon::builtin(), gateway)
    }

    fn article() -> Article {
        Article::new(
            "Shocking scandal rocks city hall",
            "Officials clearly lied, according to the report. Data shows 40% of funds vanished. \
             However, critics argue the audit was rushed.",
        )
        .with_source("https://www.reuters.com/world/story")
    }

    #[tokio::test]
    async fn scoring_is_idempotent_with_deterministic_mocks() {
        let engine = mocked(
            Some(0.3),
            Some(vec![Claim {
                text: "40% of funds vanished".into(),
                score: 0.92,
            }]),
        );
        let a = engine.score(&article()).await;
        let b = engine.score(&article()).await;
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        assert_eq!(a.fact_check.len(), 3);
        assert!(!a.fact_check[2].is_factual);
    }

    #[tokio::test]
    async fn failing_services_degrade_to_baseline() {
        let engine = mocked(None, None);
        let r = engine.score(&article()).await;
        assert!(!r.ai_detection.is_ai_generated);
        assert_eq!(r.ai_detection.confidence, 0.0);
        assert_eq!(r.fact_check.len(), 2);
        assert_eq!(r.detailed_factual_scores.claim_score, 0.5);
        assert!(r.source_reliability.is_reliable);
        assert!(!r.summary.is_empty());
    }

    #[tokio::test]
    async fn ai_flag_reaches_summary() {
        let engine = mocked(Some(0.95), Some(vec![]));
        let r = engine.score(&article()).await;
        assert!(r.ai_detection.is_ai_generated);
        assert!(r.summary.starts_with("Warning:"));
    }

    #[tokio::test]
    async fn empty_article_yields_complete_result() {
        let engine = ScoringEngine::offline();
        let r = engine.score(&Article::new("", "")).await;
        assert_eq!(r.source_reliability.confidence, 0.5);
        assert_eq!(r.fact_check.len(), 2);
        assert!((0.0..=1.0).contains(&r.overall_bias_score));
        assert!((0.0..=1.0).contains(&r.overall_factual_score));
    }
}
