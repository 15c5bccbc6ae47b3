//! Factual aggregator: content signals, the source verdict and check-worthy claims
//! combine into one factual score plus a short list of fact-check findings.

use super::sanitize_snippet;
use super::signals::TextAnalysis;
use crate::model::{clamp01, Claim, DetailedFactualScores, FactCheckResult, SourceAnalysis};

// Weights for the overall factual score; they sum to 1.0.
pub const WEIGHT_SOURCE: f32 = 0.4;
pub const WEIGHT_CITATION: f32 = 0.1;
pub const WEIGHT_FACTUAL_PHRASES: f32 = 0.25;
pub const WEIGHT_BALANCE: f32 = 0.15;
pub const WEIGHT_CLAIM: f32 = 0.1;

/// Claims at or below this score are not worth a fact-check entry.
pub const CLAIM_MIN_SCORE: f32 = 0.7;
pub const MAX_CLAIMS: usize = 3;
/// From here on a claim is flagged as questionable.
pub const QUESTIONABLE_CLAIM_SCORE: f32 = 0.9;
/// Claim score when no claim made it into the findings.
pub const NEUTRAL_CLAIM_SCORE: f32 = 0.5;

/// Citation support counts as sufficient above this score.
pub const CITATION_SUFFICIENT: f32 = 0.3;
/// Balance counts as adequate above this score (one viewpoint marker is 1/3).
pub const BALANCE_SUFFICIENT: f32 = 0.3;

const CLAIM_SNIPPET_CHARS: usize = 160;
const CITED_EVIDENCE: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct FactualAssessment {
    pub overall: f32,
    pub detailed: DetailedFactualScores,
    /// Citation entry, balance entry, then up to `MAX_CLAIMS` claim entries.
    pub fact_checks: Vec<FactCheckResult>,
}

pub fn aggregate(
    title: &TextAnalysis,
    content: &TextAnalysis,
    claims: &[Claim],
    source: &SourceAnalysis,
) -> FactualAssessment {
    let support = &content.factual_support;
    let citation_score = clamp01(support.score);
    let balance_score = clamp01(content.balanced_reporting.score);

    let mut fact_checks = vec![
        citation_entry(citation_score, title, content),
        balance_entry(balance_score, content),
    ];

    let claim_checks: Vec<FactCheckResult> = select_claims(claims).map(claim_entry).collect();
    let claim_score = if claim_checks.is_empty() {
        NEUTRAL_CLAIM_SCORE
    } else {
        claim_checks.iter().map(|c| c.confidence).sum::<f32>() / claim_checks.len() as f32
    };
    fact_checks.extend(claim_checks);

    let detailed = DetailedFactualScores {
        source_reliability_score: clamp01(source.confidence),
        citation_score,
        factual_phrases_score: factual_phrases_score(support.factual_phrase_count),
        balance_score,
        claim_score: clamp01(claim_score),
    };

    FactualAssessment {
        overall: overall_factual_score(&detailed),
        detailed,
        fact_checks,
    }
}

/// `min(n / (max(n, 1) * 0.7), 1)`: 0 without factual phrases, 1 from the first one on.
pub fn factual_phrases_score(n: usize) -> f32 {
    let n = n as f32;
    clamp01(n / (n.max(1.0) * 0.7))
}

pub fn overall_factual_score(d: &DetailedFactualScores) -> f32 {
    debug_assert!(
        (WEIGHT_SOURCE + WEIGHT_CITATION + WEIGHT_FACTUAL_PHRASES + WEIGHT_BALANCE + WEIGHT_CLAIM
            - 1.0)
            .abs()
            < 1e-6
    );
    let overall = WEIGHT_SOURCE * d.source_reliability_score
        + WEIGHT_CITATION * d.citation_score
        + WEIGHT_FACTUAL_PHRASES * d.factual_phrases_score
        + WEIGHT_BALANCE * d.balance_score
        + WEIGHT_CLAIM * d.claim_score;
    debug_assert!((-1e-6..=1.0 + 1e-6).contains(&overall));
    clamp01(overall)
}

/// Claims above `CLAIM_MIN_SCORE`, provider order kept, first `MAX_CLAIMS`.
pub fn select_claims(claims: &[Claim]) -> impl Iterator<Item = &Claim> {
    claims
        .iter()
        .filter(|c| c.score > CLAIM_MIN_SCORE)
        .take(MAX_CLAIMS)
}

fn claim_entry(claim: &Claim) -> FactCheckResult {
    let text = sanitize_snippet(&claim.text, CLAIM_SNIPPET_CHARS);
    let questionable = claim.score >= QUESTIONABLE_CLAIM_SCORE;
    let explanation = if questionable {
        format!("Highly check-worthy claim that needs independent verification: \"{text}\"")
    } else {
        format!("Check-worthy claim worth verifying: \"{text}\"")
    };
    FactCheckResult {
        is_factual: !questionable,
        confidence: clamp01(claim.score),
        explanation,
    }
}

fn citation_entry(score: f32, title: &TextAnalysis, content: &TextAnalysis) -> FactCheckResult {
    if score > CITATION_SUFFICIENT {
        let evidence = citation_evidence(title, content);
        let examples = if evidence.is_empty() {
            String::new()
        } else {
            let quoted: Vec<String> = evidence.iter().map(|e| format!("\"{e}\"")).collect();
            format!(" (e.g. {})", quoted.join(", "))
        };
        FactCheckResult {
            is_factual: true,
            confidence: score,
            explanation: format!(
                "Claims are supported by citations or data references{examples}."
            ),
        }
    } else {
        FactCheckResult {
            is_factual: false,
            confidence: clamp01(1.0 - score),
            explanation: "The article offers few citations or data references to support its claims."
                .to_string(),
        }
    }
}

/// Distinct citation phrases, content first, at most two.
fn citation_evidence<'a>(title: &'a TextAnalysis, content: &'a TextAnalysis) -> Vec<&'a str> {
    let fs = &content.factual_support;
    let mut out: Vec<&str> = Vec::new();
    for p in fs
        .citations
        .iter()
        .chain(fs.factual_phrases.iter())
        .chain(title.factual_support.citations.iter())
    {
        if out.len() >= CITED_EVIDENCE {
            break;
        }
        if !out.contains(&p.as_str()) {
            out.push(p.as_str());
        }
    }
    out
}

fn balance_entry(score: f32, content: &TextAnalysis) -> FactCheckResult {
    if score > BALANCE_SUFFICIENT {
        let markers = &content.balanced_reporting.phrases;
        let explanation = if markers.is_empty() {
            "Multiple viewpoints are quoted in the article.".to_string()
        } else {
            format!(
                "Multiple viewpoints are presented ({}).",
                markers
                    .iter()
                    .map(|m| format!("\"{m}\""))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        FactCheckResult {
            is_factual: true,
            confidence: score,
            explanation,
        }
    } else {
        FactCheckResult {
            is_factual: false,
            confidence: clamp01(1.0 - score),
            explanation: "The article presents mainly one perspective without opposing viewpoints."
                .to_string(),
        }
    }
}
