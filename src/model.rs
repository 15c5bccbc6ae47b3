//! model.rs: records exchanged with callers, the article in and the credibility report out.
//!
//! Field names serialize in camelCase.

use serde::{Deserialize, Serialize};

/// Article as pasted by the user. Only `title` and `content` carry signal;
/// `source` feeds the reliability classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Builder style: attach a source URL.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }

    /// Demo article for the UI "load example" action, dated today.
    pub fn example() -> Self {
        Self {
            title: "New Study Reveals Surprising Economic Trends".into(),
            content: "In a groundbreaking study released yesterday, economists found that recent \
                policy changes have had a dramatic impact on middle-class families. The controversial \
                findings suggest the administration's approach has failed to address key concerns of \
                everyday citizens.\n\n\
                Dr. Jane Smith, lead researcher on the study, stated that \"the data clearly shows a \
                pattern that many political leaders are choosing to ignore.\" Critics, however, have \
                questioned the methodology, pointing to potential flaws in data collection.\n\n\
                Meanwhile, supporters of the current policies argue that the study fails to account \
                for long-term benefits. \"This is just another example of biased research pushing a \
                specific agenda,\" said government spokesperson John Davis.\n\n\
                The study arrives as lawmakers debate the next phase of economic legislation, with \
                billions of dollars at stake."
                .into(),
            source: Some("Example News Network".into()),
            author: Some("Sample Author".into()),
            date: Some(chrono::Utc::now().format("%Y-%m-%d").to_string()),
        }
    }
}

/// One detected bias dimension (political, emotional, balance, demographic, sensationalism).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub category: String,
    /// Strength in `<0.0, 1.0>`.
    pub score: f32,
    pub explanation: String,
}

/// A fact-check finding. Some entries judge the article as a whole (citations, balance),
/// others a single flagged claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckResult {
    pub is_factual: bool,
    pub confidence: f32,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFactualScores {
    pub source_reliability_score: f32,
    pub citation_score: f32,
    pub factual_phrases_score: f32,
    pub balance_score: f32,
    pub claim_score: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDetectionResult {
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    pub confidence: f32,
}

impl AiDetectionResult {
    /// Safe default used whenever the detector is unavailable.
    pub fn not_detected() -> Self {
        Self {
            is_ai_generated: false,
            confidence: 0.0,
        }
    }
}

/// Verdict of the source reliability classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAnalysis {
    pub is_reliable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub confidence: f32,
    pub explanation: String,
}

/// A check-worthy claim as returned by the claim detection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    pub score: f32,
}

/// Complete credibility report for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub overall_bias_score: f32,
    pub overall_factual_score: f32,
    pub detailed_factual_scores: DetailedFactualScores,
    pub biases: Vec<BiasResult>,
    pub fact_check: Vec<FactCheckResult>,
    pub ai_detection: AiDetectionResult,
    pub source_reliability: SourceAnalysis,
}

pub(crate) fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn article_accepts_missing_metadata() {
        let a: Article =
            serde_json::from_value(json!({ "title": "T", "content": "C" })).unwrap();
        assert_eq!(a.source, None);
        assert!(!a.is_blank());
        assert!(Article::new("  ", "\n").is_blank());
    }

    #[test]
    fn result_serializes_with_ui_field_names() {
        let r = AnalysisResult {
            summary: "s".into(),
            overall_bias_score: 0.1,
            overall_factual_score: 0.9,
            detailed_factual_scores: DetailedFactualScores::default(),
            biases: vec![],
            fact_check: vec![FactCheckResult {
                is_factual: true,
                confidence: 0.8,
                explanation: "ok".into(),
            }],
            ai_detection: AiDetectionResult::not_detected(),
            source_reliability: SourceAnalysis {
                is_reliable: false,
                category: None,
                confidence: 0.5,
                explanation: "no source provided".into(),
            },
        };

        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("overallBiasScore").is_some());
        assert!(v["detailedFactualScores"].get("factualPhrasesScore").is_some());
        assert_eq!(v["factCheck"][0]["isFactual"], json!(true));
        assert_eq!(v["aiDetection"]["isAIGenerated"], json!(false));
        assert_eq!(v["sourceReliability"]["isReliable"], json!(false));
        assert!(v["sourceReliability"].get("category").is_none());
    }

    #[test]
    fn example_article_is_dated_and_sourced() {
        let a = Article::example();
        assert!(!a.is_blank());
        assert_eq!(a.source.as_deref(), Some("Example News Network"));
        assert_eq!(a.date.as_deref().map(str::len), Some(10));
    }

    #[test]
    fn clamp_handles_nan_and_bounds() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
    }
}
