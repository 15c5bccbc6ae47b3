//! # Source Reliability
//!
//! Maps an (optional) source URL to a reliability verdict using the category
//! domain patterns of the [`Lexicon`].
//!
//! Decision order:
//! 1. no source → unreliable, 0.5
//! 2. unparseable URL or no host → unreliable, 0.5
//! 3. first matching category (government, international, education, news, scientific)
//!    → reliable with that category's fixed confidence
//! 4. host contains a news-like token → unreliable, 0.6
//! 5. anything else → unreliable, 0.7
//!
//! Deterministic for a given lexicon; no I/O.

use std::sync::Arc;
use url::Url;

use crate::lexicon::Lexicon;
use crate::model::SourceAnalysis;

pub const NO_SOURCE_CONFIDENCE: f32 = 0.5;
pub const NEWS_LIKE_CONFIDENCE: f32 = 0.6;
pub const UNRECOGNIZED_CONFIDENCE: f32 = 0.7;

pub const EXPLAIN_NO_SOURCE: &str = "no source provided";
pub const EXPLAIN_INVALID: &str = "invalid source format";

#[derive(Debug, Clone)]
pub struct SourceClassifier {
    lexicon: Arc<Lexicon>,
}

impl SourceClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn classify(&self, source: Option<&str>) -> SourceAnalysis {
        let raw = match source.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return unreliable(NO_SOURCE_CONFIDENCE, EXPLAIN_NO_SOURCE),
        };

        let Some(host) = extract_host(raw) else {
            return unreliable(NO_SOURCE_CONFIDENCE, EXPLAIN_INVALID);
        };

        if let Some(cat) = self.lexicon.sources.iter().find(|c| c.matches_host(&host)) {
            return SourceAnalysis {
                is_reliable: true,
                category: Some(cat.name.clone()),
                confidence: cat.confidence,
                explanation: format!("{host} is a recognized {} source", cat.name),
            };
        }

        if self
            .lexicon
            .news_like_tokens()
            .iter()
            .any(|t| !t.is_empty() && host.contains(t.as_str()))
        {
            return unreliable(
                NEWS_LIKE_CONFIDENCE,
                &format!("{host} looks like a news outlet but is not a verified source"),
            );
        }

        unreliable(
            UNRECOGNIZED_CONFIDENCE,
            &format!("{host} is not recognized as a reliable source"),
        )
    }
}

/// Lower-case host of an absolute URL; `None` for anything that does not parse or has no host.
fn extract_host(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

fn unreliable(confidence: f32, explanation: &str) -> SourceAnalysis {
    SourceAnalysis {
        is_reliable: false,
        category: None,
        confidence,
        explanation: explanation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SourceClassifier {
        SourceClassifier::new(Lexicon::builtin())
    }

    fn assert_verdict(url: &str, reliable: bool, category: Option<&str>, confidence: f32) {
        let s = classifier().classify(Some(url));
        assert_eq!(s.is_reliable, reliable, "{url}");
        assert_eq!(s.category.as_deref(), category, "{url}");
        assert!((s.confidence - confidence).abs() < 1e-6, "{url}: {}", s.confidence);
    }

    #[test]
    fn category_confidence_table() {
        assert_verdict("https://www.cdc.gov/flu", true, Some("government"), 0.95);
        assert_verdict("https://www.gov.uk/guidance", true, Some("government"), 0.95);
        assert_verdict("https://gov.uk/guidance", true, Some("government"), 0.95);
        assert_verdict("https://gouv.fr/x", true, Some("government"), 0.95);
        assert_verdict("https://gov.au/x", true, Some("government"), 0.95);
        assert_verdict("https://www.who.int/news", true, Some("international"), 0.95);
        assert_verdict("https://news.un.org/en", true, Some("international"), 0.95);
        assert_verdict("https://www.mit.edu/research", true, Some("education"), 0.90);
        assert_verdict("https://www.ox.ac.uk/", true, Some("education"), 0.90);
        assert_verdict("https://ac.uk/", true, Some("education"), 0.90);
        assert_verdict("https://www.reuters.com/world", true, Some("news"), 0.85);
        assert_verdict("https://www.nature.com/articles/x", true, Some("scientific"), 0.95);
    }

    #[test]
    fn first_category_in_order_wins() {
        // matches government before scientific
        assert_verdict("https://pubmed.ncbi.nlm.nih.gov/123", true, Some("government"), 0.95);
    }

    #[test]
    fn missing_and_blank_source() {
        for s in [None, Some(""), Some("   ")] {
            let v = classifier().classify(s);
            assert!(!v.is_reliable);
            assert_eq!(v.confidence, 0.5);
            assert_eq!(v.explanation, "no source provided");
        }
    }

    #[test]
    fn malformed_source() {
        for s in ["not a url", "example.com/path", "mailto:someone@example.com"] {
            let v = classifier().classify(Some(s));
            assert!(!v.is_reliable, "{s}");
            assert_eq!(v.confidence, 0.5, "{s}");
            assert_eq!(v.explanation, "invalid source format", "{s}");
        }
    }

    #[test]
    fn news_like_but_unverified() {
        assert_verdict("https://dailyplanet-news.example/story", false, None, 0.6);
        assert_verdict("http://thetimes-herald.info", false, None, 0.6);
    }

    #[test]
    fn unrecognized_host() {
        assert_verdict("https://myblog.example.org/post", false, None, 0.7);
        // label must start at a dot boundary
        assert_verdict("https://notgov.uk/x", false, None, 0.7);
        assert_verdict("https://myedu.au/x", false, None, 0.7);
    }

    #[test]
    fn host_is_case_folded() {
        assert_verdict("HTTPS://WWW.BBC.CO.UK/news", true, Some("news"), 0.85);
    }
}
