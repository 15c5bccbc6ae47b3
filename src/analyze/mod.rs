// src/analyze/mod.rs
//! Analysis pipeline pieces: text signals, bias and factual aggregation,
//! remote enrichment and the summary composer.

pub mod bias;
pub mod enrichment;
pub mod factual;
pub mod signals;
pub mod summary;

use once_cell::sync::OnceCell;
use regex::Regex;

// Re-export convenient types.
pub use crate::analyze::enrichment::{
    build_gateway, AiDetector, ClaimDetector, Enrichment, EnrichmentGateway,
    AI_GENERATED_THRESHOLD,
};
pub use crate::analyze::factual::FactualAssessment;
pub use crate::analyze::signals::{Leaning, TextAnalysis, TextAnalyzer};

pub const ENV_DEV_LOG: &str = "CREDIBILITY_DEV_LOG";

/// Normalize text before matching: decode entities, strip tags, ASCII quotes,
/// collapse whitespace. Punctuation is kept; `!!` and `(2021)` are signals.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[a-z][^>]*>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Single line, control-free, at most `max` chars (ellipsis when cut).
pub fn sanitize_snippet(input: &str, max: usize) -> String {
    let mut out = String::with_capacity(max.min(input.len()));
    let mut prev_space = false;
    let mut taken = 0usize;
    let mut truncated = false;
    for ch in input.chars() {
        let c = if ch.is_whitespace() || ch.is_control() { ' ' } else { ch };
        if c == ' ' {
            if prev_space || out.is_empty() {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        if taken >= max {
            truncated = true;
            break;
        }
        out.push(c);
        taken += 1;
    }
    let mut out = out.trim_end().to_string();
    if truncated && max > 0 {
        out.pop();
        out = out.trim_end().to_string();
        out.push('…');
    }
    out
}

/// Short, stable, non-reversible id for a text (log correlation, history keys).
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

// Dev logging gate: CREDIBILITY_DEV_LOG=1 AND dev env (debug or SHUTTLE_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_tags_and_entities() {
        assert_eq!(
            normalize_text("<p>Rates&nbsp;rose &amp; fell</p>\n\n<b>again</b>"),
            "Rates rose & fell again"
        );
    }

    #[test]
    fn normalize_keeps_punctuation_and_unifies_quotes() {
        assert_eq!(normalize_text("“Wow!!” it’s done."), "\"Wow!!\" it's done.");
    }

    #[test]
    fn normalize_keeps_comparisons() {
        assert_eq!(normalize_text("3 < 5 and 7 > 2"), "3 < 5 and 7 > 2");
    }

    #[test]
    fn sanitize_snippet_collapses_and_caps() {
        assert_eq!(sanitize_snippet("  a\n\tb   c ", 160), "a b c");
        let long = "x".repeat(200);
        let s = sanitize_snippet(&long, 160);
        assert_eq!(s.chars().count(), 160);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("hello");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("hello"));
        assert_ne!(a, anon_hash("hello!"));
    }
}
