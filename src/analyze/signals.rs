//! Text Signal Analyzer: one pass of lexicon matching over a text body.
//!
//! Every signal is `min(raw_count / expected, 1)`, so scores stay in `<0, 1>` and more
//! matches never lower a score. Evidence lists keep distinct matched phrases in order
//! of first appearance, capped at `MAX_EVIDENCE`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analyze::normalize_text;
use crate::lexicon::Lexicon;
use crate::model::clamp01;

pub const MAX_EVIDENCE: usize = 3;

// Expected counts at which a signal saturates.
const EMOTIONAL_EXPECTED: f32 = 6.0;
const OPINION_EXPECTED: f32 = 4.0;
const IDEOLOGICAL_EXPECTED: f32 = 4.0;
const DEMOGRAPHIC_EXPECTED: f32 = 3.0;
const SENSATIONAL_EXPECTED: f32 = 3.0;
const BALANCE_EXPECTED: f32 = 3.0;
const FACTUAL_EXPECTED: f32 = 5.0;

/// Loaded terms count double towards the emotional signal.
const LOADED_WEIGHT: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionalLanguage {
    pub score: f32,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub loaded: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpinionLanguage {
    pub score: f32,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leaning {
    Conservative,
    Liberal,
}

impl Leaning {
    pub fn as_str(&self) -> &'static str {
        match self {
            Leaning::Conservative => "conservative",
            Leaning::Liberal => "liberal",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeologicalBias {
    pub score: f32,
    pub conservative: Vec<String>,
    pub liberal: Vec<String>,
    pub dominant_bias: Option<Leaning>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicBias {
    pub score: f32,
    pub gender: Vec<String>,
    pub age: Vec<String>,
    pub socioeconomic: Vec<String>,
    pub cultural: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensationalism {
    pub score: f32,
    pub phrases: Vec<String>,
}

/// Presence of multiple viewpoints (high = balanced).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalancedReporting {
    pub score: f32,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactualSupport {
    pub score: f32,
    pub citations: Vec<String>,
    pub factual_phrases: Vec<String>,
    /// Uncapped counts; the evidence lists above are truncated.
    pub citation_count: usize,
    pub factual_phrase_count: usize,
}

/// Signal bundle for one text body (title and content each get their own).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub emotional_language: EmotionalLanguage,
    pub opinion_language: OpinionLanguage,
    pub ideological_bias: IdeologicalBias,
    pub demographic_bias: DemographicBias,
    pub sensationalism: Sensationalism,
    pub balanced_reporting: BalancedReporting,
    pub factual_support: FactualSupport,
    pub word_count: usize,
}

impl TextAnalysis {
    /// Named scores, handy for invariant checks and debugging.
    pub fn signal_scores(&self) -> [(&'static str, f32); 7] {
        [
            ("emotional", self.emotional_language.score),
            ("opinion", self.opinion_language.score),
            ("ideological", self.ideological_bias.score),
            ("demographic", self.demographic_bias.score),
            ("sensationalism", self.sensationalism.score),
            ("balance", self.balanced_reporting.score),
            ("factual_support", self.factual_support.score),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl TextAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Never fails; empty input yields an all-zero analysis.
    pub fn analyze(&self, text: &str) -> TextAnalysis {
        let text = normalize_text(text).to_lowercase();
        let lex = &self.lexicon;

        let positive = lex.emotional_positive.find_all(&text);
        let negative = lex.emotional_negative.find_all(&text);
        let loaded = lex.emotional_loaded.find_all(&text);
        let emotional_count = positive.len() + negative.len() + LOADED_WEIGHT * loaded.len();

        let opinion = lex.opinion.find_all(&text);

        let conservative = lex.conservative.find_all(&text);
        let liberal = lex.liberal.find_all(&text);
        let dominant_bias = match conservative.len().cmp(&liberal.len()) {
            std::cmp::Ordering::Greater => Some(Leaning::Conservative),
            std::cmp::Ordering::Less => Some(Leaning::Liberal),
            std::cmp::Ordering::Equal => None,
        };

        let gender = lex.demographic_gender.find_all(&text);
        let age = lex.demographic_age.find_all(&text);
        let socioeconomic = lex.demographic_socioeconomic.find_all(&text);
        let cultural = lex.demographic_cultural.find_all(&text);
        let demographic_count = gender.len() + age.len() + socioeconomic.len() + cultural.len();

        let sensational = lex.sensational.find_all(&text);

        let balance = lex.balance.find_all(&text);
        let quotes = lex.attributed_quote.find_all(&text);
        // Two or more attributed quotes read as more than one voice in the piece.
        let balance_count = balance.len() + usize::from(quotes.len() >= 2);

        let citations = lex.citation.find_all(&text);
        let factual = lex.factual.find_all(&text);

        TextAnalysis {
            emotional_language: EmotionalLanguage {
                score: ratio(emotional_count, EMOTIONAL_EXPECTED),
                positive: evidence(&positive),
                negative: evidence(&negative),
                loaded: evidence(&loaded),
            },
            opinion_language: OpinionLanguage {
                score: ratio(opinion.len(), OPINION_EXPECTED),
                phrases: evidence(&opinion),
            },
            ideological_bias: IdeologicalBias {
                score: ratio(conservative.len() + liberal.len(), IDEOLOGICAL_EXPECTED),
                conservative: evidence(&conservative),
                liberal: evidence(&liberal),
                dominant_bias,
            },
            demographic_bias: DemographicBias {
                score: ratio(demographic_count, DEMOGRAPHIC_EXPECTED),
                gender: evidence(&gender),
                age: evidence(&age),
                socioeconomic: evidence(&socioeconomic),
                cultural: evidence(&cultural),
            },
            sensationalism: Sensationalism {
                score: ratio(sensational.len(), SENSATIONAL_EXPECTED),
                phrases: evidence(&sensational),
            },
            balanced_reporting: BalancedReporting {
                score: ratio(balance_count, BALANCE_EXPECTED),
                phrases: evidence(&balance),
            },
            factual_support: FactualSupport {
                score: ratio(citations.len() + factual.len(), FACTUAL_EXPECTED),
                citations: evidence(&citations),
                factual_phrases: evidence(&factual),
                citation_count: citations.len(),
                factual_phrase_count: factual.len(),
            },
            word_count: text.split_whitespace().count(),
        }
    }
}

fn ratio(count: usize, expected: f32) -> f32 {
    clamp01(count as f32 / expected)
}

/// Distinct matches in order of first appearance, capped.
fn evidence(hits: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(MAX_EVIDENCE);
    for h in hits {
        if out.len() >= MAX_EVIDENCE {
            break;
        }
        if !out.iter().any(|e| e == h) {
            out.push(h.to_string());
        }
    }
    out
}
