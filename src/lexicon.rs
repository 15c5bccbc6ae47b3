//! # Lexicon / Pattern Store
//!
//! Read-only phrase tables used by the text signal analyzer and the domain
//! pattern lists used by the source reliability classifier.
//!
//! - Built-in seed (`LexiconConfig::default()`), compiled once and shared via `Arc`.
//! - Optional TOML override (path from `LEXICON_CONFIG_PATH`); sections missing from
//!   the file keep their built-in values.
//! - Every phrase list compiles into ONE alternation regex (longest phrase first),
//!   so a text is scanned once per list and overlapping phrases are counted once.
//!
//! Literal `phrases` are escaped and word-bounded; `patterns` are raw regexes.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::{fs, path::PathBuf, sync::Arc};
use tracing::info;

pub const ENV_LEXICON_CONFIG_PATH: &str = "LEXICON_CONFIG_PATH";

/// One list of markers: literal phrases plus raw regex patterns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PhraseSet {
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// A reliable-source category and the domains that belong to it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceCategoryCfg {
    pub name: String,
    pub confidence: f32,
    /// Registrable domains, matched on the host suffix at a dot boundary.
    #[serde(default)]
    pub domains: Vec<String>,
    /// Raw regexes tested against the lower-cased host.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Raw (uncompiled) tables. Field order mirrors the signals they feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub emotional_positive: PhraseSet,
    pub emotional_negative: PhraseSet,
    pub emotional_loaded: PhraseSet,
    pub opinion: PhraseSet,
    pub conservative: PhraseSet,
    pub liberal: PhraseSet,
    pub demographic_gender: PhraseSet,
    pub demographic_age: PhraseSet,
    pub demographic_socioeconomic: PhraseSet,
    pub demographic_cultural: PhraseSet,
    pub sensational: PhraseSet,
    pub citation: PhraseSet,
    pub factual: PhraseSet,
    pub balance: PhraseSet,
    /// A quotation followed by an attribution verb ("..." said X).
    pub attributed_quote: PhraseSet,
    /// Evaluated in order; first matching category wins.
    pub sources: Vec<SourceCategoryCfg>,
    /// Host tokens that make an unknown domain "look like news".
    pub news_like_tokens: Vec<String>,
}

fn set(phrases: &[&str], patterns: &[&str]) -> PhraseSet {
    PhraseSet {
        phrases: phrases.iter().map(|s| s.to_string()).collect(),
        patterns: patterns.iter().map(|s| s.to_string()).collect(),
    }
}

fn category(name: &str, confidence: f32, domains: &[&str], patterns: &[&str]) -> SourceCategoryCfg {
    SourceCategoryCfg {
        name: name.to_string(),
        confidence,
        domains: domains.iter().map(|s| s.to_string()).collect(),
        patterns: patterns.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for LexiconConfig {
    /// Built-in seed tables (English only).
    fn default() -> Self {
        Self {
            emotional_positive: set(
                &[
                    "amazing", "incredible", "wonderful", "brilliant", "triumph", "heroic",
                    "stunning", "remarkable", "fantastic", "extraordinary", "inspiring",
                    "glorious", "magnificent", "spectacular",
                ],
                &[],
            ),
            emotional_negative: set(
                &[
                    "terrible", "horrible", "disastrous", "devastating", "tragic", "outrageous",
                    "shocking", "appalling", "catastrophic", "disgraceful", "horrific",
                    "alarming", "dreadful", "disgusting", "pathetic",
                ],
                &[],
            ),
            emotional_loaded: set(
                &[
                    "radical", "extremist", "extremists", "regime", "thugs", "propaganda",
                    "so-called", "witch hunt", "destroy", "destroying", "war on", "assault on",
                    "puppet", "traitor", "traitors", "corrupt",
                ],
                &[],
            ),
            opinion: set(
                &[
                    "i think", "i believe", "in my opinion", "we believe", "clearly",
                    "obviously", "undoubtedly", "of course", "it is clear that",
                    "everyone knows", "without a doubt", "arguably", "needless to say",
                    "should be ashamed", "it is obvious", "frankly",
                ],
                &[],
            ),
            conservative: set(
                &[
                    "illegal aliens", "illegal immigrants", "pro-life", "tax relief",
                    "job creators", "big government", "traditional values", "law and order",
                    "second amendment", "border security", "religious liberty", "free market",
                    "liberal media", "socialist", "woke",
                ],
                &[],
            ),
            liberal: set(
                &[
                    "undocumented immigrants", "pro-choice", "social justice", "climate crisis",
                    "gun violence", "income inequality", "systemic racism",
                    "reproductive rights", "tax breaks for the rich", "corporate greed",
                    "living wage", "marginalized communities", "far-right", "progressive",
                ],
                &[],
            ),
            demographic_gender: set(
                &[
                    "women are", "men are", "girls are", "boys are", "typical woman",
                    "typical man", "like a girl", "hysterical", "bossy", "man up",
                ],
                &[],
            ),
            demographic_age: set(
                &[
                    "millennials are", "boomers", "boomer", "gen z", "entitled youth",
                    "old people are", "too old", "senile", "snowflake", "snowflakes",
                ],
                &[],
            ),
            demographic_socioeconomic: set(
                &[
                    "welfare queens", "handouts", "freeloaders", "the poor are", "lazy",
                    "trailer park", "ghetto", "coastal elites", "moochers",
                ],
                &[],
            ),
            demographic_cultural: set(
                &[
                    "those people", "these people", "foreigners", "illegals", "third world",
                    "un-american", "invasion", "primitive", "savages",
                ],
                &[],
            ),
            sensational: set(
                &[
                    "shocking", "bombshell", "unbelievable", "you won't believe",
                    "mind-blowing", "explosive", "slams", "destroys", "jaw-dropping",
                    "game-changer", "outrage", "scandal", "chaos", "meltdown", "horror",
                ],
                &[r"!{2,}", r"\bmust[- ](?:see|read)\b"],
            ),
            citation: set(
                &[
                    "according to", "cited", "citing", "published in", "peer-reviewed",
                    "told reporters", "in a statement", "press release", "the study",
                    "the report", "survey",
                ],
                &[r"https?://\S+", r"\[\d+\]", r"\(\d{4}\)"],
            ),
            factual: set(
                &[
                    "data shows", "data show", "statistics", "evidence", "research",
                    "found that", "confirmed", "figures", "analysis", "measured",
                    "records show", "census", "official data",
                ],
                &[
                    r"\b\d+(?:\.\d+)?\s?(?:%|percent\b)",
                    r"\b\d{1,3}(?:,\d{3})+\b",
                    r"\b\d+(?:\.\d+)? (?:million|billion|trillion)\b",
                ],
            ),
            balance: set(
                &[
                    "however", "on the other hand", "critics argue", "critics say", "critics",
                    "supporters argue", "supporters say", "opponents", "proponents",
                    "in contrast", "meanwhile", "others argue", "disputed", "both sides",
                    "while some", "countered", "responded",
                ],
                &[],
            ),
            attributed_quote: set(
                &[],
                &[r#""[^"]{3,}"\s*,?\s*(?:said|says|stated|argued|added|wrote)\b"#],
            ),
            sources: vec![
                category(
                    "government",
                    0.95,
                    &["europa.eu"],
                    &[
                        r"\.gov$",
                        r"(?:^|\.)gov\.[a-z]{2}$",
                        r"\.mil$",
                        r"(?:^|\.)gc\.ca$",
                        r"(?:^|\.)gouv\.[a-z]{2}$",
                    ],
                ),
                category(
                    "international",
                    0.95,
                    &[
                        "un.org", "worldbank.org", "imf.org", "oecd.org", "unesco.org",
                        "unicef.org", "wto.org",
                    ],
                    &[r"\.int$"],
                ),
                category(
                    "education",
                    0.90,
                    &[],
                    &[r"\.edu$", r"(?:^|\.)edu\.[a-z]{2}$", r"(?:^|\.)ac\.[a-z]{2}$"],
                ),
                category(
                    "news",
                    0.85,
                    &[
                        "reuters.com", "apnews.com", "bbc.com", "bbc.co.uk", "npr.org", "pbs.org",
                        "nytimes.com", "washingtonpost.com", "theguardian.com", "wsj.com",
                        "economist.com", "ft.com", "bloomberg.com", "aljazeera.com", "cbc.ca",
                        "abc.net.au",
                    ],
                    &[],
                ),
                category(
                    "scientific",
                    0.95,
                    &[
                        "nature.com", "science.org", "sciencemag.org", "nejm.org",
                        "thelancet.com", "cell.com", "plos.org", "arxiv.org", "springer.com",
                        "sciencedirect.com", "bmj.com", "jamanetwork.com", "pnas.org",
                    ],
                    &[],
                ),
            ],
            news_like_tokens: vec!["news".into(), "times".into(), "daily".into()],
        }
    }
}

/* ----------------------------
Compiled structures
---------------------------- */

/// One compiled phrase list. Empty lists never match.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    re: Option<Regex>,
}

impl PhraseMatcher {
    pub fn compile(name: &str, set: &PhraseSet) -> anyhow::Result<Self> {
        let mut phrases: Vec<String> = set
            .phrases
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        // Longest first: leftmost-first alternation then prefers "critics argue" over "critics".
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();

        let mut alts: Vec<String> = phrases.iter().map(|p| word_bounded(p)).collect();
        for pat in &set.patterns {
            Regex::new(pat).with_context(|| format!("lexicon `{name}` pattern `{pat}`"))?;
            alts.push(format!("(?:{pat})"));
        }

        if alts.is_empty() {
            return Ok(Self { re: None });
        }
        let re = Regex::new(&format!("(?i)(?:{})", alts.join("|")))
            .with_context(|| format!("lexicon `{name}` regex"))?;
        Ok(Self { re: Some(re) })
    }

    /// All non-overlapping matches, in text order.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match &self.re {
            Some(re) => re.find_iter(text).map(|m| m.as_str()).collect(),
            None => Vec::new(),
        }
    }
}

/// `\b` only on sides that start/end with a word character.
fn word_bounded(phrase: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(phrase.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(phrase.chars().last()) { r"\b" } else { "" };
    format!("{lead}{}{tail}", regex::escape(phrase))
}

#[derive(Debug, Clone)]
pub struct SourceCategory {
    pub name: String,
    pub confidence: f32,
    re: Regex,
}

impl SourceCategory {
    pub fn matches_host(&self, host: &str) -> bool {
        self.re.is_match(host)
    }
}

/// The compiled, immutable pattern store.
#[derive(Debug)]
pub struct Lexicon {
    pub cfg: LexiconConfig,
    pub emotional_positive: PhraseMatcher,
    pub emotional_negative: PhraseMatcher,
    pub emotional_loaded: PhraseMatcher,
    pub opinion: PhraseMatcher,
    pub conservative: PhraseMatcher,
    pub liberal: PhraseMatcher,
    pub demographic_gender: PhraseMatcher,
    pub demographic_age: PhraseMatcher,
    pub demographic_socioeconomic: PhraseMatcher,
    pub demographic_cultural: PhraseMatcher,
    pub sensational: PhraseMatcher,
    pub citation: PhraseMatcher,
    pub factual: PhraseMatcher,
    pub balance: PhraseMatcher,
    pub attributed_quote: PhraseMatcher,
    pub sources: Vec<SourceCategory>,
}

static BUILTIN: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    Arc::new(Lexicon::compile(LexiconConfig::default()).expect("built-in lexicon compiles"))
});

impl Lexicon {
    /// Shared instance of the built-in seed.
    pub fn builtin() -> Arc<Lexicon> {
        BUILTIN.clone()
    }

    pub fn compile(cfg: LexiconConfig) -> anyhow::Result<Self> {
        let sources = cfg
            .sources
            .iter()
            .map(|c| {
                let mut alts: Vec<String> = c
                    .domains
                    .iter()
                    .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                    .filter(|d| !d.is_empty())
                    .map(|d| format!(r"(?:^|\.){}$", regex::escape(&d)))
                    .collect();
                alts.extend(c.patterns.iter().map(|p| format!("(?:{p})")));
                if alts.is_empty() {
                    anyhow::bail!("source category `{}` has no domains or patterns", c.name);
                }
                let re = Regex::new(&alts.join("|"))
                    .map_err(|e| anyhow::anyhow!("source category `{}` regex error: {}", c.name, e))?;
                Ok(SourceCategory {
                    name: c.name.clone(),
                    confidence: crate::model::clamp01(c.confidence),
                    re,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            emotional_positive: PhraseMatcher::compile("emotional_positive", &cfg.emotional_positive)?,
            emotional_negative: PhraseMatcher::compile("emotional_negative", &cfg.emotional_negative)?,
            emotional_loaded: PhraseMatcher::compile("emotional_loaded", &cfg.emotional_loaded)?,
            opinion: PhraseMatcher::compile("opinion", &cfg.opinion)?,
            conservative: PhraseMatcher::compile("conservative", &cfg.conservative)?,
            liberal: PhraseMatcher::compile("liberal", &cfg.liberal)?,
            demographic_gender: PhraseMatcher::compile("demographic_gender", &cfg.demographic_gender)?,
            demographic_age: PhraseMatcher::compile("demographic_age", &cfg.demographic_age)?,
            demographic_socioeconomic: PhraseMatcher::compile(
                "demographic_socioeconomic",
                &cfg.demographic_socioeconomic,
            )?,
            demographic_cultural: PhraseMatcher::compile("demographic_cultural", &cfg.demographic_cultural)?,
            sensational: PhraseMatcher::compile("sensational", &cfg.sensational)?,
            citation: PhraseMatcher::compile("citation", &cfg.citation)?,
            factual: PhraseMatcher::compile("factual", &cfg.factual)?,
            balance: PhraseMatcher::compile("balance", &cfg.balance)?,
            attributed_quote: PhraseMatcher::compile("attributed_quote", &cfg.attributed_quote)?,
            sources,
            cfg,
        })
    }

    /// Load from a TOML string; sections absent from the string keep built-in values.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: LexiconConfig = toml::from_str(toml_str)?;
        Self::compile(cfg)
    }

    /// Built-in seed, or the TOML file named by `LEXICON_CONFIG_PATH`.
    /// A configured but unreadable/invalid file is an error (fail fast at startup).
    pub fn from_env() -> anyhow::Result<Arc<Self>> {
        let Ok(path) = std::env::var(ENV_LEXICON_CONFIG_PATH).map(PathBuf::from) else {
            return Ok(Self::builtin());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read lexicon config at {}: {}", path.display(), e)
        })?;
        let lex = Self::from_toml_str(&content)?;
        info!(path = %path.display(), categories = lex.sources.len(), "lexicon loaded");
        Ok(Arc::new(lex))
    }

    pub fn news_like_tokens(&self) -> &[String] {
        &self.cfg.news_like_tokens
    }
}
