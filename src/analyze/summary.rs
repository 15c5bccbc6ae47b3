//! Summary composer.
//!
//! The summary is a sequence of blocks (AI warning, source, bias, factual accuracy).
//! Each block is an ordered rule table of (predicate, template) pairs; the first rule
//! whose predicate holds renders the block, and a template may render nothing.

use crate::model::{AiDetectionResult, BiasResult, FactCheckResult, SourceAnalysis};

pub const SIGNIFICANT_BIAS: f32 = 0.7;
pub const MODERATE_BIAS: f32 = 0.4;
pub const VERY_LOW_FACTUAL: f32 = 0.3;
pub const QUESTIONABLE_FACTUAL: f32 = 0.7;
/// Unreliable verdicts below this confidence carry no usable source metadata.
pub const SOURCE_SENTENCE_MIN_CONFIDENCE: f32 = 0.6;

/// Everything a rule may look at.
pub struct SummaryContext<'a> {
    pub overall_bias: f32,
    pub overall_factual: f32,
    pub ai: &'a AiDetectionResult,
    pub biases: &'a [BiasResult],
    pub fact_check: &'a [FactCheckResult],
    pub source: &'a SourceAnalysis,
}

impl SummaryContext<'_> {
    /// Highest scoring finding; the first one wins ties.
    pub fn leading_bias(&self) -> Option<&BiasResult> {
        let mut best: Option<&BiasResult> = None;
        for b in self.biases {
            if best.map_or(true, |cur| b.score > cur.score) {
                best = Some(b);
            }
        }
        best
    }

    fn leading_suffix(&self) -> String {
        self.leading_bias()
            .map(|b| format!(", most notably {} bias", b.category))
            .unwrap_or_default()
    }

    fn concerns(&self) -> usize {
        self.fact_check.iter().filter(|f| !f.is_factual).count()
    }
}

pub struct Rule {
    pub when: fn(&SummaryContext<'_>) -> bool,
    pub render: fn(&SummaryContext<'_>) -> Option<String>,
}

pub const AI_RULES: &[Rule] = &[Rule {
    when: |c| c.ai.is_ai_generated,
    render: |c| {
        Some(format!(
            "Warning: this article shows strong signs of being AI-generated ({:.0}% confidence).",
            c.ai.confidence * 100.0
        ))
    },
}];

/// A missing or unparseable source leaves the block empty, so the summary
/// then opens with the bias sentence.
pub const SOURCE_RULES: &[Rule] = &[
    Rule {
        when: |c| c.source.is_reliable,
        render: |c| {
            Some(format!(
                "The source is a recognized {} outlet and is generally considered reliable.",
                c.source.category.as_deref().unwrap_or("trusted")
            ))
        },
    },
    Rule {
        when: |c| c.source.confidence < SOURCE_SENTENCE_MIN_CONFIDENCE,
        render: |_| None,
    },
    Rule {
        when: |_| true,
        render: |_| {
            Some(
                "The source is not among recognized reliable outlets, so its claims deserve extra scrutiny."
                    .to_string(),
            )
        },
    },
];

pub const BIAS_RULES: &[Rule] = &[
    Rule {
        when: |c| c.overall_bias > SIGNIFICANT_BIAS,
        render: |c| Some(format!("This article shows significant bias{}.", c.leading_suffix())),
    },
    Rule {
        when: |c| c.overall_bias > MODERATE_BIAS,
        render: |c| Some(format!("This article shows moderate bias{}.", c.leading_suffix())),
    },
    Rule {
        when: |_| true,
        render: |c| Some(format!("This article shows minimal bias{}.", c.leading_suffix())),
    },
];

pub const FACTUAL_RULES: &[Rule] = &[
    Rule {
        when: |c| c.overall_factual < VERY_LOW_FACTUAL,
        render: |c| {
            Some(with_concerns(
                "The factual accuracy is very low, suggesting potential misinformation.",
                c,
            ))
        },
    },
    Rule {
        when: |c| c.overall_factual < QUESTIONABLE_FACTUAL,
        render: |c| Some(with_concerns("The factual accuracy is questionable in some areas.", c)),
    },
    Rule {
        when: |_| true,
        render: |c| Some(with_concerns("The factual accuracy appears to be generally reliable.", c)),
    },
];

fn with_concerns(sentence: &str, c: &SummaryContext<'_>) -> String {
    match c.concerns() {
        0 => sentence.to_string(),
        1 => format!("{sentence} 1 fact-check finding raises concerns."),
        n => format!("{sentence} {n} fact-check findings raise concerns."),
    }
}

/// First matching rule of a block.
fn apply(rules: &[Rule], ctx: &SummaryContext<'_>) -> Option<String> {
    rules
        .iter()
        .find(|r| (r.when)(ctx))
        .and_then(|r| (r.render)(ctx))
}

pub fn compose(ctx: &SummaryContext<'_>) -> String {
    [AI_RULES, SOURCE_RULES, BIAS_RULES, FACTUAL_RULES]
        .iter()
        .filter_map(|block| apply(block, ctx))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render(
    overall_bias: f32,
    overall_factual: f32,
    ai: &AiDetectionResult,
    biases: &[BiasResult],
    fact_check: &[FactCheckResult],
    source: &SourceAnalysis,
) -> String {
    compose(&SummaryContext {
        overall_bias,
        overall_factual,
        ai,
        biases,
        fact_check,
        source,
    })
}
