//! Bias aggregator: title + content signals → named bias findings.
//!
//! Fixed emission order: political, emotional, balance, demographic, sensationalism.
//! A category is emitted only when its score is strictly above its threshold.

use super::signals::TextAnalysis;
use crate::model::{clamp01, BiasResult};

pub const POLITICAL_THRESHOLD: f32 = 0.3;
pub const EMOTIONAL_THRESHOLD: f32 = 0.3;
pub const BALANCE_THRESHOLD: f32 = 0.4;
pub const DEMOGRAPHIC_THRESHOLD: f32 = 0.3;
pub const SENSATIONALISM_THRESHOLD: f32 = 0.4;

/// Phrases quoted in one explanation.
const QUOTED_EVIDENCE: usize = 3;

pub fn aggregate(title: &TextAnalysis, content: &TextAnalysis) -> Vec<BiasResult> {
    let mut out = Vec::new();

    let political = political_score(title, content);
    if political > POLITICAL_THRESHOLD {
        out.push(BiasResult {
            category: "political".into(),
            score: political,
            explanation: political_explanation(title, content),
        });
    }

    let emotional = emotional_score(title, content);
    if emotional > EMOTIONAL_THRESHOLD {
        let ev = collect_evidence(&[
            &title.emotional_language.loaded,
            &title.emotional_language.negative,
            &title.emotional_language.positive,
            &content.emotional_language.loaded,
            &content.emotional_language.negative,
            &content.emotional_language.positive,
        ]);
        out.push(BiasResult {
            category: "emotional".into(),
            score: emotional,
            explanation: explain(
                "Uses emotionally charged language such as",
                &ev,
                "The tone relies on emotional rather than neutral language.",
            ),
        });
    }

    let balance = balance_score(title, content);
    if balance > BALANCE_THRESHOLD {
        let explanation = if content.balanced_reporting.phrases.is_empty() {
            "Presents a single perspective without opposing viewpoints or counterarguments.".to_string()
        } else {
            format!(
                "Offers only limited counterpoints ({}); other perspectives are underrepresented.",
                quote_list(&content.balanced_reporting.phrases)
            )
        };
        out.push(BiasResult {
            category: "balance".into(),
            score: balance,
            explanation,
        });
    }

    let d = &content.demographic_bias;
    if d.score > DEMOGRAPHIC_THRESHOLD {
        let ev = collect_evidence(&[&d.gender, &d.age, &d.socioeconomic, &d.cultural]);
        out.push(BiasResult {
            category: "demographic".into(),
            score: d.score,
            explanation: explain(
                "Generalizes about demographic groups with phrases such as",
                &ev,
                "Contains wording that stereotypes demographic groups.",
            ),
        });
    }

    let s = &content.sensationalism;
    if s.score > SENSATIONALISM_THRESHOLD {
        out.push(BiasResult {
            category: "sensationalism".into(),
            score: s.score,
            explanation: explain(
                "Uses sensational phrasing such as",
                &s.phrases,
                "Exaggerated framing inflates the significance of events.",
            ),
        });
    }

    out
}

/// Mean of emitted finding scores; 0 when nothing was emitted.
pub fn overall_bias_score(biases: &[BiasResult]) -> f32 {
    if biases.is_empty() {
        return 0.0;
    }
    clamp01(biases.iter().map(|b| b.score).sum::<f32>() / biases.len() as f32)
}

/// mean(avg emotional, avg opinion, 1 − content balance, content ideological)
pub fn political_score(title: &TextAnalysis, content: &TextAnalysis) -> f32 {
    let emotional = (title.emotional_language.score + content.emotional_language.score) / 2.0;
    let opinion = (title.opinion_language.score + content.opinion_language.score) / 2.0;
    let imbalance = 1.0 - content.balanced_reporting.score;
    clamp01((emotional + opinion + imbalance + content.ideological_bias.score) / 4.0)
}

/// Title emotion weighs 1.5×; sensationalism of the body joins the mix.
pub fn emotional_score(title: &TextAnalysis, content: &TextAnalysis) -> f32 {
    clamp01(
        (1.5 * title.emotional_language.score
            + content.emotional_language.score
            + content.sensationalism.score)
            / 3.0,
    )
}

/// Absence of balance; the body counts double.
pub fn balance_score(title: &TextAnalysis, content: &TextAnalysis) -> f32 {
    clamp01(
        1.0 - (title.balanced_reporting.score + 2.0 * content.balanced_reporting.score) / 3.0,
    )
}

fn political_explanation(title: &TextAnalysis, content: &TextAnalysis) -> String {
    let ideo = &content.ideological_bias;
    let terms = collect_evidence(&[
        &ideo.conservative,
        &ideo.liberal,
        &title.ideological_bias.conservative,
        &title.ideological_bias.liberal,
    ]);
    if let (Some(side), false) = (ideo.dominant_bias, terms.is_empty()) {
        return format!(
            "Leans {}: uses politically charged terms such as {}.",
            side.as_str(),
            quote_list(&terms)
        );
    }

    let opinion = collect_evidence(&[
        &terms,
        &title.opinion_language.phrases,
        &content.opinion_language.phrases,
    ]);
    explain(
        "Frames the story through opinion and charged wording such as",
        &opinion,
        "Uses opinionated or one-sided framing typical of politically slanted coverage.",
    )
}

fn explain(lead: &str, evidence: &[String], generic: &str) -> String {
    if evidence.is_empty() {
        generic.to_string()
    } else {
        format!("{lead} {}.", quote_list(evidence))
    }
}

/// Distinct phrases across lists, in list order, capped.
fn collect_evidence(lists: &[&Vec<String>]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for p in lists.iter().flat_map(|l| l.iter()) {
        if out.len() >= QUOTED_EVIDENCE {
            break;
        }
        if !out.contains(p) {
            out.push(p.clone());
        }
    }
    out
}

/// `"a"`, `"a" and "b"`, `"a", "b" and "c"`
fn quote_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .take(QUOTED_EVIDENCE)
        .map(|s| format!("\"{s}\""))
        .collect();
    match quoted.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::signals::TextAnalyzer;
    use crate::lexicon::Lexicon;

    fn analyze(text: &str) -> TextAnalysis {
        TextAnalyzer::new(Lexicon::builtin()).analyze(text)
    }

    #[test]
    fn neutral_balanced_article_emits_nothing() {
        let title = analyze("City council approves new budget");
        let content = analyze(
            "The council approved the budget on Tuesday. However, critics argue the plan is costly. \
             On the other hand, supporters say it funds road repairs.",
        );
        let biases = aggregate(&title, &content);
        assert!(biases.is_empty(), "{biases:?}");
        assert_eq!(overall_bias_score(&biases), 0.0);
    }

    #[test]
    fn unbalanced_text_emits_balance_finding() {
        let title = analyze("Budget approved");
        let content = analyze("The council approved the budget on Tuesday.");
        let biases = aggregate(&title, &content);
        let cats: Vec<&str> = biases.iter().map(|b| b.category.as_str()).collect();
        // no balance markers: political = (0 + 0 + 1 + 0) / 4 = 0.25, below its threshold
        assert_eq!(cats, vec!["balance"]);
        assert_eq!(biases[0].score, 1.0);
        assert!(biases[0].explanation.starts_with("Presents a single perspective"));
    }

    #[test]
    fn emission_order_is_fixed() {
        let title = analyze("SHOCKING: Radical regime's outrageous, disgraceful propaganda!!");
        let content = analyze(
            "Clearly, obviously, the so-called leaders are corrupt traitors. Job creators and \
             border security are under assault on traditional values by socialist extremists. \
             Those people and millennials are lazy. Bombshell scandal, chaos, meltdown!!",
        );
        let cats: Vec<String> = aggregate(&title, &content)
            .into_iter()
            .map(|b| b.category)
            .collect();
        assert_eq!(
            cats,
            vec!["political", "emotional", "balance", "demographic", "sensationalism"]
        );
    }

    #[test]
    fn political_explanation_names_dominant_side() {
        let title = analyze("Tax relief now");
        let content = analyze(
            "Job creators demand tax relief, border security and law and order, clearly and obviously.",
        );
        let biases = aggregate(&title, &content);
        let political = biases.iter().find(|b| b.category == "political").unwrap();
        assert_eq!(
            political.explanation,
            "Leans conservative: uses politically charged terms such as \"job creators\", \"tax relief\" and \"border security\"."
        );
    }

    #[test]
    fn emotional_formula_weights_title() {
        let title = analyze("Terrible, horrible, tragic, dreadful, appalling, alarming day");
        let content = analyze("A day.");
        // title emotional 1.0 → 1.5 / 3 = 0.5
        assert!((emotional_score(&title, &content) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn quote_list_shapes() {
        let items = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(quote_list(&items(&["a"])), "\"a\"");
        assert_eq!(quote_list(&items(&["a", "b"])), "\"a\" and \"b\"");
        assert_eq!(
            quote_list(&items(&["a", "b", "c", "d"])),
            "\"a\", \"b\" and \"c\""
        );
    }

    #[test]
    fn overall_is_mean_of_findings() {
        let b = |s: f32| BiasResult {
            category: "x".into(),
            score: s,
            explanation: String::new(),
        };
        assert!((overall_bias_score(&[b(0.4), b(0.8)]) - 0.6).abs() < 1e-6);
    }
}
