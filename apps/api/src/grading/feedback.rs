//! Feedback sentences and improvement suggestions.
//!
//! Both are deterministic functions of the gated scores and the relevance
//! verdict. Suggestions keep dimension order: STAR first, then quality.

use serde::{Deserialize, Serialize};

use crate::grading::aggregate::ScoreBundle;
use crate::grading::body_language::BodyLanguageDetails;
use crate::grading::relevance::RelevanceVerdict;

/// STAR dimensions below this get a suggestion.
pub const STAR_GOOD: u8 = 2;
/// Quality dimensions below this get a suggestion.
pub const QUALITY_GOOD: u8 = 3;

pub const EXCELLENT_TOTAL: u8 = 80;
pub const GOOD_TOTAL: u8 = 60;

pub const EXCELLENT_BANNER: &str =
    "Excellent answer! You covered the STAR framework comprehensively.";
pub const GOOD_BANNER: &str = "Good answer! A few refinements will make it even stronger.";
pub const IRRELEVANT_SUGGESTION: &str = "IRRELEVANT: This answer does not address the specific \
     question asked. Please read the prompt carefully.";

const NOT_APPLICABLE: &str = "N/A";

/// One sentence per scored dimension plus the body-language details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackBundle {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub reflection: String,
    pub clarity: String,
    pub structure: String,
    pub completeness: String,
    pub body_language: BodyLanguageDetails,
}

pub fn build_feedback(
    scores: &ScoreBundle,
    verdict: RelevanceVerdict,
    body_language: BodyLanguageDetails,
) -> FeedbackBundle {
    match verdict {
        RelevanceVerdict::Mismatch => FeedbackBundle {
            situation: NOT_APPLICABLE.to_string(),
            task: NOT_APPLICABLE.to_string(),
            action: NOT_APPLICABLE.to_string(),
            result: NOT_APPLICABLE.to_string(),
            reflection: NOT_APPLICABLE.to_string(),
            clarity: "Answer appears unrelated to the question.".to_string(),
            structure: "Structure is okay, but topic is wrong.".to_string(),
            completeness: "Did not answer the prompt.".to_string(),
            body_language,
        },
        RelevanceVerdict::Strong | RelevanceVerdict::Neutral => FeedbackBundle {
            situation: star_band(
                scores.situation,
                "Strong context setting with specific details.",
                "Some context provided, but could be more specific.",
                "Missing clear situation/context. Set the scene with when and where.",
            ),
            task: star_band(
                scores.task,
                "Clear task and objective articulated.",
                "Task mentioned but could be more explicit about goals.",
                "Unclear what you needed to accomplish. State your objective.",
            ),
            action: star_band(
                scores.action,
                "Detailed actions with clear ownership using 'I' statements.",
                "Some actions mentioned, but need more detail or sequence.",
                "Missing specific actions. Describe what YOU did step-by-step.",
            ),
            result: star_band(
                scores.result,
                "Strong results with quantifiable metrics.",
                "Results mentioned but lacking specific metrics.",
                "No clear results stated. Add outcomes and ideally metrics.",
            ),
            reflection: star_band(
                scores.reflection,
                "Excellent reflection with lessons learned and growth mindset.",
                "Some reflection, but could elaborate on learnings.",
                "Missing reflection. What did you learn? What would you do differently?",
            ),
            clarity: quality_band(
                scores.clarity,
                "Very clear and concise communication.",
                "Mostly clear, minor improvements possible.",
                "Could be clearer. Reduce filler words and tighten language.",
            ),
            structure: quality_band(
                scores.structure,
                "Well-structured answer with logical flow.",
                "Decent structure, but transitions could be smoother.",
                "Improve structure. Use beginning, middle, end with clear transitions.",
            ),
            completeness: quality_band(
                scores.completeness,
                "Comprehensive answer covering all STAR components.",
                "Most components covered, minor gaps.",
                "Incomplete answer. Ensure you cover Situation, Task, Action, Result, Reflection.",
            ),
            body_language,
        },
    }
}

fn star_band(score: u8, strong: &str, partial: &str, missing: &str) -> String {
    match score {
        s if s >= 2 => strong,
        1 => partial,
        _ => missing,
    }
    .to_string()
}

fn quality_band(score: u8, strong: &str, fair: &str, weak: &str) -> String {
    match score {
        s if s >= 4 => strong,
        3 => fair,
        _ => weak,
    }
    .to_string()
}

/// Per-dimension suggestion table, in output order.
const SUGGESTIONS: [(Dimension, &str); 8] = [
    (
        Dimension::Situation,
        "Add more context: Start with 'When I was working on...' and include timeframe/setting.",
    ),
    (
        Dimension::Task,
        "Clarify your goal: Explicitly state what you needed to accomplish and why it mattered.",
    ),
    (
        Dimension::Action,
        "Detail your actions: Use 'I' statements and describe your specific steps sequentially.",
    ),
    (
        Dimension::Result,
        "Quantify results: Add metrics like '20% improvement' or 'saved 10 hours per week'.",
    ),
    (
        Dimension::Reflection,
        "Add reflection: Share what you learned and how you'd apply it in the future.",
    ),
    (
        Dimension::Clarity,
        "Improve clarity: Reduce filler words and keep sentences focused.",
    ),
    (
        Dimension::Structure,
        "Enhance structure: Use transition words like 'First', 'Then', 'As a result'.",
    ),
    (
        Dimension::Completeness,
        "Be more complete: Make sure to touch on all aspects of the experience.",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Situation,
    Task,
    Action,
    Result,
    Reflection,
    Clarity,
    Structure,
    Completeness,
}

impl Dimension {
    fn needs_work(self, scores: &ScoreBundle) -> bool {
        match self {
            Dimension::Situation => scores.situation < STAR_GOOD,
            Dimension::Task => scores.task < STAR_GOOD,
            Dimension::Action => scores.action < STAR_GOOD,
            Dimension::Result => scores.result < STAR_GOOD,
            Dimension::Reflection => scores.reflection < STAR_GOOD,
            Dimension::Clarity => scores.clarity < QUALITY_GOOD,
            Dimension::Structure => scores.structure < QUALITY_GOOD,
            Dimension::Completeness => scores.completeness < QUALITY_GOOD,
        }
    }
}

pub fn build_suggestions(scores: &ScoreBundle, verdict: RelevanceVerdict) -> Vec<String> {
    if verdict.is_mismatch() {
        return vec![IRRELEVANT_SUGGESTION.to_string()];
    }

    let banner = if scores.total >= EXCELLENT_TOTAL {
        Some(EXCELLENT_BANNER)
    } else if scores.total >= GOOD_TOTAL {
        Some(GOOD_BANNER)
    } else {
        None
    };

    banner
        .into_iter()
        .chain(
            SUGGESTIONS
                .iter()
                .filter(|(dimension, _)| dimension.needs_work(scores))
                .map(|(_, text)| *text),
        )
        .map(str::to_string)
        .collect()
}
