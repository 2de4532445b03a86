#![allow(dead_code)]

//! Relevance gate. Does the answer address the topic the question asked about?

use serde::{Deserialize, Serialize};

use crate::grading::rules::{contains_any, count_hits, Topic, RULES};

/// Tri-state relevance verdict. Only `Mismatch` changes downstream scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceVerdict {
    /// The answer mentions the question's own topic.
    Strong,
    /// Unrecognized question topic, or no strong evidence either way.
    Neutral,
    /// No overlap with the question's topic, strong overlap with another one.
    Mismatch,
}

impl RelevanceVerdict {
    pub fn is_mismatch(self) -> bool {
        matches!(self, RelevanceVerdict::Mismatch)
    }
}

/// Verdict plus the topics that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevanceAssessment {
    pub verdict: RelevanceVerdict,
    pub question_topic: Option<&'static str>,
    /// The other topic that tripped the gate, with its hit count.
    pub competing_topic: Option<(&'static str, usize)>,
}

pub fn classify(answer: &str, question: &str) -> RelevanceVerdict {
    assess(answer, question).verdict
}

pub fn assess(answer: &str, question: &str) -> RelevanceAssessment {
    assess_with(
        &answer.to_lowercase(),
        &question.to_lowercase(),
        RULES.topics,
        RULES.mismatch_min_hits,
    )
}

fn assess_with(
    answer: &str,
    question: &str,
    topics: &'static [Topic],
    mismatch_min_hits: usize,
) -> RelevanceAssessment {
    // First match wins; table order is the tie-break.
    let Some(topic) = topics.iter().find(|t| contains_any(question, t.markers)) else {
        return RelevanceAssessment {
            verdict: RelevanceVerdict::Neutral,
            question_topic: None,
            competing_topic: None,
        };
    };

    if contains_any(answer, topic.markers) {
        return RelevanceAssessment {
            verdict: RelevanceVerdict::Strong,
            question_topic: Some(topic.key),
            competing_topic: None,
        };
    }

    // Strongest other topic; ties keep the earlier one.
    let best_other = topics
        .iter()
        .filter(|t| t.key != topic.key)
        .map(|t| (t.key, count_hits(answer, t.markers)))
        .fold(None::<(&'static str, usize)>, |best, candidate| match best {
            Some((_, hits)) if hits >= candidate.1 => best,
            _ => Some(candidate),
        });

    match best_other {
        Some((key, hits)) if hits >= mismatch_min_hits => RelevanceAssessment {
            verdict: RelevanceVerdict::Mismatch,
            question_topic: Some(topic.key),
            competing_topic: Some((key, hits)),
        },
        _ => RelevanceAssessment {
            verdict: RelevanceVerdict::Neutral,
            question_topic: Some(topic.key),
            competing_topic: None,
        },
    }
}
