//! STAR(+Reflection) dimension scorers.
//!
//! Each scorer returns 0, 1 or 2 from keyword presence and word count only.
//! Inputs are the lower-cased answer and its word count.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::grading::rules::{contains_any, count_hits, RULES};

static SPECIFICITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(RULES.situation.specificity_pattern).expect("specificity pattern is valid")
});

static METRIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(RULES.result.metric_pattern).expect("metric pattern is valid"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarScores {
    pub situation: u8,
    pub task: u8,
    pub action: u8,
    pub result: u8,
    pub reflection: u8,
}

impl StarScores {
    pub fn sum(&self) -> u32 {
        [
            self.situation,
            self.task,
            self.action,
            self.result,
            self.reflection,
        ]
        .iter()
        .map(|&s| s as u32)
        .sum()
    }
}

pub fn score_star(text: &str, word_count: usize) -> StarScores {
    StarScores {
        situation: score_situation(text, word_count),
        task: score_task(text, word_count),
        action: score_action(text, word_count),
        result: score_result(text),
        reflection: score_reflection(text),
    }
}

/// Two-signal band shared by most STAR scorers: both → 2, either → 1.
fn band(primary: bool, secondary: bool, long_enough: bool) -> u8 {
    if primary && secondary && long_enough {
        2
    } else if primary || secondary {
        1
    } else {
        0
    }
}

pub fn score_situation(text: &str, word_count: usize) -> u8 {
    let rules = &RULES.situation;
    let has_context = contains_any(text, rules.context_markers);
    let has_specifics = SPECIFICITY_RE.is_match(text);
    band(has_context, has_specifics, word_count > rules.min_words)
}

pub fn score_task(text: &str, word_count: usize) -> u8 {
    let rules = &RULES.task;
    let has_need = contains_any(text, rules.need_markers);
    let has_goal = contains_any(text, rules.goal_markers);
    band(has_need, has_goal, word_count > rules.min_words)
}

pub fn score_action(text: &str, word_count: usize) -> u8 {
    let rules = &RULES.action;
    let hits = count_hits(text, rules.markers);
    let has_sequence = contains_any(text, rules.sequence_markers);

    if hits >= rules.min_hits && word_count > rules.min_words {
        2
    } else if hits >= 1 || has_sequence {
        1
    } else {
        0
    }
}

pub fn score_result(text: &str) -> u8 {
    let has_outcome = contains_any(text, RULES.result.outcome_markers);
    let has_metric = METRIC_RE.is_match(text);
    band(has_outcome, has_metric, true)
}

pub fn score_reflection(text: &str) -> u8 {
    let rules = &RULES.reflection;
    let has_learning = contains_any(text, rules.learning_markers);
    let has_growth = contains_any(text, rules.growth_markers);
    band(has_learning, has_growth, true)
}
