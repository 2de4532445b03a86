//! Quality scorers: clarity, structure and completeness on a 0–5 scale.

use serde::{Deserialize, Serialize};

use crate::grading::rules::{contains_any, count_hits, RULES};

/// Maximum score of a single quality dimension.
pub const QUALITY_MAX: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScores {
    pub clarity: u8,
    pub structure: u8,
    pub completeness: u8,
}

impl QualityScores {
    pub fn sum(&self) -> u32 {
        self.clarity as u32 + self.structure as u32 + self.completeness as u32
    }
}

/// `text` is the answer as typed (paragraph breaks matter), `lower` its
/// lower-cased form.
pub fn score_quality(text: &str, lower: &str, word_count: usize) -> QualityScores {
    QualityScores {
        clarity: score_clarity(text, lower, word_count),
        structure: score_structure(lower),
        completeness: score_completeness(lower, word_count),
    }
}

pub fn score_clarity(text: &str, lower: &str, word_count: usize) -> u8 {
    let rules = &RULES.clarity;
    if word_count < rules.short_answer_words {
        return rules.short_answer_score;
    }

    let filler_count: usize = rules
        .fillers
        .iter()
        .map(|filler| lower.matches(format!(" {filler} ").as_str()).count())
        .sum();

    let mut score = QUALITY_MAX;
    if filler_count > rules.max_fillers {
        score -= 1;
    }
    if word_count < rules.concise_min_words {
        score -= 1;
    }
    if word_count > rules.wall_of_text_words && !has_paragraph_break(text) {
        score -= 1;
    }
    score
}

pub fn score_structure(lower: &str) -> u8 {
    let rules = &RULES.structure;

    // Explicit section labels override every other heuristic.
    if contains_any(lower, rules.labels) {
        return QUALITY_MAX;
    }

    let opening = head_chars(lower, rules.snippet_chars);
    let closing = tail_chars(lower, rules.snippet_chars);

    let elements = [
        contains_any(opening, rules.beginning_markers),
        contains_any(lower, rules.middle_markers),
        contains_any(closing, rules.ending_markers),
    ]
    .iter()
    .filter(|&&present| present)
    .count() as u8;

    let transitions = count_hits(lower, rules.transitions).min(rules.max_transition_bonus as usize);

    (elements + transitions as u8).min(QUALITY_MAX)
}

pub fn score_completeness(lower: &str, word_count: usize) -> u8 {
    let rules = &RULES.completeness;
    let covered = rules
        .components
        .iter()
        .filter(|(_, markers)| contains_any(lower, markers))
        .count() as u8;

    if word_count < rules.short_answer_words {
        covered.min(rules.short_answer_cap)
    } else {
        covered
    }
}

/// A blank line (only whitespace between two newlines) separates paragraphs.
fn has_paragraph_break(text: &str) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    lines.len() > 2
        && lines[1..lines.len() - 1]
            .iter()
            .any(|line| line.trim().is_empty())
}

fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn tail_chars(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    if total <= n {
        return s;
    }
    match s.char_indices().nth(total - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
