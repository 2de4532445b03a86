//! Session reports: pluggable, trait-based compiler run once a session completes.
//!
//! Default: `SummaryReportCompiler` (averages, strengths, recurring weaknesses).
//!
//! `AppState` holds an `Arc<dyn ReportCompiler>`; every new session receives a
//! clone of it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::grading::feedback::{EXCELLENT_TOTAL, GOOD_TOTAL, QUALITY_GOOD, STAR_GOOD};
use crate::grading::rules::word_count;
use crate::questions::Role;
use crate::session::{SessionEntry, SessionResult};

/// Answers shorter than this count as "Too brief".
pub const BRIEF_ANSWER_WORDS: usize = 80;
/// Weaknesses listed in a report, most frequent first.
pub const TOP_WEAKNESSES: usize = 3;

pub const MISSING_METRICS: &str = "Missing metrics in Result";
pub const WEAK_ACTION: &str = "Weak Action detail";
pub const TOO_BRIEF: &str = "Too brief";

const DEFAULT_NUDGE: &str = "Keep your STAR structure clear and add specific outcomes.";

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Headline {
    Excellent,
    Good,
    NeedsWork,
}

impl Headline {
    pub fn for_score(average_score: u8) -> Self {
        if average_score >= EXCELLENT_TOTAL {
            Headline::Excellent
        } else if average_score >= GOOD_TOTAL {
            Headline::Good
        } else {
            Headline::NeedsWork
        }
    }
}

/// Mean score per dimension, one decimal place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionAverages {
    pub situation: f64,
    pub task: f64,
    pub action: f64,
    pub result: f64,
    pub reflection: f64,
    pub clarity: f64,
    pub structure: f64,
    pub completeness: f64,
    pub body_language: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaknessCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub role: Role,
    pub answered: usize,
    pub average_score: u8,
    pub headline: Headline,
    pub dimension_averages: DimensionAverages,
    pub strengths: Vec<String>,
    pub focus_areas: Vec<String>,
    pub top_weaknesses: Vec<WeaknessCount>,
    pub nudge: String,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Receives the finished `SessionResult` exactly once per session.
#[async_trait]
pub trait ReportCompiler: Send + Sync {
    async fn compile(&self, role: Role, result: &SessionResult) -> Result<SessionReport, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// SummaryReportCompiler: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Pure aggregation over the recorded entries, no external calls.
///
/// Weakness tally per answer:
/// - result < 2 → "Missing metrics in Result"
/// - action < 2 → "Weak Action detail"
/// - fewer than 80 words → "Too brief"
///
/// The most frequent weakness picks the nudge sentence.
pub struct SummaryReportCompiler;

#[async_trait]
impl ReportCompiler for SummaryReportCompiler {
    async fn compile(&self, role: Role, result: &SessionResult) -> Result<SessionReport, AppError> {
        Ok(summarize(role, result, Utc::now()))
    }
}

pub fn summarize(role: Role, result: &SessionResult, generated_at: DateTime<Utc>) -> SessionReport {
    let entries = result.entries();
    let answered = entries.len();

    let mean = |pick: fn(&SessionEntry) -> u8| mean_of(entries, pick);

    let average_score = mean(|e| e.scores.total).round() as u8;
    let averages = DimensionAverages {
        situation: one_decimal(mean(|e| e.scores.situation)),
        task: one_decimal(mean(|e| e.scores.task)),
        action: one_decimal(mean(|e| e.scores.action)),
        result: one_decimal(mean(|e| e.scores.result)),
        reflection: one_decimal(mean(|e| e.scores.reflection)),
        clarity: one_decimal(mean(|e| e.scores.clarity)),
        structure: one_decimal(mean(|e| e.scores.structure)),
        completeness: one_decimal(mean(|e| e.scores.completeness)),
        body_language: one_decimal(mean(|e| e.scores.body_language)),
    };

    let star_good = STAR_GOOD as f64;
    let quality_good = QUALITY_GOOD as f64;
    let dimensions = [
        ("Situation", averages.situation, star_good),
        ("Task", averages.task, star_good),
        ("Action", averages.action, star_good),
        ("Result", averages.result, star_good),
        ("Reflection", averages.reflection, star_good),
        ("Clarity", averages.clarity, quality_good),
        ("Structure", averages.structure, quality_good),
        ("Completeness", averages.completeness, quality_good),
    ];

    let (strong, weak): (Vec<_>, Vec<_>) = dimensions
        .iter()
        .partition(|(_, average, good)| answered > 0 && average >= good);

    let top_weaknesses = tally_weaknesses(result);
    let nudge = nudge_for(top_weaknesses.first().map(|w| w.label.as_str())).to_string();

    SessionReport {
        role,
        answered,
        average_score,
        headline: Headline::for_score(average_score),
        dimension_averages: averages,
        strengths: strong.iter().map(|(name, _, _)| name.to_string()).collect(),
        focus_areas: weak.iter().map(|(name, _, _)| name.to_string()).collect(),
        top_weaknesses,
        nudge,
        generated_at,
    }
}

/// Counts, most frequent first; ties keep the fixed label order.
fn tally_weaknesses(result: &SessionResult) -> Vec<WeaknessCount> {
    let mut counts = [(MISSING_METRICS, 0usize), (WEAK_ACTION, 0), (TOO_BRIEF, 0)];

    for entry in result.entries() {
        if entry.scores.result < STAR_GOOD {
            counts[0].1 += 1;
        }
        if entry.scores.action < STAR_GOOD {
            counts[1].1 += 1;
        }
        if word_count(&entry.answer) < BRIEF_ANSWER_WORDS {
            counts[2].1 += 1;
        }
    }

    // Stable sort keeps label order on ties.
    let mut counts: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 0).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_WEAKNESSES)
        .map(|(label, count)| WeaknessCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn nudge_for(top_weakness: Option<&str>) -> &'static str {
    match top_weakness {
        Some(MISSING_METRICS) => {
            "Before you answer, plan 1-2 measurable outcomes (%, time saved, impact)."
        }
        Some(WEAK_ACTION) => "List 2-3 concrete actions you personally took before you answer.",
        Some(TOO_BRIEF) => "Add more detail on context, actions, and results to reach 80+ words.",
        _ => DEFAULT_NUDGE,
    }
}

fn mean_of(entries: &[SessionEntry], pick: fn(&SessionEntry) -> u8) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let sum: u32 = entries.iter().map(|e| pick(e) as u32).sum();
    sum as f64 / entries.len() as f64
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
