//! Response evaluation: pluggable, trait-based grader for one answer.
//!
//! Default: `ResponseEvaluationEngine` (rule tables, deterministic apart from
//! the body-language channel).
//!
//! `AppState` holds the engine behind an `Arc`; sessions hold it as
//! `Arc<dyn ResponseEvaluator>` so tests can inject a failing grader.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grading::aggregate::ScoreBundle;
use crate::grading::body_language::{BodyLanguageReport, BodyLanguageSource};
use crate::grading::feedback::{build_feedback, build_suggestions, FeedbackBundle};
use crate::grading::quality::score_quality;
use crate::grading::relevance::{classify, RelevanceVerdict};
use crate::grading::rules::{word_count, RULES_VERSION};
use crate::grading::star::score_star;
use crate::questions::Question;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Everything the grader says about one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub relevance: RelevanceVerdict,
    pub word_count: usize,
    pub scores: ScoreBundle,
    pub feedback: FeedbackBundle,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Evaluator fault: {0}")]
    Fault(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap grading backends without touching the session
/// state machine or the HTTP handlers.
pub trait ResponseEvaluator: Send + Sync {
    fn evaluate(
        &self,
        answer: &str,
        question: &Question,
        body_language: &mut dyn BodyLanguageSource,
    ) -> Result<Evaluation, EvaluationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// ResponseEvaluationEngine: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Rule-table grader.
///
/// 1. Relevance verdict from topic markers in question and answer.
/// 2. Five STAR scorers (0–2) and three quality scorers (0–5).
/// 3. One body-language sample.
/// 4. Gate + total, then feedback sentences and suggestions.
///
/// Never fails: empty or malformed answers simply score low.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEvaluationEngine;

impl ResponseEvaluationEngine {
    pub fn new() -> Self {
        ResponseEvaluationEngine
    }

    pub fn rules_version(&self) -> &'static str {
        RULES_VERSION
    }

    /// Infallible form used by the stateless endpoint.
    pub fn grade(
        &self,
        answer: &str,
        question: &Question,
        body_language: &mut dyn BodyLanguageSource,
    ) -> Evaluation {
        let lower = answer.to_lowercase();
        let words = word_count(answer);

        let relevance = classify(answer, &question.text);
        let star = score_star(&lower, words);
        let quality = score_quality(answer, &lower, words);
        let body = BodyLanguageReport::from_reading(body_language.sample());

        let scores = ScoreBundle::assemble(star, quality, relevance, body.score);
        let feedback = build_feedback(&scores, relevance, body.details);
        let suggestions = build_suggestions(&scores, relevance);

        tracing::debug!(
            question_id = %question.id,
            words,
            ?relevance,
            total = scores.total,
            "Answer graded"
        );

        Evaluation {
            relevance,
            word_count: words,
            scores,
            feedback,
            suggestions,
        }
    }
}

impl ResponseEvaluator for ResponseEvaluationEngine {
    fn evaluate(
        &self,
        answer: &str,
        question: &Question,
        body_language: &mut dyn BodyLanguageSource,
    ) -> Result<Evaluation, EvaluationError> {
        Ok(self.grade(answer, question, body_language))
    }
}
