//! Axum route handlers for the stateless grading API.

use axum::{extract::State, Json};
use serde::{de::IgnoredAny, Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::AppError;
use crate::grading::body_language::SimulatedBodyLanguage;
use crate::grading::engine::Evaluation;
use crate::questions::Question;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Missing, `null` or mistyped fields grade as empty text; grading never
/// rejects input.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub answer: String,
    #[serde(default)]
    pub question: Option<QuestionInput>,
}

/// Either a bare prompt or a full question record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionInput {
    Text(String),
    Record(Question),
    Unreadable(IgnoredAny),
}

impl QuestionInput {
    fn into_question(self) -> Question {
        match self {
            QuestionInput::Text(text) => Question::new("adhoc", text, &[]),
            QuestionInput::Record(question) => question,
            QuestionInput::Unreadable(_) => Question::new("adhoc", "", &[]),
        }
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => text,
        _ => String::new(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluate
///
/// Grades one answer against one question without creating a session.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<Evaluation>, AppError> {
    let question = request
        .question
        .map_or_else(|| Question::new("adhoc", "", &[]), QuestionInput::into_question);

    // A configured seed still yields a fresh body-language stream per request.
    let mut body_language = match state.config.seed {
        Some(_) => SimulatedBodyLanguage::from_seed(state.sessions.next_seed()),
        None => SimulatedBodyLanguage::from_entropy(),
    };

    let evaluation = state
        .engine
        .grade(&request.answer, &question, &mut body_language);

    Ok(Json(evaluation))
}
