use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::SessionPhase;

/// Errors raised by the session state machine.
///
/// Only `UnknownRole` is fatal to a caller's intent; everything else is a
/// recoverable rejection that leaves the session untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Answer too short ({words} words, minimum {min_words}). Please elaborate.")]
    ShortAnswerRejected { words: usize, min_words: usize },

    #[error("An answer is already being analyzed for this session")]
    AnalysisInProgress,

    #[error("Session is complete; no further answers are accepted")]
    SessionComplete,

    #[error("Session result is only available once the session is complete")]
    ResultNotReady,

    #[error("Operation requires phase {expected:?}, session is {actual:?}")]
    InvalidPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Session(err) => {
                let (status, code) = match err {
                    SessionError::UnknownRole(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_ROLE"),
                    SessionError::ShortAnswerRejected { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "SHORT_ANSWER")
                    }
                    SessionError::AnalysisInProgress => {
                        (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS")
                    }
                    SessionError::SessionComplete => (StatusCode::CONFLICT, "SESSION_COMPLETE"),
                    SessionError::ResultNotReady => (StatusCode::CONFLICT, "RESULT_NOT_READY"),
                    SessionError::InvalidPhase { .. } => (StatusCode::CONFLICT, "INVALID_PHASE"),
                    SessionError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                };
                (status, code, err.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
