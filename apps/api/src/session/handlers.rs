//! Axum route handlers for the Session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::questions::{Question, Role};
use crate::report::SessionReport;
use crate::session::orchestrator::{
    NextQuestion, SessionOrchestrator, SessionOptions, SessionPhase, SessionResult, SubmitOutcome,
};
use crate::session::store::{try_acquire, SharedSession};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RoleSummary {
    pub role: Role,
    pub question_count: usize,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleSummary>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub role: String,
    pub question_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub role: Role,
    pub phase: SessionPhase,
    pub total_questions: usize,
    pub question: Question,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptSegmentRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub finalized: String,
    pub interim: String,
    pub combined: String,
}

impl TranscriptResponse {
    fn of(session: &SessionOrchestrator) -> Self {
        let transcript = session.transcript();
        TranscriptResponse {
            finalized: transcript.finalized().to_string(),
            interim: transcript.interim().to_string(),
            combined: transcript.combined(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let roles = state
        .bank
        .roles()
        .into_iter()
        .map(|role| RoleSummary {
            role,
            question_count: state.bank.questions_for(role).map_or(0, <[_]>::len),
        })
        .collect();
    Json(RolesResponse { roles })
}

/// POST /api/v1/sessions
///
/// Creates a session and starts it. Nothing is stored when start fails.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    if req.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let count = req
        .question_count
        .unwrap_or(state.config.questions_per_session);

    let mut session = SessionOrchestrator::new(
        state.engine.clone(),
        state.bank.clone(),
        SessionOptions::from(&state.config),
        state.sessions.next_seed(),
    )
    .with_report_compiler(state.report_compiler.clone());

    let question = session.start(&req.role, count)?.clone();
    let progress = session.progress();
    let role = progress.role.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("started session has no role"))
    })?;

    let session_id = state.sessions.insert(session).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            role,
            phase: progress.phase,
            total_questions: progress.total_questions,
            question,
        }),
    ))
}

/// GET /api/v1/sessions/:id/question
pub async fn handle_next_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NextQuestion>, AppError> {
    let shared = lookup(&state, id).await?;
    let session = try_acquire(&shared)?;
    Ok(Json(session.next_question()?))
}

/// POST /api/v1/sessions/:id/answers
///
/// Grading runs on its own task so a disconnecting client cannot leave the
/// session stuck in `Analyzing`.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitOutcome>, AppError> {
    let shared = lookup(&state, id).await?;
    let mut session = try_acquire(&shared)?;

    let outcome = tokio::spawn(async move { session.submit_answer(&req.answer).await })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("answer task failed: {e}")))??;

    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/transcript
pub async fn handle_push_segment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TranscriptSegmentRequest>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let shared = lookup(&state, id).await?;
    let mut session = try_acquire(&shared)?;
    session.push_segment(&req.text, req.is_final)?;
    Ok(Json(TranscriptResponse::of(&session)))
}

/// POST /api/v1/sessions/:id/transcript/stop
pub async fn handle_stop_capture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let shared = lookup(&state, id).await?;
    let mut session = try_acquire(&shared)?;
    session.stop_capture()?;
    Ok(Json(TranscriptResponse::of(&session)))
}

/// POST /api/v1/sessions/:id/transcript/submit
pub async fn handle_submit_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitOutcome>, AppError> {
    let shared = lookup(&state, id).await?;
    let mut session = try_acquire(&shared)?;

    let outcome = tokio::spawn(async move { session.submit_transcript().await })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("transcript task failed: {e}")))??;

    Ok(Json(outcome))
}

/// GET /api/v1/sessions/:id/result
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResult>, AppError> {
    let shared = lookup(&state, id).await?;
    let session = try_acquire(&shared)?;
    Ok(Json(session.result()?.clone()))
}

/// GET /api/v1/sessions/:id/report
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionReport>, AppError> {
    let shared = lookup(&state, id).await?;
    let session = try_acquire(&shared)?;
    session
        .report()?
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No report compiled for session {id}")))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    tracing::info!(session_id = %id, "Session discarded");
    Ok(StatusCode::NO_CONTENT)
}

async fn lookup(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}
