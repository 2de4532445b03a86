//! Session orchestrator: state machine over one ordered run of questions.
//!
//! ```text
//! Initializing → AwaitingAnswer → Analyzing → FeedbackDelivered ─┬→ AwaitingAnswer
//!                                                                └→ Complete
//! ```
//!
//! Each orchestrator owns its RNGs, transcript and results. The evaluator,
//! question bank and report compiler are shared read-only through `Arc`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::SessionError;
use crate::grading::aggregate::ScoreBundle;
use crate::grading::body_language::{BodyLanguageSource, SimulatedBodyLanguage};
use crate::grading::feedback::FeedbackBundle;
use crate::grading::rules::word_count;
use crate::grading::{Evaluation, EvaluationError, ResponseEvaluator};
use crate::questions::{Question, QuestionBank, Role};
use crate::report::{ReportCompiler, SessionReport};
use crate::session::transcript::TranscriptBuffer;

/// Shown instead of feedback when the evaluator faults.
pub const EVALUATION_FAILED_MESSAGE: &str =
    "I encountered a small error analyzing that. Let's move on.";

/// Keeps the body-language stream independent of the question shuffle.
const BODY_LANGUAGE_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Initializing,
    AwaitingAnswer,
    Analyzing,
    FeedbackDelivered,
    Complete,
}

/// One graded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub question: Question,
    pub answer: String,
    pub scores: ScoreBundle,
    pub feedback: FeedbackBundle,
    pub suggestions: Vec<String>,
}

/// Graded answers in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    entries: Vec<SessionEntry>,
}

impl SessionResult {
    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn push(&mut self, entry: SessionEntry) {
        self.entries.push(entry);
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub role: Option<Role>,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub results: SessionResult,
    pub phase: SessionPhase,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            role: None,
            questions: Vec::new(),
            current_index: 0,
            results: SessionResult::default(),
            phase: SessionPhase::Initializing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub min_answer_words: Option<usize>,
    pub analysis_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            min_answer_words: None,
            analysis_delay: Duration::from_millis(1500),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        SessionOptions {
            min_answer_words: config.min_answer_words,
            analysis_delay: config.analysis_delay,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerFeedback {
    Graded(Evaluation),
    Unavailable { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextQuestion {
    Question {
        /// Zero-based position in the session.
        index: usize,
        total: usize,
        question: Question,
    },
    SessionComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub feedback: AnswerFeedback,
    pub next: NextQuestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub session_id: Uuid,
    pub role: Option<Role>,
    pub phase: SessionPhase,
    pub current_index: usize,
    pub total_questions: usize,
    pub answered: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct SessionOrchestrator {
    id: Uuid,
    state: SessionState,
    options: SessionOptions,
    evaluator: Arc<dyn ResponseEvaluator>,
    bank: Arc<QuestionBank>,
    rng: StdRng,
    body_language: Box<dyn BodyLanguageSource>,
    transcript: TranscriptBuffer,
    report_compiler: Option<Arc<dyn ReportCompiler>>,
    report: Option<SessionReport>,
    completed_at: Option<Instant>,
}

impl SessionOrchestrator {
    /// The same seed always yields the same question order and body-language
    /// stream.
    pub fn new(
        evaluator: Arc<dyn ResponseEvaluator>,
        bank: Arc<QuestionBank>,
        options: SessionOptions,
        seed: u64,
    ) -> Self {
        SessionOrchestrator {
            id: Uuid::new_v4(),
            state: SessionState::default(),
            options,
            evaluator,
            bank,
            rng: StdRng::seed_from_u64(seed),
            body_language: Box::new(SimulatedBodyLanguage::from_seed(
                seed ^ BODY_LANGUAGE_SEED_SALT,
            )),
            transcript: TranscriptBuffer::new(),
            report_compiler: None,
            report: None,
            completed_at: None,
        }
    }

    #[cfg(test)]
    pub fn with_body_language(mut self, source: Box<dyn BodyLanguageSource>) -> Self {
        self.body_language = source;
        self
    }

    pub fn with_report_compiler(mut self, compiler: Arc<dyn ReportCompiler>) -> Self {
        self.report_compiler = Some(compiler);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    #[cfg(test)]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Time since the session reached `Complete`; `None` while in progress.
    pub fn completed_for(&self, now: Instant) -> Option<Duration> {
        self.completed_at.map(|at| now.saturating_duration_since(at))
    }

    pub fn transcript(&self) -> &TranscriptBuffer {
        &self.transcript
    }

    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            session_id: self.id,
            role: self.state.role,
            phase: self.state.phase,
            current_index: self.state.current_index,
            total_questions: self.state.questions.len(),
            answered: self.state.results.len(),
        }
    }

    /// Parses the role and draws `n` questions. On error the session stays
    /// in `Initializing` with no questions.
    pub fn start(&mut self, role: &str, n: usize) -> Result<&Question, SessionError> {
        if self.state.phase != SessionPhase::Initializing {
            return Err(SessionError::InvalidPhase {
                expected: SessionPhase::Initializing,
                actual: self.state.phase,
            });
        }
        if n == 0 {
            return Err(SessionError::Validation(
                "question count must be at least 1".to_string(),
            ));
        }

        let role: Role = match role.parse() {
            Ok(role) => role,
            Err(e) => {
                warn!(session_id = %self.id, "Session start rejected: {e}");
                return Err(e);
            }
        };
        let questions = self.bank.pick_session_questions(role, n, &mut self.rng)?;

        info!(
            session_id = %self.id,
            %role,
            questions = questions.len(),
            "Session started"
        );

        self.state.role = Some(role);
        self.state.questions = questions;
        self.state.current_index = 0;
        self.state.phase = SessionPhase::AwaitingAnswer;

        Ok(&self.state.questions[0])
    }

    pub fn next_question(&self) -> Result<NextQuestion, SessionError> {
        match self.state.phase {
            SessionPhase::AwaitingAnswer => Ok(self.current_question()),
            SessionPhase::Complete => Ok(NextQuestion::SessionComplete),
            SessionPhase::Analyzing | SessionPhase::FeedbackDelivered => {
                Err(SessionError::AnalysisInProgress)
            }
            SessionPhase::Initializing => Err(SessionError::InvalidPhase {
                expected: SessionPhase::AwaitingAnswer,
                actual: SessionPhase::Initializing,
            }),
        }
    }

    /// Grades `answer` against the current question and advances.
    ///
    /// A short-answer rejection consumes nothing. An evaluator fault, error or
    /// panic, is recovered here: no entry is recorded but the session still
    /// advances.
    pub async fn submit_answer(&mut self, answer: &str) -> Result<SubmitOutcome, SessionError> {
        self.ensure_accepting_answers()?;

        if let Some(min_words) = self.options.min_answer_words {
            let words = word_count(answer);
            if words < min_words {
                info!(session_id = %self.id, words, min_words, "Short answer rejected");
                return Err(SessionError::ShortAnswerRejected { words, min_words });
            }
        }

        let question = self.state.questions[self.state.current_index].clone();
        self.state.phase = SessionPhase::Analyzing;

        if !self.options.analysis_delay.is_zero() {
            tokio::time::sleep(self.options.analysis_delay).await;
        }

        let feedback = match self.evaluate_guarded(answer, &question) {
            Ok(evaluation) => {
                self.state.phase = SessionPhase::FeedbackDelivered;
                self.state.results.push(SessionEntry {
                    question,
                    answer: answer.to_string(),
                    scores: evaluation.scores,
                    feedback: evaluation.feedback.clone(),
                    suggestions: evaluation.suggestions.clone(),
                });
                info!(
                    session_id = %self.id,
                    index = self.state.current_index,
                    total = evaluation.scores.total,
                    "Feedback delivered"
                );
                AnswerFeedback::Graded(evaluation)
            }
            Err(e) => {
                error!(
                    session_id = %self.id,
                    index = self.state.current_index,
                    "Evaluation failed: {e}"
                );
                AnswerFeedback::Unavailable {
                    message: EVALUATION_FAILED_MESSAGE.to_string(),
                }
            }
        };

        let next = self.advance().await;
        Ok(SubmitOutcome { feedback, next })
    }

    pub fn result(&self) -> Result<&SessionResult, SessionError> {
        match self.state.phase {
            SessionPhase::Complete => Ok(&self.state.results),
            _ => Err(SessionError::ResultNotReady),
        }
    }

    /// `Ok(None)` when the session completed but no report was compiled.
    pub fn report(&self) -> Result<Option<&SessionReport>, SessionError> {
        self.result()?;
        Ok(self.report.as_ref())
    }

    // ── Transcript capture ──────────────────────────────────────────────────

    pub fn push_segment(&mut self, text: &str, is_final: bool) -> Result<(), SessionError> {
        self.ensure_accepting_answers()?;
        self.transcript.push_segment(text, is_final);
        Ok(())
    }

    pub fn stop_capture(&mut self) -> Result<(), SessionError> {
        self.ensure_accepting_answers()?;
        self.transcript.stop_capture();
        Ok(())
    }

    /// Submits finalized + interim text. The buffer is cleared only once the
    /// answer is consumed; a rejection keeps it for another attempt.
    pub async fn submit_transcript(&mut self) -> Result<SubmitOutcome, SessionError> {
        let answer = self.transcript.combined();
        let outcome = self.submit_answer(&answer).await?;
        self.transcript.clear();
        Ok(outcome)
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn ensure_accepting_answers(&self) -> Result<(), SessionError> {
        match self.state.phase {
            SessionPhase::AwaitingAnswer => Ok(()),
            SessionPhase::Complete => Err(SessionError::SessionComplete),
            SessionPhase::Analyzing | SessionPhase::FeedbackDelivered => {
                Err(SessionError::AnalysisInProgress)
            }
            SessionPhase::Initializing => Err(SessionError::InvalidPhase {
                expected: SessionPhase::AwaitingAnswer,
                actual: SessionPhase::Initializing,
            }),
        }
    }

    /// A panicking evaluator must not leave the session stuck in `Analyzing`.
    fn evaluate_guarded(
        &mut self,
        answer: &str,
        question: &Question,
    ) -> Result<Evaluation, EvaluationError> {
        let evaluator = &self.evaluator;
        let body_language = self.body_language.as_mut();
        panic::catch_unwind(AssertUnwindSafe(|| {
            evaluator.evaluate(answer, question, body_language)
        }))
        .unwrap_or_else(|payload| Err(EvaluationError::Fault(panic_message(&*payload))))
    }

    fn current_question(&self) -> NextQuestion {
        NextQuestion::Question {
            index: self.state.current_index,
            total: self.state.questions.len(),
            question: self.state.questions[self.state.current_index].clone(),
        }
    }

    async fn advance(&mut self) -> NextQuestion {
        self.state.current_index += 1;

        if self.state.current_index < self.state.questions.len() {
            self.state.phase = SessionPhase::AwaitingAnswer;
            return self.current_question();
        }

        self.state.phase = SessionPhase::Complete;
        self.completed_at = Some(Instant::now());
        info!(
            session_id = %self.id,
            answered = self.state.results.len(),
            "Session complete"
        );
        self.compile_report().await;
        NextQuestion::SessionComplete
    }

    /// Runs once: `Complete` is terminal and nothing re-enters `advance`.
    async fn compile_report(&mut self) {
        let (Some(compiler), Some(role)) = (self.report_compiler.clone(), self.state.role) else {
            return;
        };
        match compiler.compile(role, &self.state.results).await {
            Ok(report) => self.report = Some(report),
            Err(e) => error!(session_id = %self.id, "Report compilation failed: {e}"),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("evaluator panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("evaluator panicked: {message}")
    } else {
        "evaluator panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::errors::AppError;
    use crate::grading::body_language::{BodyLanguageReading, FixedBodyLanguage};
    use crate::grading::ResponseEvaluationEngine;
    use crate::report::SummaryReportCompiler;

    const ANSWER: &str = "Situation: When I led the Q3 migration. Task: I needed to cut \
        downtime. Action: I first audited risk, then built a rollback script, then \
        coordinated with three teams. Result: We reduced downtime by 20% and saved $5,000. \
        I learned I should document runbooks earlier next time.";

    struct FailingEvaluator;

    impl ResponseEvaluator for FailingEvaluator {
        fn evaluate(
            &self,
            _answer: &str,
            _question: &Question,
            _body_language: &mut dyn BodyLanguageSource,
        ) -> Result<Evaluation, EvaluationError> {
            Err(EvaluationError::Fault("scorer offline".to_string()))
        }
    }

    /// Fails on the listed zero-based calls, grades normally otherwise.
    struct FlakyEvaluator {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
    }

    impl ResponseEvaluator for FlakyEvaluator {
        fn evaluate(
            &self,
            answer: &str,
            question: &Question,
            body_language: &mut dyn BodyLanguageSource,
        ) -> Result<Evaluation, EvaluationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&call) {
                return Err(EvaluationError::Fault(format!("call {call}")));
            }
            ResponseEvaluationEngine::new().evaluate(answer, question, body_language)
        }
    }

    /// Panics on the first call, grades normally afterwards.
    #[derive(Default)]
    struct PanicOnceEvaluator {
        calls: AtomicUsize,
    }

    impl ResponseEvaluator for PanicOnceEvaluator {
        fn evaluate(
            &self,
            answer: &str,
            question: &Question,
            body_language: &mut dyn BodyLanguageSource,
        ) -> Result<Evaluation, EvaluationError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("scorer blew up");
            }
            ResponseEvaluationEngine::new().evaluate(answer, question, body_language)
        }
    }

    #[derive(Default)]
    struct CountingCompiler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReportCompiler for CountingCompiler {
        async fn compile(
            &self,
            role: Role,
            result: &SessionResult,
        ) -> Result<SessionReport, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            SummaryReportCompiler.compile(role, result).await
        }
    }

    fn options() -> SessionOptions {
        SessionOptions {
            min_answer_words: None,
            analysis_delay: Duration::ZERO,
        }
    }

    fn orchestrator(
        evaluator: Arc<dyn ResponseEvaluator>,
        options: SessionOptions,
    ) -> SessionOrchestrator {
        SessionOrchestrator::new(evaluator, Arc::new(QuestionBank::builtin()), options, 42)
            .with_body_language(Box::new(FixedBodyLanguage(BodyLanguageReading {
                eye_contact: 8,
                tone: 8,
                pacing: 8,
            })))
    }

    fn engine_session() -> SessionOrchestrator {
        orchestrator(Arc::new(ResponseEvaluationEngine::new()), options())
    }

    #[test]
    fn test_unknown_role_leaves_session_initializing() {
        let mut s = engine_session();
        let err = s.start("Designer", 5).unwrap_err();
        assert_eq!(err, SessionError::UnknownRole("Designer".to_string()));
        assert_eq!(s.phase(), SessionPhase::Initializing);
        assert!(s.state().questions.is_empty());
        assert!(s.state().role.is_none());
    }

    #[test]
    fn test_start_selects_n_questions_from_role() {
        let mut s = engine_session();
        let first = s.start("SWE", 5).unwrap().clone();
        assert_eq!(s.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(s.state().questions.len(), 5);
        assert_eq!(s.state().questions[0], first);
        assert!(s.state().questions.iter().all(|q| q.id.starts_with("swe_")));
    }

    #[test]
    fn test_start_takes_all_when_n_exceeds_pool() {
        let mut s = engine_session();
        s.start("product", 50).unwrap();
        assert_eq!(s.state().questions.len(), 12);
    }

    #[test]
    fn test_start_rejects_zero_and_double_start() {
        let mut s = engine_session();
        assert!(matches!(s.start("SWE", 0), Err(SessionError::Validation(_))));
        assert_eq!(s.phase(), SessionPhase::Initializing);

        s.start("SWE", 2).unwrap();
        assert_eq!(
            s.start("SWE", 2).unwrap_err(),
            SessionError::InvalidPhase {
                expected: SessionPhase::Initializing,
                actual: SessionPhase::AwaitingAnswer,
            }
        );
    }

    #[test]
    fn test_same_seed_same_question_order() {
        let mut a = engine_session();
        let mut b = engine_session();
        a.start("Data Analyst", 5).unwrap();
        b.start("Data Analyst", 5).unwrap();
        assert_eq!(a.state().questions, b.state().questions);
    }

    #[tokio::test]
    async fn test_submit_before_start_is_invalid_phase() {
        let mut s = engine_session();
        let err = s.submit_answer(ANSWER).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidPhase { .. }));
    }

    #[tokio::test]
    async fn test_full_session_records_results_in_order() {
        let compiler = Arc::new(CountingCompiler::default());
        let mut s = engine_session().with_report_compiler(compiler.clone());
        s.start("SWE", 3).unwrap();
        let asked: Vec<Question> = s.state().questions.clone();

        let first = s.submit_answer(ANSWER).await.unwrap();
        assert!(matches!(first.feedback, AnswerFeedback::Graded(_)));
        assert_eq!(
            first.next,
            NextQuestion::Question {
                index: 1,
                total: 3,
                question: asked[1].clone(),
            }
        );
        assert!(s.result().is_err());

        s.submit_answer("second answer").await.unwrap();
        let last = s.submit_answer("third answer").await.unwrap();
        assert_eq!(last.next, NextQuestion::SessionComplete);
        assert_eq!(s.phase(), SessionPhase::Complete);

        let result = s.result().unwrap();
        assert_eq!(result.len(), 3);
        let recorded: Vec<&Question> = result.entries().iter().map(|e| &e.question).collect();
        assert_eq!(recorded, asked.iter().collect::<Vec<_>>());
        assert_eq!(result.entries()[1].answer, "second answer");

        assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
        let report = s.report().unwrap().unwrap();
        assert_eq!(report.answered, 3);
    }

    #[tokio::test]
    async fn test_complete_rejects_further_answers() {
        let compiler = Arc::new(CountingCompiler::default());
        let mut s = engine_session().with_report_compiler(compiler.clone());
        s.start("SWE", 1).unwrap();
        s.submit_answer(ANSWER).await.unwrap();

        assert_eq!(
            s.submit_answer(ANSWER).await.unwrap_err(),
            SessionError::SessionComplete
        );
        assert_eq!(s.next_question().unwrap(), NextQuestion::SessionComplete);
        assert_eq!(s.result().unwrap().len(), 1);
        assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_answer_guard_does_not_consume_question() {
        let mut s = orchestrator(
            Arc::new(ResponseEvaluationEngine::new()),
            SessionOptions {
                min_answer_words: Some(3),
                analysis_delay: Duration::ZERO,
            },
        );
        s.start("SWE", 2).unwrap();

        let err = s.submit_answer("too short").await.unwrap_err();
        assert_eq!(
            err,
            SessionError::ShortAnswerRejected {
                words: 2,
                min_words: 3
            }
        );
        assert_eq!(s.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(s.state().current_index, 0);

        s.submit_answer("now long enough").await.unwrap();
        assert_eq!(s.state().current_index, 1);
    }

    #[tokio::test]
    async fn test_guard_disabled_accepts_empty_answer() {
        let mut s = engine_session();
        s.start("SWE", 1).unwrap();
        let outcome = s.submit_answer("").await.unwrap();
        assert!(matches!(outcome.feedback, AnswerFeedback::Graded(_)));
        assert_eq!(s.result().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_evaluator_failure_advances_without_recording() {
        let evaluator = Arc::new(FlakyEvaluator {
            calls: AtomicUsize::new(0),
            fail_on: vec![0],
        });
        let mut s = orchestrator(evaluator, options());
        s.start("SWE", 2).unwrap();

        let outcome = s.submit_answer(ANSWER).await.unwrap();
        assert_eq!(
            outcome.feedback,
            AnswerFeedback::Unavailable {
                message: EVALUATION_FAILED_MESSAGE.to_string()
            }
        );
        assert_eq!(s.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(s.state().current_index, 1);

        s.submit_answer(ANSWER).await.unwrap();
        let result = s.result().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].question, s.state().questions[1]);
    }

    #[tokio::test]
    async fn test_failure_on_last_question_still_completes() {
        let compiler = Arc::new(CountingCompiler::default());
        let mut s = orchestrator(Arc::new(FailingEvaluator), options())
            .with_report_compiler(compiler.clone());
        s.start("Product", 1).unwrap();

        let outcome = s.submit_answer(ANSWER).await.unwrap();
        assert_eq!(outcome.next, NextQuestion::SessionComplete);
        assert!(s.result().unwrap().entries().is_empty());
        assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_evaluator_panic_recovers_and_advances() {
        let mut s = orchestrator(Arc::new(PanicOnceEvaluator::default()), options());
        s.start("SWE", 2).unwrap();

        let outcome = s.submit_answer(ANSWER).await.unwrap();
        assert_eq!(
            outcome.feedback,
            AnswerFeedback::Unavailable {
                message: EVALUATION_FAILED_MESSAGE.to_string()
            }
        );
        assert_eq!(s.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(s.state().current_index, 1);

        let second = s.submit_answer(ANSWER).await.unwrap();
        assert!(matches!(second.feedback, AnswerFeedback::Graded(_)));
        assert_eq!(s.result().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_evaluator_panic_on_spawned_task_releases_session() {
        use crate::session::store::try_acquire;
        use tokio::sync::Mutex;

        let shared = Arc::new(Mutex::new(orchestrator(
            Arc::new(PanicOnceEvaluator::default()),
            options(),
        )));
        try_acquire(&shared).unwrap().start("SWE", 2).unwrap();

        let mut guard = try_acquire(&shared).unwrap();
        let joined = tokio::spawn(async move { guard.submit_answer(ANSWER).await }).await;
        let outcome = joined.expect("task does not panic").unwrap();
        assert!(matches!(outcome.feedback, AnswerFeedback::Unavailable { .. }));

        let mut guard = try_acquire(&shared).unwrap();
        assert_eq!(guard.phase(), SessionPhase::AwaitingAnswer);
        assert!(guard.submit_answer(ANSWER).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_delay_is_observed() {
        let mut s = orchestrator(
            Arc::new(ResponseEvaluationEngine::new()),
            SessionOptions {
                min_answer_words: None,
                analysis_delay: Duration::from_millis(1500),
            },
        );
        s.start("SWE", 1).unwrap();

        let started = tokio::time::Instant::now();
        s.submit_answer(ANSWER).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_transcript_submit_clears_buffer_once_consumed() {
        let mut s = engine_session();
        s.start("SWE", 2).unwrap();

        s.push_segment("When I led the migration", true).unwrap();
        s.push_segment("we cut downtime", false).unwrap();
        s.submit_transcript().await.unwrap();

        assert!(s.transcript().is_empty());
        let entry = &s.state().results.entries()[0];
        assert_eq!(entry.answer, "When I led the migration we cut downtime");
    }

    #[tokio::test]
    async fn test_transcript_kept_when_rejected() {
        let mut s = orchestrator(
            Arc::new(ResponseEvaluationEngine::new()),
            SessionOptions {
                min_answer_words: Some(3),
                analysis_delay: Duration::ZERO,
            },
        );
        s.start("SWE", 1).unwrap();
        s.push_segment("hello", true).unwrap();
        s.push_segment("there", false).unwrap();
        s.stop_capture().unwrap();

        let err = s.submit_transcript().await.unwrap_err();
        assert!(matches!(err, SessionError::ShortAnswerRejected { words: 1, .. }));
        assert_eq!(s.transcript().combined(), "hello");
    }

    #[tokio::test]
    async fn test_progress_tracks_answers() {
        let mut s = engine_session();
        s.start("SWE", 2).unwrap();
        s.submit_answer(ANSWER).await.unwrap();
        let p = s.progress();
        assert_eq!(p.session_id, s.id());
        assert_eq!(p.role, Some(Role::Swe));
        assert_eq!(p.current_index, 1);
        assert_eq!(p.total_questions, 2);
        assert_eq!(p.answered, 1);
    }
}
