use std::sync::Arc;

use crate::config::Config;
use crate::grading::ResponseEvaluationEngine;
use crate::questions::QuestionBank;
use crate::report::{ReportCompiler, SummaryReportCompiler};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<ResponseEvaluationEngine>,
    /// Read-only question bank shared by every session.
    pub bank: Arc<QuestionBank>,
    pub sessions: SessionStore,
    /// Pluggable report compiler. Default: SummaryReportCompiler.
    pub report_compiler: Arc<dyn ReportCompiler>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions =
            SessionStore::new(config.seed).with_completed_ttl(config.completed_session_ttl);
        AppState {
            config,
            engine: Arc::new(ResponseEvaluationEngine::new()),
            bank: Arc::new(QuestionBank::builtin()),
            sessions,
            report_compiler: Arc::new(SummaryReportCompiler),
        }
    }
}
