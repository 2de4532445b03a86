mod config;
mod errors;
mod grading;
mod questions;
mod report;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Build app state: grading engine, question bank, session store, report compiler
    let state = AppState::new(config.clone());
    info!(
        "Grading rules v{}, {} roles, {} questions per session, analysis delay {:?}",
        state.engine.rules_version(),
        state.bank.roles().len(),
        config.questions_per_session,
        config.analysis_delay
    );
    match config.min_answer_words {
        Some(min) => info!("Short-answer guard enabled: {min} words"),
        None => info!("Short-answer guard disabled"),
    }
    if config.seed.is_some() {
        info!("Session RNGs seeded from SEED");
    }

    // Evict completed sessions once their retention window passes
    let _sweeper = state.sessions.spawn_sweeper(config.session_sweep_interval);
    info!(
        "Completed sessions kept for {:?}, swept every {:?}",
        config.completed_session_ttl, config.session_sweep_interval
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
