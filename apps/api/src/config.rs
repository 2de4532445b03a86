use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Default number of questions drawn for a new session.
    pub questions_per_session: usize,
    /// Short-answer guard. `None` disables it.
    pub min_answer_words: Option<usize>,
    /// Pacing delay between receiving an answer and emitting feedback.
    pub analysis_delay: Duration,
    /// Base seed for session RNGs. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// How long a completed session stays readable before it is evicted.
    pub completed_session_ttl: Duration,
    pub session_sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            questions_per_session: 5,
            min_answer_words: None,
            analysis_delay: Duration::from_millis(1500),
            seed: None,
            completed_session_ttl: Duration::from_secs(300),
            session_sweep_interval: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let questions_per_session = optional_env::<usize>("QUESTIONS_PER_SESSION")?
            .unwrap_or(defaults.questions_per_session);
        if questions_per_session == 0 {
            anyhow::bail!("QUESTIONS_PER_SESSION must be at least 1");
        }

        let session_sweep_interval = optional_env::<u64>("SESSION_SWEEP_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_sweep_interval);
        if session_sweep_interval.is_zero() {
            anyhow::bail!("SESSION_SWEEP_INTERVAL_SECS must be at least 1");
        }

        Ok(Config {
            port: optional_env::<u16>("PORT")?.unwrap_or(defaults.port),
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            questions_per_session,
            min_answer_words: optional_env::<usize>("MIN_ANSWER_WORDS")?,
            analysis_delay: optional_env::<u64>("ANALYSIS_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.analysis_delay),
            seed: optional_env::<u64>("SEED")?,
            completed_session_ttl: optional_env::<u64>("COMPLETED_SESSION_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.completed_session_ttl),
            session_sweep_interval,
        })
    }
}

/// Reads and parses an optional variable. Unset or blank yields `None`.
fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        _ => Ok(None),
    }
}
