//! Live session registry.
//!
//! Every orchestrator sits behind its own mutex so sessions never contend
//! with each other; the map lock is held only to look up, insert, remove or
//! sweep. Completed sessions are evicted once their retention window passes.
//! Sessions still in progress are kept indefinitely.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::SessionError;
use crate::session::orchestrator::SessionOrchestrator;

pub type SharedSession = Arc<Mutex<SessionOrchestrator>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    seed_base: u64,
    issued: Arc<AtomicU64>,
    completed_ttl: Duration,
}

/// Retention for completed sessions when none is configured.
const DEFAULT_COMPLETED_TTL: Duration = Duration::from_secs(300);

impl SessionStore {
    /// With a base seed the n-th session is seeded with `base + n`, making
    /// question selection reproducible across restarts.
    pub fn new(seed: Option<u64>) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            seed_base: seed.unwrap_or_else(rand::random),
            issued: Arc::new(AtomicU64::new(0)),
            completed_ttl: DEFAULT_COMPLETED_TTL,
        }
    }

    pub fn with_completed_ttl(mut self, ttl: Duration) -> Self {
        self.completed_ttl = ttl;
        self
    }

    pub fn next_seed(&self) -> u64 {
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        self.seed_base.wrapping_add(n)
    }

    pub async fn insert(&self, session: SessionOrchestrator) -> Uuid {
        let id = session.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every completed session older than the retention window and
    /// returns how many were evicted. Busy sessions are skipped.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let ttl = self.completed_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, shared| {
            let Ok(session) = shared.try_lock() else {
                return true;
            };
            match session.completed_for(now) {
                Some(age) if age >= ttl => {
                    info!(session_id = %id, "Completed session evicted");
                    false
                }
                _ => true,
            }
        });

        before - sessions.len()
    }

    /// Runs `sweep` every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.sweep().await;
                if evicted > 0 {
                    let remaining = store.len().await;
                    debug!(evicted, remaining, "Session sweep finished");
                }
            }
        })
    }
}

/// Exclusive access without queueing: a session that is busy analyzing an
/// answer rejects the caller instead of making it wait.
pub fn try_acquire(
    session: &SharedSession,
) -> Result<OwnedMutexGuard<SessionOrchestrator>, SessionError> {
    Arc::clone(session)
        .try_lock_owned()
        .map_err(|_| SessionError::AnalysisInProgress)
}
