// Interview sessions.
// Implements: the per-session state machine, voice transcript capture and the
// live session registry. Grading is delegated to `grading`.

pub mod handlers;
pub mod orchestrator;
pub mod store;
pub mod transcript;

pub use orchestrator::{SessionEntry, SessionPhase, SessionResult};
pub use store::SessionStore;
