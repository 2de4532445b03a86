// Response evaluation engine.
// Implements: relevance gate, STAR and quality scorers, body-language channel,
// aggregation, feedback and suggestions. Rule data lives in `rules`.

pub mod aggregate;
pub mod body_language;
pub mod engine;
pub mod feedback;
pub mod handlers;
pub mod quality;
pub mod relevance;
pub mod rules;
pub mod star;

pub use engine::{Evaluation, EvaluationError, ResponseEvaluationEngine, ResponseEvaluator};
