//! Life Engine Evaluators
//!
//! Classify each inbound message and move the persona's mood and intimacy.

mod emotion_evaluator;
mod mood_evaluator;

pub use emotion_evaluator::*;
pub use mood_evaluator::*;
