//! Life Engine Services
//!
//! The availability gate, prompt assembly, generation policy,
//! post-processing, proactive messaging and the turn engine that ties them
//! together.

pub mod availability;
pub mod generation;
pub mod postprocess;
pub mod proactive;
pub mod prompt;
mod turn_engine;

pub use availability::{AvailabilityGate, GateInput, GateOutcome};
pub use postprocess::PostProcessor;
pub use prompt::{PromptAssembler, PromptBudgets};
pub use turn_engine::{TurnEngine, TurnOutcome};
