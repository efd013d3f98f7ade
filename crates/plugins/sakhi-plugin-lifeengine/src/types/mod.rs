//! Core types for the Life Engine
//!
//! - Persona: who the companion is
//! - ContextBundle: time, cycle, season and calendar facts for one turn
//! - Excuse table: why the persona is unavailable and how she comes back

mod context;
pub mod excuse;
mod persona;

pub use context::*;
pub use excuse::{Excuse, EXCUSES};
pub use persona::*;
