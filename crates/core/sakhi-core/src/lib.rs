//! Sakhi Core
//!
//! Shared building blocks for the Sakhi companion chat engine:
//!
//! - Domain types: user profiles, personality state, conversation turns and
//!   availability windows
//! - The [`TextGenerator`] and [`CompanionStore`] seams for the hosted
//!   generation and persistence backends, plus an [`InMemoryStore`]
//! - Injectable [`Clock`] and [`RandomSource`] so every time- or
//!   chance-dependent decision can be replayed in tests
//! - Environment configuration, logging, prompt templating and retry helpers
//!
//! # Example
//!
//! ```no_run
//! use sakhi_core::*;
//!
//! fn main() -> Result<()> {
//!     load_env().ok();
//!     init_logging();
//!     // Missing credentials stop the application here.
//!     let config = SakhiConfig::from_env()?;
//!     tracing::info!(model = %config.gemini_model, "configuration loaded");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod config;
pub mod error;
pub mod memory_store;
pub mod random;
pub mod resilience;
pub mod templates;
pub mod testing;
pub mod types;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    get_env_bool, get_env_float, get_env_int, get_env_or, get_required_env, load_env,
    load_env_from_path, validate_env, Credentials, EngineConfig, SakhiConfig,
};
pub use error::{Result, SakhiError};
pub use memory_store::InMemoryStore;
pub use random::{pick, RandomSource, ScriptedRandom, StdRandom};
pub use resilience::{retry_with_backoff, RetryConfig};
pub use templates::TemplateEngine;
pub use types::*;
pub use utils::{init_logging, Logger};
