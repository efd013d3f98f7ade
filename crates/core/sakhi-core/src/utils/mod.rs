//! Utility functions

pub mod logger;
pub mod text;

pub use logger::{init_logging, Logger};
pub use text::{capitalize, clip_chars, clip_tail_chars};
