//! Sakhi Life Engine
//!
//! Gives the companion persona a life of her own around the language model.
//!
//! # Overview
//!
//! - **Context**: local time of day, a 28-day cycle phase, the season and
//!   nearby festivals, plus relationship facts from the stored profile.
//!
//! - **Evaluators**: keyword emotion and topic classification, name
//!   extraction, and a Markov-style mood walk with an intimacy ratchet.
//!   Distress always pulls the persona into the supportive mood.
//!
//! - **Availability**: now and then she is busy. A window opens with an
//!   excuse, every reply during it quotes the same excuse, and the first reply
//!   after it ends opens with a matching "I'm back" line.
//!
//! - **Generation**: one retry, then an in-character fallback line. Replies
//!   get the occasional typo or filler and never carry more emoji than
//!   configured.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use sakhi_core::{EngineConfig, InMemoryStore};
//! use sakhi_plugin_lifeengine::TurnEngine;
//! use std::sync::Arc;
//!
//! let engine = TurnEngine::new(EngineConfig::default(), Arc::new(InMemoryStore::new()), generator)?;
//! let outcome = engine.handle_turn("user-1", "heyy, kya kar rahi ho?").await?;
//! if let Some(reply) = outcome.reply {
//!     println!("{reply}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use sakhi_core::EngineConfig;

/// Core types for the Life Engine
pub mod types;
/// Context derivation
pub mod providers;
/// Message classification and mood transitions
pub mod evaluators;
/// Gate, prompt, generation, post-processing and the turn engine
pub mod services;

pub use evaluators::*;
pub use providers::*;
pub use services::*;
pub use types::*;

// ============================================================================
// ANSI Art Banner Rendering
// ============================================================================

/// Represents a configuration setting row for display
struct SettingRow {
    value: String,
    is_default: bool,
    env_var: &'static str,
}

/// Pad string to `w` visible chars, truncating if necessary
fn pad(s: &str, w: usize) -> String {
    let visible: String = s.chars().take(w).collect();
    let pad_len = w.saturating_sub(visible.chars().count());
    visible + &" ".repeat(pad_len)
}

fn setting_rows(config: &EngineConfig) -> Vec<SettingRow> {
    let defaults = EngineConfig::default();
    let row = |env_var, value: String, default: String| SettingRow {
        is_default: value == default,
        value,
        env_var,
    };
    vec![
        row(
            "SAKHI_PERSONA_NAME",
            config.persona_name.clone(),
            defaults.persona_name.clone(),
        ),
        row(
            "SAKHI_TZ_OFFSET_MINUTES",
            config.tz_offset_minutes.to_string(),
            defaults.tz_offset_minutes.to_string(),
        ),
        row(
            "SAKHI_HISTORY_WINDOW",
            config.history_window.to_string(),
            defaults.history_window.to_string(),
        ),
        row(
            "SAKHI_MAX_EMOJIS",
            config.max_emojis.to_string(),
            defaults.max_emojis.to_string(),
        ),
        row(
            "SAKHI_UNAVAILABILITY_SCALE",
            format!("{:.2}", config.unavailability_scale),
            format!("{:.2}", defaults.unavailability_scale),
        ),
        row(
            "SAKHI_PROACTIVE_IDLE_HOURS",
            config.proactive_idle_hours.to_string(),
            defaults.proactive_idle_hours.to_string(),
        ),
        row(
            "SAKHI_TYPING_DELAY",
            config.typing_delay.to_string(),
            defaults.typing_delay.to_string(),
        ),
    ]
}

/// Render the Life Engine banner with the effective settings
pub fn render_lifeengine_banner(config: &EngineConfig) {
    let magenta = "\x1b[35m";
    let cyan = "\x1b[36m";
    let green = "\x1b[32m";
    let dim = "\x1b[2m";
    let bold = "\x1b[1m";
    let reset = "\x1b[0m";

    println!("{magenta}+{line}+{reset}", line = "=".repeat(60));
    println!(
        "{magenta}|{bold}{inner}{reset}{magenta}|{reset}",
        inner = pad("  SAKHI  -  mood  *  context  *  availability  *  soul", 60)
    );
    println!("{magenta}+{line}+{reset}", line = "-".repeat(60));

    for row in setting_rows(config) {
        let (icon, status, color) = if row.is_default {
            (" ", "default", dim)
        } else {
            ("*", "custom", green)
        };
        println!(
            "{magenta}|{reset}{icon} {name}{cyan}{value}{reset}{color}{status}{reset}{magenta}|{reset}",
            name = pad(row.env_var, 30),
            value = pad(&row.value, 18),
            status = pad(status, 10),
        );
    }

    println!("{magenta}+{line}+{reset}", line = "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_counts_chars() {
        assert_eq!(pad("héllo", 7), "héllo  ");
        assert_eq!(pad("abcdef", 3), "abc");
    }

    #[test]
    fn test_setting_rows_flag_custom_values() {
        let config = EngineConfig {
            max_emojis: 3,
            ..EngineConfig::default()
        };
        let rows = setting_rows(&config);
        let emoji = rows
            .iter()
            .find(|r| r.env_var == "SAKHI_MAX_EMOJIS")
            .unwrap();
        assert!(!emoji.is_default);
        assert_eq!(emoji.value, "3");
        assert!(rows
            .iter()
            .filter(|r| r.env_var != "SAKHI_MAX_EMOJIS")
            .all(|r| r.is_default));
    }
}
