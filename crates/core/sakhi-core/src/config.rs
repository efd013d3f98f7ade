//! Configuration management and environment variable loading

use crate::{Result, SakhiError};
use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::path::{Path, PathBuf};

/// Env var holding the Gemini API key
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Env var holding the Supabase project URL
pub const SUPABASE_URL: &str = "SUPABASE_URL";
/// Env var holding the Supabase anon/service key
pub const SUPABASE_KEY: &str = "SUPABASE_KEY";

/// Credentials that must be present before any turn is processed
pub const REQUIRED_VARS: [&str; 3] = [GEMINI_API_KEY, SUPABASE_URL, SUPABASE_KEY];

/// Load environment variables from .env file
///
/// Loads variables from a .env file in the current directory or a parent
/// directory and returns its path. A missing file is `Ok(None)`.
///
/// Nothing is logged here; this usually runs before logging is set up.
///
/// # Example
///
/// ```no_run
/// use sakhi_core::load_env;
///
/// load_env().ok();
/// let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
/// ```
pub fn load_env() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(dotenvy::Error::LineParse(line, pos)) => Err(SakhiError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => Ok(None),
        Err(e) => Err(SakhiError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(_) => {
            tracing::info!("Loaded environment from: {}", path.as_ref().display());
            Ok(())
        }
        Err(e) => Err(SakhiError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

/// Get required environment variable
///
/// Returns an error if the variable is not set or empty
pub fn get_required_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SakhiError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))),
    }
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Get environment variable as float
pub fn get_env_float(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

/// Validate that required environment variables are set
pub fn validate_env(required_vars: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required_vars
        .iter()
        .copied()
        .filter(|var| env::var(var).map(|v| v.trim().is_empty()).unwrap_or(true))
        .collect();

    if !missing.is_empty() {
        return Err(SakhiError::config(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Backend credentials
#[derive(Clone)]
pub struct Credentials {
    /// Gemini API key
    pub gemini_api_key: String,
    /// Supabase project URL
    pub supabase_url: String,
    /// Supabase API key
    pub supabase_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &"<redacted>")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the environment
    pub fn from_env() -> Result<Self> {
        validate_env(&REQUIRED_VARS)?;
        Ok(Self {
            gemini_api_key: get_required_env(GEMINI_API_KEY)?,
            supabase_url: get_required_env(SUPABASE_URL)?
                .trim_end_matches('/')
                .to_string(),
            supabase_key: get_required_env(SUPABASE_KEY)?,
        })
    }
}

/// Behavioural knobs of the turn engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Persona display name
    pub persona_name: String,
    /// Fixed timezone offset in minutes east of UTC
    pub tz_offset_minutes: i32,
    /// Number of recent turns included in the prompt
    pub history_window: usize,
    /// Character budget for the history block
    pub history_char_budget: usize,
    /// Character budget for the current user message
    pub message_char_budget: usize,
    /// Maximum emoji code points per reply
    pub max_emojis: usize,
    /// Multiplier applied to the unavailability policy table
    pub unavailability_scale: f64,
    /// Idle hours before a proactive message is considered
    pub proactive_idle_hours: i64,
    /// Simulated typing pause in the terminal adaptor
    pub typing_delay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persona_name: "Riya".to_string(),
            tz_offset_minutes: 330,
            history_window: 10,
            history_char_budget: 6000,
            message_char_budget: 1000,
            max_emojis: 1,
            unavailability_scale: 1.0,
            proactive_idle_hours: 6,
            typing_delay: true,
        }
    }
}

impl EngineConfig {
    /// Read engine settings from `SAKHI_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            persona_name: get_env_or("SAKHI_PERSONA_NAME", &defaults.persona_name),
            tz_offset_minutes: get_env_int("SAKHI_TZ_OFFSET_MINUTES", defaults.tz_offset_minutes),
            history_window: get_env_int("SAKHI_HISTORY_WINDOW", defaults.history_window),
            history_char_budget: get_env_int(
                "SAKHI_HISTORY_CHAR_BUDGET",
                defaults.history_char_budget,
            ),
            message_char_budget: get_env_int(
                "SAKHI_MESSAGE_CHAR_BUDGET",
                defaults.message_char_budget,
            ),
            max_emojis: get_env_int("SAKHI_MAX_EMOJIS", defaults.max_emojis),
            unavailability_scale: get_env_float(
                "SAKHI_UNAVAILABILITY_SCALE",
                defaults.unavailability_scale,
            ),
            proactive_idle_hours: get_env_int(
                "SAKHI_PROACTIVE_IDLE_HOURS",
                defaults.proactive_idle_hours,
            ),
            typing_delay: get_env_bool("SAKHI_TYPING_DELAY", defaults.typing_delay),
        };
        config.validate()?;
        Ok(config)
    }

    fn offset(&self) -> Option<FixedOffset> {
        self.tz_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }

    /// Check ranges that would otherwise misbehave silently
    pub fn validate(&self) -> Result<()> {
        if self.offset().is_none() {
            return Err(SakhiError::config(format!(
                "SAKHI_TZ_OFFSET_MINUTES out of range: {}",
                self.tz_offset_minutes
            )));
        }
        if self.unavailability_scale < 0.0 {
            return Err(SakhiError::config(
                "SAKHI_UNAVAILABILITY_SCALE must not be negative",
            ));
        }
        if self.persona_name.trim().is_empty() {
            return Err(SakhiError::config("SAKHI_PERSONA_NAME must not be empty"));
        }
        Ok(())
    }

    /// The configured fixed timezone
    pub fn timezone(&self) -> FixedOffset {
        self.offset().unwrap_or_else(|| Utc.fix())
    }
}

/// Full application configuration
#[derive(Debug, Clone)]
pub struct SakhiConfig {
    /// Backend credentials
    pub credentials: Credentials,
    /// Gemini model name
    pub gemini_model: String,
    /// Engine behaviour
    pub engine: EngineConfig,
}

impl SakhiConfig {
    /// Default Gemini model
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-pro-latest";

    /// Build the configuration from the environment.
    ///
    /// Missing credentials are fatal.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            credentials: Credentials::from_env()?,
            gemini_model: get_env_or("GEMINI_MODEL", Self::DEFAULT_MODEL),
            engine: EngineConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_bool() {
        env::set_var("SAKHI_TEST_BOOL_TRUE", "true");
        env::set_var("SAKHI_TEST_BOOL_0", "0");

        assert!(get_env_bool("SAKHI_TEST_BOOL_TRUE", false));
        assert!(!get_env_bool("SAKHI_TEST_BOOL_0", true));
        assert!(get_env_bool("SAKHI_TEST_NONEXISTENT", true));

        env::remove_var("SAKHI_TEST_BOOL_TRUE");
        env::remove_var("SAKHI_TEST_BOOL_0");
    }

    #[test]
    fn test_get_env_int_and_float() {
        env::set_var("SAKHI_TEST_INT", "42");
        env::set_var("SAKHI_TEST_FLOAT", "0.5");
        assert_eq!(get_env_int("SAKHI_TEST_INT", 0), 42);
        assert_eq!(get_env_int("SAKHI_TEST_NONEXISTENT_INT", 99), 99);
        assert_eq!(get_env_float("SAKHI_TEST_FLOAT", 0.0), 0.5);
        env::remove_var("SAKHI_TEST_INT");
        env::remove_var("SAKHI_TEST_FLOAT");
    }

    #[test]
    fn test_validate_env_reports_missing() {
        env::set_var("SAKHI_TEST_PRESENT", "x");
        let err = validate_env(&["SAKHI_TEST_PRESENT", "SAKHI_TEST_ABSENT"]).unwrap_err();
        assert!(err.to_string().contains("SAKHI_TEST_ABSENT"));
        assert!(!err.to_string().contains("SAKHI_TEST_PRESENT,"));
        env::remove_var("SAKHI_TEST_PRESENT");
    }

    #[test]
    fn test_required_env_rejects_blank() {
        env::set_var("SAKHI_TEST_BLANK", "   ");
        assert!(get_required_env("SAKHI_TEST_BLANK").is_err());
        env::remove_var("SAKHI_TEST_BLANK");
    }

    #[test]
    fn test_engine_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timezone().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn test_engine_rejects_bad_offset() {
        let config = EngineConfig {
            tz_offset_minutes: 24 * 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_offset_is_rejected_not_overflowed() {
        let config = EngineConfig {
            tz_offset_minutes: i32::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.timezone().local_minus_utc(), 0);
    }

    #[test]
    fn test_load_env_from_path() {
        let path = env::temp_dir().join(format!("sakhi-{}.env", std::process::id()));
        std::fs::write(&path, "SAKHI_TEST_FROM_FILE=loaded\n").unwrap();

        load_env_from_path(&path).unwrap();
        assert_eq!(env::var("SAKHI_TEST_FROM_FILE").unwrap(), "loaded");

        env::remove_var("SAKHI_TEST_FROM_FILE");
        std::fs::remove_file(&path).unwrap();
        assert!(load_env_from_path(&path).is_err());
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let creds = Credentials {
            gemini_api_key: "secret-gemini".into(),
            supabase_url: "https://x.supabase.co".into(),
            supabase_key: "secret-supabase".into(),
        };
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("https://x.supabase.co"));
    }
}
