//! Logging utilities

use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logger wrapper for namespaced logging
#[derive(Clone)]
pub struct Logger {
    namespace: String,
}

impl Logger {
    /// Create a new logger with a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Log an info message
    pub fn info(&self, message: &str) {
        info!("[{}] {}", self.namespace, message);
    }

    /// Log a debug message
    pub fn debug(&self, message: &str) {
        debug!("[{}] {}", self.namespace, message);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.namespace, message);
    }

    /// Log an error message
    pub fn error(&self, message: &str) {
        error!("[{}] {}", self.namespace, message);
    }

    /// Log a success message (info level with prefix)
    pub fn success(&self, message: &str) {
        info!("[{}] ✓ {}", self.namespace, message);
    }
}

/// Initialize the global logging system.
///
/// `RUST_LOG` wins over `SAKHI_LOG_LEVEL`; logs go to stderr so they never
/// interleave with the chat on stdout. Calling it twice is harmless.
pub fn init_logging() {
    let level = std::env::var("SAKHI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
