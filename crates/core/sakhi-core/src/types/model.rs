//! Generation backend seam

use crate::Result;
use async_trait::async_trait;

/// A hosted text-generation backend.
///
/// One opaque prompt in, one completion out. Implementations report failures
/// as errors; the turn engine owns the retry and fallback policy.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name, used in logs
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;
}
