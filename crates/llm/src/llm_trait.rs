use async_trait::async_trait;
use studycards_common::Result;

/// Text-generation service seam.
///
/// One call to [`GenerationBackend::complete`] is one outbound request; the
/// returned string is the raw payload, before any parsing.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send a prompt and return the raw text reply
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Whether a credential is available for this backend
    fn is_configured(&self) -> bool;
}
