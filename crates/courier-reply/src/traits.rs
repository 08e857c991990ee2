use anyhow::Result;
use async_trait::async_trait;

/// Produces the text of an automated reply
///
/// Implementations may take arbitrarily long and may fail. They must not touch chat state;
/// the engine appends whatever they return.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Reply to `input`, which is never blank
    async fn generate(&self, input: &str) -> Result<String>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "reply-generator"
    }
}
