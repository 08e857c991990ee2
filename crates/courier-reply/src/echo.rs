use anyhow::Result;
use async_trait::async_trait;

use crate::traits::ReplyGenerator;

/// Replies with the input, optionally prefixed
#[derive(Debug, Clone, Default)]
pub struct EchoReplyGenerator {
    prefix: String,
}

impl EchoReplyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[async_trait]
impl ReplyGenerator for EchoReplyGenerator {
    async fn generate(&self, input: &str) -> Result<String> {
        Ok(format!("{}{}", self.prefix, input))
    }

    fn name(&self) -> &str {
        "echo"
    }
}
