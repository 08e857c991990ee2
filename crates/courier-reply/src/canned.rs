use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::traits::ReplyGenerator;

pub const DEFAULT_RESPONSES: &[&str] = &[
    "That's a great question! Let me think about it...",
    "I understand what you're saying. Here's my take on it.",
    "Thanks for sharing! I'd suggest breaking it down into smaller steps.",
    "Interesting! Could you tell me a bit more about that?",
    "Got it. I'll keep that in mind for our next conversation.",
];

/// Cycles through a fixed list of responses after a fixed delay
#[derive(Debug)]
pub struct CannedReplyGenerator {
    responses: Vec<String>,
    delay: Duration,
    next: AtomicUsize,
}

impl CannedReplyGenerator {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            delay: Duration::ZERO,
            next: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for CannedReplyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect())
    }
}

#[async_trait]
impl ReplyGenerator for CannedReplyGenerator {
    async fn generate(&self, _input: &str) -> Result<String> {
        if self.responses.is_empty() {
            bail!("no canned responses configured");
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.responses.len();
        tracing::debug!("Canned reply #{} after {:?}", index, self.delay);
        Ok(self.responses[index].clone())
    }

    fn name(&self) -> &str {
        "canned"
    }
}
