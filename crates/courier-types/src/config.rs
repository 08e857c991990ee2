use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on a single reply generation before it counts as failed
    pub reply_timeout: Duration,
    /// Start from the seed chats when storage cannot be read
    pub fallback_to_seed: bool,
    /// Buffer size of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reply_timeout: Duration::from_secs(30),
            fallback_to_seed: true,
            event_capacity: 256,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    pub fn with_seed_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_seed = enabled;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}
