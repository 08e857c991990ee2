// Configuration layer for choosing a reply generator at startup

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::canned::CannedReplyGenerator;
use crate::echo::EchoReplyGenerator;
use crate::traits::ReplyGenerator;

/// Which generator to build, and its settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeneratorConfig {
    Canned {
        #[serde(default)]
        delay_ms: u64,
        /// Empty means the built-in list
        #[serde(default)]
        responses: Vec<String>,
    },
    Echo {
        #[serde(default)]
        prefix: String,
    },
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig::Canned {
            delay_ms: 1500,
            responses: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn canned(delay: Duration) -> Self {
        GeneratorConfig::Canned {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            responses: Vec::new(),
        }
    }

    pub fn echo(prefix: impl Into<String>) -> Self {
        GeneratorConfig::Echo { prefix: prefix.into() }
    }
}

/// Factory for creating reply generators from configuration
pub struct GeneratorFactory;

impl GeneratorFactory {
    pub fn create(config: GeneratorConfig) -> Arc<dyn ReplyGenerator> {
        match config {
            GeneratorConfig::Canned { delay_ms, responses } => {
                let generator = if responses.is_empty() {
                    CannedReplyGenerator::default()
                } else {
                    CannedReplyGenerator::new(responses)
                };
                Arc::new(generator.with_delay(Duration::from_millis(delay_ms)))
            }
            GeneratorConfig::Echo { prefix } => Arc::new(EchoReplyGenerator::new().with_prefix(prefix)),
        }
    }
}
