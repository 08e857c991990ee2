use anyhow::{anyhow, Result};
use courier_persist::PersistenceGateway;
use courier_reply::ReplyGenerator;
use courier_types::{ChatCollection, EngineConfig};
use std::sync::Arc;

use crate::engine::SyncEngine;

/// Builder for constructing a [`SyncEngine`]
pub struct EngineBuilder {
    gateway: Option<Arc<dyn PersistenceGateway>>,
    generator: Option<Arc<dyn ReplyGenerator>>,
    config: EngineConfig,
    chats: Option<ChatCollection>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            gateway: None,
            generator: None,
            config: EngineConfig::default(),
            chats: None,
        }
    }

    /// Set the storage every commit is saved to
    pub fn gateway(mut self, gateway: Arc<dyn PersistenceGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the generator used for automated chats
    pub fn generator(mut self, generator: Arc<dyn ReplyGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from this collection instead of loading from the gateway
    pub fn initial_chats(mut self, chats: ChatCollection) -> Self {
        self.chats = Some(chats);
        self
    }

    pub async fn build(self) -> Result<SyncEngine> {
        let gateway = self.gateway.ok_or_else(|| anyhow!("Persistence gateway is required"))?;
        let generator = self.generator.ok_or_else(|| anyhow!("Reply generator is required"))?;

        match self.chats {
            Some(chats) => Ok(SyncEngine::new(chats, gateway, generator, self.config)),
            None => Ok(SyncEngine::open(gateway, generator, self.config).await?),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
