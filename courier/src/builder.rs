//! High-level builder API for creating an engine

use anyhow::Result;
use courier_engine::SyncEngine;
use courier_persist::{FileGateway, MemoryGateway, PersistenceGateway};
use courier_reply::{GeneratorConfig, GeneratorFactory};
use courier_types::EngineConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

enum Storage {
    Memory,
    File(PathBuf),
    #[cfg(feature = "mongodb")]
    MongoDb {
        uri: String,
        database: String,
    },
}

/// High-level builder for creating a [`SyncEngine`]
///
/// Defaults to in-memory storage and canned replies.
///
/// # Example
///
/// ```rust,no_run
/// use courier::prelude::*;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// let engine = CourierBuilder::new()
///     .file("data/chats.json")
///     .canned_replies(Duration::from_millis(800))
///     .reply_timeout(Duration::from_secs(10))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct CourierBuilder {
    storage: Storage,
    replies: GeneratorConfig,
    engine_config: EngineConfig,
}

impl Default for CourierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CourierBuilder {
    pub fn new() -> Self {
        Self {
            storage: Storage::Memory,
            replies: GeneratorConfig::default(),
            engine_config: EngineConfig::default(),
        }
    }

    /// Keep chats in memory only
    pub fn memory(mut self) -> Self {
        self.storage = Storage::Memory;
        self
    }

    /// Persist chats to a JSON file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage = Storage::File(path.into());
        self
    }

    /// Persist chats to MongoDB
    #[cfg(feature = "mongodb")]
    pub fn mongodb(mut self, uri: impl Into<String>, database: impl Into<String>) -> Self {
        self.storage = Storage::MongoDb {
            uri: uri.into(),
            database: database.into(),
        };
        self
    }

    /// Rotate through the built-in responses after `delay`
    pub fn canned_replies(mut self, delay: Duration) -> Self {
        self.replies = GeneratorConfig::canned(delay);
        self
    }

    /// Reply with whatever was sent
    pub fn echo_replies(mut self) -> Self {
        self.replies = GeneratorConfig::echo("");
        self
    }

    pub fn reply_timeout(mut self, timeout: Duration) -> Self {
        self.engine_config = self.engine_config.with_reply_timeout(timeout);
        self
    }

    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    /// Connect storage, load the chats and start the engine
    pub async fn build(self) -> Result<SyncEngine> {
        let gateway: Arc<dyn PersistenceGateway> = match self.storage {
            Storage::Memory => Arc::new(MemoryGateway::new()),
            Storage::File(path) => Arc::new(FileGateway::new(path)),
            #[cfg(feature = "mongodb")]
            Storage::MongoDb { uri, database } => {
                Arc::new(courier_persist::MongoGateway::connect(&uri, &database, "default").await?)
            }
        };

        SyncEngine::builder()
            .gateway(gateway)
            .generator(GeneratorFactory::create(self.replies))
            .config(self.engine_config)
            .build()
            .await
    }
}
