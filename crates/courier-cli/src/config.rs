use config::{Config as ConfigLoader, ConfigError, Environment, File};
use courier_reply::GeneratorConfig;
use courier_types::EngineConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub engine: EngineSettings,
    #[serde(default)]
    pub replies: GeneratorConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Mongodb,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
}

fn default_path() -> String {
    "data/chats.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
    pub slot: String,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: "courier".to_string(),
            slot: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub reply_timeout_ms: u64,
    pub fallback_to_seed: bool,
    pub event_capacity: usize,
}

impl From<EngineSettings> for EngineConfig {
    fn from(settings: EngineSettings) -> Self {
        EngineConfig::new()
            .with_reply_timeout(Duration::from_millis(settings.reply_timeout_ms))
            .with_seed_fallback(settings.fallback_to_seed)
            .with_event_capacity(settings.event_capacity)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables, e.g. `COURIER_STORAGE__BACKEND=memory`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("COURIER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        if cfg.storage.backend == StorageBackend::Mongodb {
            cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
                ConfigError::Message("MONGODB_URI environment variable is required for the mongodb backend".to_string())
            })?;
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}
