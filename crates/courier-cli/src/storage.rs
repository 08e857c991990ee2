use anyhow::Result;
use courier_persist::{FileGateway, MemoryGateway, PersistenceGateway};
use std::sync::Arc;

use crate::config::{Config, StorageBackend};

/// Build the gateway selected by `[storage]`
pub async fn build_gateway(config: &Config) -> Result<Arc<dyn PersistenceGateway>> {
    let gateway: Arc<dyn PersistenceGateway> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryGateway::new()),
        StorageBackend::File => Arc::new(FileGateway::new(&config.storage.path)),
        #[cfg(feature = "mongodb")]
        StorageBackend::Mongodb => {
            tracing::info!("Connecting to MongoDB");
            let gateway = courier_persist::MongoGateway::connect(
                &config.mongodb_uri,
                &config.storage.mongodb.database,
                config.storage.mongodb.slot.as_str(),
            )
            .await?;
            tracing::info!("MongoDB connected");
            Arc::new(gateway)
        }
        #[cfg(not(feature = "mongodb"))]
        StorageBackend::Mongodb => {
            anyhow::bail!("the mongodb backend needs a build with `--features mongodb`")
        }
    };

    tracing::info!("Using storage {}", gateway.describe());
    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: &str) -> Config {
        toml::from_str(&format!(
            r#"
            [storage]
            backend = "{}"
            path = "/tmp/courier-test/chats.json"

            [engine]
            reply_timeout_ms = 1000
            fallback_to_seed = true
            event_capacity = 8

            [logging]
            level = "info"
            format = "pretty"
            "#,
            backend
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_builds_memory_and_file_gateways() {
        assert_eq!(build_gateway(&config("memory")).await.unwrap().describe(), "memory");
        assert_eq!(
            build_gateway(&config("file")).await.unwrap().describe(),
            "file:/tmp/courier-test/chats.json"
        );
    }

    #[cfg(not(feature = "mongodb"))]
    #[tokio::test]
    async fn test_mongodb_requires_feature() {
        assert!(build_gateway(&config("mongodb")).await.is_err());
    }
}
