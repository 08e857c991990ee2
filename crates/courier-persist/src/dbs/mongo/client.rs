use async_trait::async_trait;
use mongodb::{bson::doc, Client, Collection};
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::gateway::PersistenceGateway;

/// MongoDB document holding one serialized collection
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSlot {
    #[serde(rename = "_id")]
    slot: String,
    blob: String,
    updated_at: bson::DateTime,
}

/// Slot stored as a single document in a `snapshots` collection
#[derive(Clone)]
pub struct MongoGateway {
    collection: Collection<StoredSlot>,
    slot: String,
}

impl MongoGateway {
    /// Connect to MongoDB and bind to the document named `slot`
    pub async fn connect(mongodb_uri: &str, database: &str, slot: impl Into<String>) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Unavailable(e.to_string()))?;

        let collection = client.database(database).collection("snapshots");
        Ok(Self {
            collection,
            slot: slot.into(),
        })
    }
}

#[async_trait]
impl PersistenceGateway for MongoGateway {
    async fn load(&self) -> Result<Option<String>> {
        let filter = doc! { "_id": &self.slot };
        let stored = self.collection.find_one(filter).await?;
        Ok(stored.map(|s| s.blob))
    }

    async fn save(&self, blob: String) -> Result<()> {
        let filter = doc! { "_id": &self.slot };
        let stored = StoredSlot {
            slot: self.slot.clone(),
            blob,
            updated_at: bson::DateTime::now(),
        };

        self.collection
            .replace_one(filter, &stored)
            .upsert(true)
            .await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("mongodb:{}", self.slot)
    }
}
