use async_trait::async_trait;

use crate::error::Result;

/// Durable storage for one serialized chat collection
///
/// Implementations store an opaque blob and know nothing about its contents.
/// A successful `save` must survive a process restart.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Read the stored blob, `None` if nothing was ever saved
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored blob
    async fn save(&self, blob: String) -> Result<()>;

    /// Short human-readable description used in logs
    fn describe(&self) -> String;
}
