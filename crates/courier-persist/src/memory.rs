use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{PersistError, Result};
use crate::gateway::PersistenceGateway;

/// In-process slot, mainly for tests and ephemeral sessions
///
/// Loads and saves can be made to fail or to take a fixed amount of time, which lets
/// callers exercise their failure and interleaving paths.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    slot: Mutex<Option<String>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    save_delay: Option<Duration>,
    ack_delay: Option<Duration>,
    saves: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved blob
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(blob.into())),
            ..Self::default()
        }
    }

    /// Sleep this long inside every save
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Sleep this long after the blob is stored, before the save returns
    pub fn with_ack_delay(mut self, delay: Duration) -> Self {
        self.ack_delay = Some(delay);
        self
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Currently stored blob
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn load(&self) -> Result<Option<String>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PersistError::Unavailable("memory slot is offline".to_string()));
        }
        Ok(self.contents())
    }

    async fn save(&self, blob: String) -> Result<()> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistError::Unavailable("memory slot is read-only".to_string()));
        }
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob);
        self.saves.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.ack_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_slot_loads_none() {
        let gateway = MemoryGateway::new();
        assert!(gateway.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let gateway = MemoryGateway::new();
        gateway.save("blob".to_string()).await.unwrap();

        assert_eq!(gateway.load().await.unwrap().as_deref(), Some("blob"));
        assert_eq!(gateway.save_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_blob() {
        let gateway = MemoryGateway::with_blob("old");
        gateway.set_fail_saves(true);

        assert!(gateway.save("new".to_string()).await.is_err());
        assert_eq!(gateway.contents().as_deref(), Some("old"));
        assert_eq!(gateway.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_load() {
        let gateway = MemoryGateway::with_blob("old");
        gateway.set_fail_loads(true);
        assert!(matches!(gateway.load().await, Err(PersistError::Unavailable(_))));
    }
}
