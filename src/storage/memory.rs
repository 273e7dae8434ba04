use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::LookupPayload;

use super::PendingSlot;

/// Session-scoped slot: survives panel restarts, not coordinator restarts.
#[derive(Default)]
pub struct MemorySlot {
    value: Mutex<Option<LookupPayload>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingSlot for MemorySlot {
    async fn get_pending(&self) -> Result<Option<LookupPayload>> {
        Ok(self.value.lock().await.clone())
    }

    async fn set_pending(&self, payload: &LookupPayload) -> Result<()> {
        *self.value.lock().await = Some(payload.clone());
        Ok(())
    }

    async fn clear_pending(&self) -> Result<()> {
        self.value.lock().await.take();
        Ok(())
    }

    async fn take_pending(&self) -> Result<Option<LookupPayload>> {
        Ok(self.value.lock().await.take())
    }
}
