//! The cross-context cold-start handoff.
//!
//! A single durable slot holds the most recent unconsumed LOOKUP payload.
//! Writers overwrite (last-write-wins); the panel reads and clears it once
//! on startup. It is a handoff, not a queue.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::LookupPayload;

pub mod file;
pub mod memory;

pub use file::JsonFileSlot;
pub use memory::MemorySlot;

/// Fixed storage key of the slot.
pub const PENDING_LOOKUP_KEY: &str = "pendingLookup";

#[async_trait]
pub trait PendingSlot: Send + Sync {
    async fn get_pending(&self) -> Result<Option<LookupPayload>>;
    async fn set_pending(&self, payload: &LookupPayload) -> Result<()>;
    async fn clear_pending(&self) -> Result<()>;

    /// Read-then-clear. A second call returns `None` until the next write.
    async fn take_pending(&self) -> Result<Option<LookupPayload>> {
        let pending = self.get_pending().await?;
        if pending.is_some() {
            self.clear_pending().await?;
        }
        Ok(pending)
    }
}
