use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::{fs, sync::Mutex};

use crate::models::LookupPayload;

use super::{PendingSlot, PENDING_LOOKUP_KEY};

/// Slot persisted as a JSON object on disk, keyed by [`PENDING_LOOKUP_KEY`].
///
/// Other keys in the file are preserved on write.
pub struct JsonFileSlot {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl JsonFileSlot {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<Map<String, Value>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read slot file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Malformed slot file {}", self.path.display()))
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, serialized)
            .await
            .with_context(|| format!("Failed to write slot file {}", self.path.display()))
    }

    fn decode(map: &mut Map<String, Value>, remove: bool) -> Result<Option<LookupPayload>> {
        let value = if remove {
            map.remove(PENDING_LOOKUP_KEY)
        } else {
            map.get(PENDING_LOOKUP_KEY).cloned()
        };
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .context("Malformed pending lookup payload"),
        }
    }
}

#[async_trait]
impl PendingSlot for JsonFileSlot {
    async fn get_pending(&self) -> Result<Option<LookupPayload>> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        Self::decode(&mut map, false)
    }

    async fn set_pending(&self, payload: &LookupPayload) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(PENDING_LOOKUP_KEY.to_string(), serde_json::to_value(payload)?);
        self.write_map(&map).await
    }

    async fn clear_pending(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(PENDING_LOOKUP_KEY).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }

    async fn take_pending(&self) -> Result<Option<LookupPayload>> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        let pending = Self::decode(&mut map, true)?;
        if pending.is_some() {
            self.write_map(&map).await?;
        }
        Ok(pending)
    }
}
