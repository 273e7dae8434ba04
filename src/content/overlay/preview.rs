use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The one-line definition shown in the hover overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickDefinition {
    pub meaning: String,
    pub phonetic: Option<String>,
    pub part_of_speech: Option<String>,
}

/// Best-effort preview lookup. `Ok(None)` means the word is unknown.
///
/// Callers cancel by dropping the future; implementations must not rely on
/// running to completion.
#[async_trait]
pub trait PreviewSource: Send + Sync {
    async fn quick_definition(&self, word: &str) -> Result<Option<QuickDefinition>>;
}
