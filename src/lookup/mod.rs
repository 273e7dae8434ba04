//! Lookup capability consumed by the panel, and the dictionary HTTP client.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod dictionary_api;

pub use dictionary_api::FreeDictionaryClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub meaning: String,
    pub example: Option<String>,
    pub part_of_speech: String,
}

/// What a lookup returns to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub id: String,
    pub text: String,
    pub phonetic: Option<String>,
    pub audio_url: Option<String>,
    pub senses: Vec<Sense>,
}

/// One lookup backend, chosen once at startup.
///
/// `context_sentence` is the sentence around the word on the page; sources
/// that do not use context ignore it.
#[async_trait]
pub trait LookupService: Send + Sync {
    async fn lookup(&self, word: &str, context_sentence: Option<&str>) -> Result<Option<Definition>>;
}
