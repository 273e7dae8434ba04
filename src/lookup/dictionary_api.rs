use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::content::overlay::{PreviewSource, QuickDefinition};

use super::{Definition, LookupService, Sense};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WordSense {
    pub definition: String,
    pub example: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<WordSense>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DictionaryEntry {
    pub word: String,
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

impl DictionaryEntry {
    fn phonetic_text(&self) -> Option<String> {
        self.phonetic
            .clone()
            .or_else(|| self.phonetics.iter().find_map(|p| p.text.clone()))
    }
}

/// First meaning of the first entry, for the hover overlay.
pub fn quick_definition(entries: &[DictionaryEntry]) -> Option<QuickDefinition> {
    let entry = entries.first()?;
    let meaning = entry.meanings.first()?;
    let sense = meaning.definitions.first()?;
    Some(QuickDefinition {
        meaning: sense.definition.clone(),
        phonetic: entry.phonetic_text(),
        part_of_speech: Some(meaning.part_of_speech.clone()),
    })
}

/// All senses of the first entry, flattened across parts of speech.
pub fn full_definition(entries: &[DictionaryEntry]) -> Option<Definition> {
    let entry = entries.first()?;
    let senses = entry
        .meanings
        .iter()
        .flat_map(|meaning| {
            meaning.definitions.iter().map(|sense| Sense {
                meaning: sense.definition.clone(),
                example: sense.example.clone(),
                part_of_speech: meaning.part_of_speech.clone(),
            })
        })
        .collect();

    Some(Definition {
        id: entry.word.clone(),
        text: entry.word.clone(),
        phonetic: entry.phonetics.iter().find_map(|p| p.text.clone()),
        audio_url: entry
            .phonetics
            .iter()
            .filter_map(|p| p.audio.clone())
            .find(|audio| !audio.is_empty()),
        senses,
    })
}

/// Client for the public Free Dictionary API.
#[derive(Clone)]
pub struct FreeDictionaryClient {
    http: reqwest::Client,
    base_url: String,
}

impl FreeDictionaryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build dictionary HTTP client")?;
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { http, base_url })
    }

    fn entry_url(&self, word: &str) -> String {
        format!("{}{}", self.base_url, urlencoding::encode(word))
    }

    /// `Ok(None)` when the dictionary has no entry for `word`.
    pub async fn fetch_entries(&self, word: &str) -> Result<Option<Vec<DictionaryEntry>>> {
        let response = self
            .http
            .get(self.entry_url(word))
            .send()
            .await
            .with_context(|| format!("dictionary request for '{word}' failed"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            bail!("dictionary API error: {}", response.status());
        }

        let entries = response
            .json::<Vec<DictionaryEntry>>()
            .await
            .context("malformed dictionary response")?;
        Ok(Some(entries))
    }
}

#[async_trait]
impl PreviewSource for FreeDictionaryClient {
    async fn quick_definition(&self, word: &str) -> Result<Option<QuickDefinition>> {
        Ok(self
            .fetch_entries(word)
            .await?
            .and_then(|entries| quick_definition(&entries)))
    }
}

#[async_trait]
impl LookupService for FreeDictionaryClient {
    async fn lookup(&self, word: &str, _context_sentence: Option<&str>) -> Result<Option<Definition>> {
        let clean = word.trim().to_lowercase();
        if clean.is_empty() {
            return Ok(None);
        }
        Ok(self
            .fetch_entries(&clean)
            .await?
            .and_then(|entries| full_definition(&entries)))
    }
}
