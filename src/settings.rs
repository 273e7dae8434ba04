use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Key that must be held for a click to become a speech request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Alt,
    Ctrl,
    Shift,
    Meta,
}

impl Default for Modifier {
    fn default() -> Self {
        Modifier::Alt
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlaySettings {
    pub width: f64,
    pub margin: f64,
    /// Used until the surface reports a measured height.
    pub fallback_height: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            width: 280.0,
            margin: 8.0,
            fallback_height: 80.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechSettings {
    pub locale: String,
    pub preferred_voice: String,
    pub preferred_engine: String,
    pub rate: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            preferred_voice: "Google US English".into(),
            preferred_engine: "Google".into(),
            rate: 1.0,
        }
    }
}

impl SpeechSettings {
    /// `en` for `en-US`.
    pub fn language_prefix(&self) -> &str {
        self.locale
            .split(['-', '_'])
            .next()
            .unwrap_or(self.locale.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionSettings {
    pub hover_delay_ms: u64,
    /// Heuristic guess at panel mount time; not a readiness guarantee.
    pub broadcast_delay_ms: u64,
    pub sentence_limit: usize,
    pub modifier: Modifier,
    pub overlay: OverlaySettings,
    pub speech: SpeechSettings,
    pub dictionary_url: String,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            hover_delay_ms: 100,
            broadcast_delay_ms: 500,
            sentence_limit: 200,
            modifier: Modifier::default(),
            overlay: OverlaySettings::default(),
            speech: SpeechSettings::default(),
            dictionary_url: DEFAULT_DICTIONARY_URL.into(),
        }
    }
}

impl ExtensionSettings {
    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_delay_ms)
    }

    pub fn broadcast_delay(&self) -> Duration {
        Duration::from_millis(self.broadcast_delay_ms)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ExtensionSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring malformed settings at {}: {err}; using defaults",
                    path.display()
                );
                ExtensionSettings::default()
            })
        } else {
            ExtensionSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> ExtensionSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: ExtensionSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &ExtensionSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
