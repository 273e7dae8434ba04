use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::settings::SpeechSettings;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub voice_name: Option<String>,
    pub lang: Option<String>,
}

impl Voice {
    pub fn new(voice_name: &str, lang: &str) -> Self {
        Self {
            voice_name: Some(voice_name.to_string()),
            lang: Some(lang.to_string()),
        }
    }

    fn lang_is(&self, locale: &str) -> bool {
        self.lang.as_deref() == Some(locale)
    }

    fn name_contains(&self, needle: &str) -> bool {
        self.voice_name
            .as_deref()
            .is_some_and(|name| name.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakOptions {
    pub rate: f32,
    pub lang: String,
    pub voice_name: Option<String>,
}

#[async_trait]
pub trait VoiceCatalog: Send + Sync {
    async fn list(&self) -> Result<Vec<Voice>>;
}

pub trait SpeechEngine: Send + Sync {
    fn speak(&self, text: &str, options: &SpeakOptions) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTier {
    PreferredVoice,
    PreferredEngine,
    Locale,
    SystemDefault,
}

/// First satisfied tier wins: the named voice in the target locale, then the
/// preferred engine in the same language, then any voice in the locale.
pub fn choose_voice<'a>(voices: &'a [Voice], settings: &SpeechSettings) -> (VoiceTier, Option<&'a Voice>) {
    let locale = settings.locale.as_str();
    let prefix = settings.language_prefix();

    if let Some(voice) = voices
        .iter()
        .find(|v| v.lang_is(locale) && v.name_contains(&settings.preferred_voice))
    {
        return (VoiceTier::PreferredVoice, Some(voice));
    }

    if let Some(voice) = voices.iter().find(|v| {
        v.lang.as_deref().is_some_and(|lang| lang.starts_with(prefix))
            && v.name_contains(&settings.preferred_engine)
    }) {
        return (VoiceTier::PreferredEngine, Some(voice));
    }

    if let Some(voice) = voices.iter().find(|v| v.lang_is(locale)) {
        return (VoiceTier::Locale, Some(voice));
    }

    (VoiceTier::SystemDefault, None)
}

pub struct SpeechDispatcher {
    catalog: Arc<dyn VoiceCatalog>,
    engine: Arc<dyn SpeechEngine>,
    settings: SpeechSettings,
}

impl SpeechDispatcher {
    pub fn new(
        catalog: Arc<dyn VoiceCatalog>,
        engine: Arc<dyn SpeechEngine>,
        settings: SpeechSettings,
    ) -> Self {
        Self {
            catalog,
            engine,
            settings,
        }
    }

    pub async fn speak(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let voices = match self.catalog.list().await {
            Ok(voices) => voices,
            Err(err) => {
                log_warn!("voice list unavailable, using system default: {err:#}");
                Vec::new()
            }
        };
        let (tier, voice) = choose_voice(&voices, &self.settings);
        log_debug!("speaking with {:?} voice {:?}", tier, voice);

        let options = SpeakOptions {
            rate: self.settings.rate,
            lang: self.settings.locale.clone(),
            voice_name: voice.and_then(|v| v.voice_name.clone()),
        };
        self.engine.speak(text, &options)
    }
}
