use serde::{Deserialize, Serialize};

use super::LookupContext;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LookupPayload {
    pub word: String,
    pub context: LookupContext,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TtsPayload {
    pub text: String,
}

/// The only wire format between the page script and the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum ExtensionMessage {
    #[serde(rename = "LOOKUP")]
    Lookup(LookupPayload),
    #[serde(rename = "TTS")]
    Tts(TtsPayload),
}

impl ExtensionMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtensionMessage::Lookup(_) => "LOOKUP",
            ExtensionMessage::Tts(_) => "TTS",
        }
    }
}

/// Coordinator to panel notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum PanelNotification {
    #[serde(rename = "VIEW_UPDATE")]
    ViewUpdate(LookupPayload),
}

/// Identity of the tab a message came from, as seen by the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderInfo {
    pub tab_id: Option<u32>,
    pub window_id: Option<u32>,
}

impl SenderInfo {
    pub fn tab(tab_id: u32, window_id: u32) -> Self {
        Self {
            tab_id: Some(tab_id),
            window_id: Some(window_id),
        }
    }
}
