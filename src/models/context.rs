use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const SENTENCE_ELLIPSIS: &str = "...";

/// Where and around what a lookup was triggered. Attached to every LOOKUP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LookupContext {
    pub sentence: String,
    pub url: String,
    pub title: String,
    /// RFC 3339 / ISO-8601 timestamp of the triggering gesture.
    pub date: String,
}

impl LookupContext {
    pub fn new(sentence: String, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            sentence,
            url: url.into(),
            title: title.into(),
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Context for gestures that only know the selected text.
    pub fn from_selection(selection: &str, url: Option<&str>, title: Option<&str>) -> Self {
        Self::new(
            selection.to_string(),
            url.unwrap_or_default(),
            title.unwrap_or_default(),
        )
    }
}

/// Trims `text` and cuts it to `limit` characters, appending an ellipsis when cut.
pub fn truncate_sentence(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &trimmed[..byte_idx], SENTENCE_ELLIPSIS),
        None => trimmed.to_string(),
    }
}
