use super::preview::QuickDefinition;

/// Lifecycle of the single per-page overlay, keyed by word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    /// Anchored and drawn with a loading body; fetch not yet dispatched.
    Pending(String),
    Loading(String),
    Shown(String, QuickDefinition),
    Failed(String),
}

impl TooltipState {
    pub fn word(&self) -> Option<&str> {
        match self {
            TooltipState::Hidden => None,
            TooltipState::Pending(word)
            | TooltipState::Loading(word)
            | TooltipState::Shown(word, _)
            | TooltipState::Failed(word) => Some(word),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, TooltipState::Hidden)
    }

    /// True while the preview for `word` is still waiting on its fetch.
    pub fn awaits(&self, word: &str) -> bool {
        matches!(self, TooltipState::Pending(w) | TooltipState::Loading(w) if w == word)
    }
}
