use crate::models::PointerSample;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    /// Debounce timer running for the latest pointer sample.
    Armed(PointerSample),
    /// The overlay is showing this word.
    Resolved(String),
}
