//! What the page script needs from the host document.

use crate::models::{PointerSample, Rect};

/// Opaque handle to a DOM text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// The element an event targeted, or that hosts a text node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    pub tag: String,
    pub content_editable: bool,
    /// True when the element is the overlay or inside it.
    pub in_overlay: bool,
    pub text_content: Option<String>,
}

impl ElementInfo {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn is_text_entry(&self) -> bool {
        self.content_editable
            || matches!(
                self.tag.to_ascii_lowercase().as_str(),
                "input" | "textarea" | "select"
            )
    }

    /// Elements the hover path must never resolve words inside.
    pub fn is_ignored(&self) -> bool {
        self.in_overlay || self.is_text_entry()
    }
}

/// Caret position under a point: a text node and a byte offset into its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub text: String,
    pub offset: usize,
    pub host: ElementInfo,
}

/// Half-open byte span inside one text node. Casing of the page is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRange {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    /// Text of the selection anchor's parent element, when known.
    pub anchor_parent_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub url: String,
    pub title: String,
}

pub trait PageSurface: Send + Sync {
    /// `None` unless the point lands on a text node.
    fn caret_at(&self, point: PointerSample) -> Option<Caret>;
    fn range_rect(&self, range: &TextRange) -> Option<Rect>;
    fn selection(&self) -> Option<Selection>;
    fn location(&self) -> PageLocation;
}
