use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{PointerSample, Rect};

use super::page::{PageSurface, TextRange};

// Letters, optionally joined by internal hyphens/apostrophes; or exactly two letters.
static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z'-]*[a-zA-Z]$|^[a-zA-Z]{2}$").expect("word pattern is valid")
});

pub const MIN_WORD_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatch {
    /// Lowercased for lookup.
    pub word: String,
    /// Original span, valid until the DOM mutates.
    pub range: TextRange,
}

fn is_word_char(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'-' || byte == b'\''
}

/// Expands around `offset` over word characters, returning a half-open byte span.
pub fn expand_word(text: &str, offset: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    let mut offset = offset.min(bytes.len());
    // Carets may land inside a multi-byte character; step back to its start.
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let mut start = offset;
    while start > 0 && is_word_char(bytes[start - 1]) {
        start -= 1;
    }

    let mut end = offset;
    while end < bytes.len() && is_word_char(bytes[end]) {
        end += 1;
    }

    (start, end)
}

/// True when the span is glued to a digit or a non-ASCII letter, i.e. it is
/// only a fragment of a larger token such as `abc1def` or `café`.
fn is_token_fragment(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    [before, after]
        .into_iter()
        .flatten()
        .any(|c| c.is_alphanumeric())
}

pub fn is_lookup_word(candidate: &str) -> bool {
    candidate.len() >= MIN_WORD_LEN && WORD_PATTERN.is_match(candidate)
}

/// Maps pointer positions to the word under them.
#[derive(Clone)]
pub struct WordResolver {
    page: Arc<dyn PageSurface>,
}

impl WordResolver {
    pub fn new(page: Arc<dyn PageSurface>) -> Self {
        Self { page }
    }

    pub fn resolve(&self, point: PointerSample) -> Option<WordMatch> {
        let caret = self.page.caret_at(point)?;
        if caret.host.is_ignored() {
            return None;
        }

        let (start, end) = expand_word(&caret.text, caret.offset);
        let candidate = caret.text.get(start..end)?;
        if !is_lookup_word(candidate) || is_token_fragment(&caret.text, start, end) {
            return None;
        }

        Some(WordMatch {
            word: candidate.to_ascii_lowercase(),
            range: TextRange {
                node: caret.node,
                start,
                end,
            },
        })
    }

    pub fn anchor_rect(&self, word: &WordMatch) -> Option<Rect> {
        self.page.range_rect(&word.range)
    }
}
