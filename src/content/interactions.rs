use std::sync::Arc;

use crate::{
    models::{truncate_sentence, ExtensionMessage, LookupContext, LookupPayload, TtsPayload},
    runtime::RuntimeChannel,
    settings::Modifier,
};

use super::page::{ElementInfo, PageSurface};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::default()
        }
    }

    pub fn holds(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Alt => self.alt,
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Meta => self.meta,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: ElementInfo,
    pub modifiers: Modifiers,
}

/// Turns double-clicks into LOOKUP and modifier-clicks into TTS requests.
pub struct InteractionHandlers {
    page: Arc<dyn PageSurface>,
    channel: Arc<dyn RuntimeChannel>,
    sentence_limit: usize,
    modifier: Modifier,
}

impl InteractionHandlers {
    pub fn new(
        page: Arc<dyn PageSurface>,
        channel: Arc<dyn RuntimeChannel>,
        sentence_limit: usize,
        modifier: Modifier,
    ) -> Self {
        Self {
            page,
            channel,
            sentence_limit,
            modifier,
        }
    }

    pub fn on_double_click(&self) {
        let Some(selection) = self.page.selection() else {
            return;
        };
        let word = selection.text.trim();
        if word.is_empty() {
            return;
        }

        let sentence = selection
            .anchor_parent_text
            .as_deref()
            .map(|text| truncate_sentence(text, self.sentence_limit))
            .filter(|sentence| !sentence.is_empty())
            .unwrap_or_else(|| word.to_string());
        let location = self.page.location();

        self.send(ExtensionMessage::Lookup(LookupPayload {
            word: word.to_string(),
            context: LookupContext::new(sentence, location.url, location.title),
        }));
    }

    pub fn on_click(&self, click: &ClickEvent) {
        if !click.modifiers.holds(self.modifier) {
            return;
        }

        let selected = self
            .page
            .selection()
            .map(|selection| selection.text.trim().to_string())
            .filter(|text| !text.is_empty());
        let text = selected.or_else(|| {
            click
                .target
                .text_content
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        });

        let Some(text) = text else {
            return;
        };
        self.send(ExtensionMessage::Tts(TtsPayload { text }));
    }

    fn send(&self, message: ExtensionMessage) {
        match self.channel.send(message) {
            Ok(()) => {}
            Err(err) if err.is_invalidated() => {
                log_info!("Extension updated. Please refresh the page.");
            }
            Err(err) => log_error!("failed to reach background: {err}"),
        }
    }
}
