use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    models::{Rect, Size},
    settings::OverlaySettings,
};

use super::{
    layout::{place_overlay, Placement},
    preview::{PreviewSource, QuickDefinition},
    state::TooltipState,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

pub const PREVIEW_HINT: &str = "Double-click for full lookup";

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayBody {
    Loading,
    Definition(QuickDefinition),
    NotFound,
}

/// Everything the host needs to draw one frame of the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub word: String,
    pub body: OverlayBody,
    pub placement: Placement,
    pub hint: Option<&'static str>,
}

/// The floating element owned by the page script.
pub trait OverlaySurface: Send + Sync {
    fn viewport(&self) -> Size;
    /// Laid-out height, once the surface has been rendered at least once.
    fn measured_height(&self) -> Option<f64>;
    fn render(&self, view: &OverlayView);
    /// Hiding keeps the surface allocated for reuse.
    fn set_visible(&self, visible: bool);
}

#[derive(Default)]
struct OverlayInner {
    state: TooltipState,
    anchor: Option<Rect>,
    fetch_token: Option<CancellationToken>,
}

impl OverlayInner {
    fn cancel_fetch(&mut self) {
        if let Some(token) = self.fetch_token.take() {
            token.cancel();
        }
    }
}

/// Renders the hover preview and owns its single in-flight fetch.
#[derive(Clone)]
pub struct OverlayController {
    inner: Arc<Mutex<OverlayInner>>,
    surface: Arc<dyn OverlaySurface>,
    source: Arc<dyn PreviewSource>,
    settings: OverlaySettings,
}

impl OverlayController {
    pub fn new(
        surface: Arc<dyn OverlaySurface>,
        source: Arc<dyn PreviewSource>,
        settings: OverlaySettings,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(OverlayInner::default())),
            surface,
            source,
            settings,
        }
    }

    pub async fn state(&self) -> TooltipState {
        self.inner.lock().await.state.clone()
    }

    /// Shows a loading preview for `word` and starts its fetch in the background.
    /// A no-op while `word` is already the active preview.
    pub async fn show(&self, word: &str, anchor: Rect) {
        let mut inner = self.inner.lock().await;
        if inner.state.word() == Some(word) {
            return;
        }

        inner.cancel_fetch();
        inner.state = TooltipState::Pending(word.to_string());
        inner.anchor = Some(anchor);
        self.draw(word, OverlayBody::Loading, anchor, false);
        self.surface.set_visible(true);

        let token = CancellationToken::new();
        inner.fetch_token = Some(token.clone());
        tokio::spawn(self.clone().fetch_preview(word.to_string(), token));
    }

    pub async fn hide(&self) {
        let mut inner = self.inner.lock().await;
        inner.cancel_fetch();
        inner.anchor = None;
        if inner.state.is_visible() {
            inner.state = TooltipState::Hidden;
            self.surface.set_visible(false);
        }
    }

    async fn fetch_preview(self, word: String, token: CancellationToken) {
        {
            let mut inner = self.inner.lock().await;
            if token.is_cancelled() || !inner.state.awaits(&word) {
                return;
            }
            inner.state = TooltipState::Loading(word.clone());
        }

        let outcome = tokio::select! {
            _ = token.cancelled() => {
                log_debug!("preview fetch for '{}' superseded", word);
                return;
            }
            outcome = self.source.quick_definition(&word) => outcome,
        };

        let mut inner = self.inner.lock().await;
        // Last requested wins: a response for a word that is no longer active is dropped.
        if token.is_cancelled() || !inner.state.awaits(&word) {
            log_debug!("discarding stale preview for '{}'", word);
            return;
        }
        inner.fetch_token = None;

        let body = match outcome {
            Ok(Some(definition)) => {
                inner.state = TooltipState::Shown(word.clone(), definition.clone());
                OverlayBody::Definition(definition)
            }
            Ok(None) => {
                inner.state = TooltipState::Failed(word.clone());
                OverlayBody::NotFound
            }
            Err(err) => {
                log_warn!("preview fetch for '{}' failed: {err:#}", word);
                inner.state = TooltipState::Failed(word.clone());
                OverlayBody::NotFound
            }
        };

        if let Some(anchor) = inner.anchor {
            self.draw(&word, body, anchor, true);
        }
    }

    fn draw(&self, word: &str, body: OverlayBody, anchor: Rect, with_hint: bool) {
        let height = self
            .surface
            .measured_height()
            .filter(|height| *height > 0.0)
            .unwrap_or(self.settings.fallback_height);
        let placement = place_overlay(anchor, height, self.surface.viewport(), &self.settings);
        self.surface.render(&OverlayView {
            word: word.to_string(),
            body,
            placement,
            hint: with_hint.then_some(PREVIEW_HINT),
        });
    }
}
