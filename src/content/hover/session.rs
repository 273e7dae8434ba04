use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    content::{
        overlay::OverlayController,
        page::ElementInfo,
        resolver::WordResolver,
    },
    models::PointerSample,
};

use super::HoverState;

const ENABLE_LOGS: bool = false;

use crate::log_debug;

#[derive(Default)]
struct HoverInner {
    state: HoverState,
    /// Survives re-arming so a re-hover of the shown word stays a no-op.
    last_word: Option<String>,
    timer: Option<CancellationToken>,
}

impl HoverInner {
    fn cancel_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }
}

/// Debounced show, immediate hide.
#[derive(Clone)]
pub struct HoverSession {
    inner: Arc<Mutex<HoverInner>>,
    resolver: WordResolver,
    overlay: OverlayController,
    delay: Duration,
}

impl HoverSession {
    pub fn new(resolver: WordResolver, overlay: OverlayController, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HoverInner::default())),
            resolver,
            overlay,
            delay,
        }
    }

    pub async fn state(&self) -> HoverState {
        self.inner.lock().await.state.clone()
    }

    /// Re-arms the debounce timer for `point`; only the latest point survives.
    pub async fn on_pointer_move(&self, point: PointerSample, target: &ElementInfo) {
        let mut inner = self.inner.lock().await;
        inner.cancel_timer();

        if target.is_ignored() {
            if matches!(inner.state, HoverState::Armed(_)) {
                inner.state = Self::settled_state(&inner);
            }
            return;
        }

        let token = CancellationToken::new();
        inner.timer = Some(token.clone());
        inner.state = HoverState::Armed(point);
        tokio::spawn(self.clone().fire_after_delay(point, token));
    }

    /// `related` is where the pointer went; `None` means it left the page.
    pub async fn on_pointer_out(&self, related: Option<&ElementInfo>) {
        match related {
            Some(element) if element.in_overlay => {}
            Some(_) => {
                let mut inner = self.inner.lock().await;
                inner.cancel_timer();
                if matches!(inner.state, HoverState::Armed(_)) {
                    inner.state = Self::settled_state(&inner);
                }
            }
            None => self.dismiss().await,
        }
    }

    pub async fn on_scroll(&self) {
        self.dismiss().await;
    }

    pub async fn on_click(&self, target: &ElementInfo) {
        if !target.in_overlay {
            self.dismiss().await;
        }
    }

    /// Collapses to `Idle` and hides the overlay without waiting for the timer.
    pub async fn dismiss(&self) {
        let mut inner = self.inner.lock().await;
        inner.cancel_timer();
        inner.state = HoverState::Idle;
        inner.last_word = None;
        self.overlay.hide().await;
    }

    fn settled_state(inner: &HoverInner) -> HoverState {
        match &inner.last_word {
            Some(word) => HoverState::Resolved(word.clone()),
            None => HoverState::Idle,
        }
    }

    async fn fire_after_delay(self, point: PointerSample, token: CancellationToken) {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(self.delay) => {}
        }

        let mut inner = self.inner.lock().await;
        // A newer sample or a dismissal may have won the lock first.
        if token.is_cancelled() {
            return;
        }
        inner.timer = None;

        let Some(found) = self.resolver.resolve(point) else {
            if inner.last_word.take().is_some() {
                self.overlay.hide().await;
            }
            inner.state = HoverState::Idle;
            return;
        };

        if inner.last_word.as_deref() == Some(found.word.as_str())
            && self.overlay.state().await.is_visible()
        {
            inner.state = HoverState::Resolved(found.word);
            return;
        }

        let Some(anchor) = self.resolver.anchor_rect(&found) else {
            log_debug!("no layout box for '{}', skipping preview", found.word);
            inner.state = Self::settled_state(&inner);
            return;
        };

        log_debug!("hover resolved '{}'", found.word);
        inner.last_word = Some(found.word.clone());
        inner.state = HoverState::Resolved(found.word.clone());
        self.overlay.show(&found.word, anchor).await;
    }
}
