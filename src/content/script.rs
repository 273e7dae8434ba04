use std::sync::Arc;

use crate::{
    models::PointerSample,
    runtime::RuntimeChannel,
    settings::ExtensionSettings,
};

use super::{
    hover::HoverSession,
    interactions::{ClickEvent, InteractionHandlers},
    overlay::{OverlayController, OverlaySurface, PreviewSource},
    page::{ElementInfo, PageSurface},
    resolver::WordResolver,
};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Raw document events the page script listens to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    PointerMove {
        point: PointerSample,
        target: ElementInfo,
    },
    PointerOut {
        related: Option<ElementInfo>,
    },
    Scroll,
    Click(ClickEvent),
    DoubleClick,
}

/// Everything injected into one page: the hover preview and the click triggers.
pub struct ContentScript {
    hover: HoverSession,
    interactions: InteractionHandlers,
}

impl ContentScript {
    pub fn attach(
        page: Arc<dyn PageSurface>,
        channel: Arc<dyn RuntimeChannel>,
        surface: Arc<dyn OverlaySurface>,
        preview: Arc<dyn PreviewSource>,
        settings: &ExtensionSettings,
    ) -> Self {
        let overlay = OverlayController::new(surface, preview, settings.overlay.clone());
        let hover = HoverSession::new(
            WordResolver::new(page.clone()),
            overlay,
            settings.hover_delay(),
        );
        let interactions =
            InteractionHandlers::new(page, channel, settings.sentence_limit, settings.modifier);

        log_info!("content script attached");
        Self {
            hover,
            interactions,
        }
    }

    pub fn hover(&self) -> &HoverSession {
        &self.hover
    }

    pub async fn dispatch(&self, event: PageEvent) {
        match event {
            PageEvent::PointerMove { point, target } => {
                self.hover.on_pointer_move(point, &target).await
            }
            PageEvent::PointerOut { related } => self.hover.on_pointer_out(related.as_ref()).await,
            PageEvent::Scroll => self.hover.on_scroll().await,
            PageEvent::Click(click) => {
                self.interactions.on_click(&click);
                self.hover.on_click(&click.target).await;
            }
            PageEvent::DoubleClick => self.interactions.on_double_click(),
        }
    }

    /// Stops the hover timer and hides the overlay.
    pub async fn detach(&self) {
        self.hover.dismiss().await;
        log_info!("content script detached");
    }
}
