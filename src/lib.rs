//! Hover preview and panel lookup pipeline for a dictionary browser extension.
//!
//! Three isolated contexts share nothing but messages: the page script
//! ([`content`]), the background coordinator ([`background`]) and the side
//! panel ([`panel`]). [`Extension`] wires them over the in-process
//! [`runtime::RuntimeBus`]; browser facilities come in through the traits in
//! [`HostServices`].

pub mod background;
pub mod content;
pub mod lookup;
pub mod models;
pub mod panel;
pub mod runtime;
pub mod settings;
pub mod storage;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use background::{BackgroundWorker, MessageRouter, PanelHost, SpeechDispatcher, SpeechEngine, VoiceCatalog};
use content::{
    overlay::{OverlaySurface, PreviewSource},
    ContentScript, PageSurface,
};
use lookup::FreeDictionaryClient;
use models::SenderInfo;
use panel::{PanelBootstrapper, ViewUpdateHandler};
use runtime::RuntimeBus;
use settings::ExtensionSettings;
use storage::PendingSlot;

/// Browser-provided facilities used by the coordinator and the panel.
#[derive(Clone)]
pub struct HostServices {
    pub panel: Arc<dyn PanelHost>,
    pub voices: Arc<dyn VoiceCatalog>,
    pub speech: Arc<dyn SpeechEngine>,
    pub pending: Arc<dyn PendingSlot>,
}

/// A running extension: coordinator started, ready to attach pages and panels.
pub struct Extension {
    settings: ExtensionSettings,
    bus: RuntimeBus,
    router: Arc<MessageRouter>,
    worker: BackgroundWorker,
    pending: Arc<dyn PendingSlot>,
    panel_cancel: CancellationToken,
}

impl Extension {
    pub fn start(settings: ExtensionSettings, host: HostServices) -> Result<Self> {
        let (bus, inbox) = RuntimeBus::new();
        let speech = SpeechDispatcher::new(host.voices, host.speech, settings.speech.clone());
        let router = Arc::new(MessageRouter::new(
            host.pending.clone(),
            host.panel,
            Arc::new(bus.clone()),
            speech,
            settings.broadcast_delay(),
        ));

        let mut worker = BackgroundWorker::new();
        worker.start(router.clone(), inbox)?;

        Ok(Self {
            settings,
            bus,
            router,
            worker,
            pending: host.pending,
            panel_cancel: CancellationToken::new(),
        })
    }

    pub fn is_coordinator_running(&self) -> bool {
        self.worker.is_running()
    }

    pub fn settings(&self) -> &ExtensionSettings {
        &self.settings
    }

    /// Context-menu and toolbar entry points live on the router.
    pub fn router(&self) -> &Arc<MessageRouter> {
        &self.router
    }

    pub fn content_script(
        &self,
        sender: SenderInfo,
        page: Arc<dyn PageSurface>,
        surface: Arc<dyn OverlaySurface>,
        preview: Arc<dyn PreviewSource>,
    ) -> ContentScript {
        ContentScript::attach(
            page,
            Arc::new(self.bus.page_channel(sender)),
            surface,
            preview,
            &self.settings,
        )
    }

    /// Mounts a panel: subscribes first, then reconciles the pending slot.
    pub async fn mount_panel(&self, handler: Arc<dyn ViewUpdateHandler>) -> JoinHandle<()> {
        let updates = self.bus.subscribe();
        PanelBootstrapper::new(self.pending.clone(), handler)
            .start(updates, self.panel_cancel.child_token())
            .await
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.panel_cancel.cancel();
        self.worker.stop().await
    }
}

/// The dictionary client used for hover previews and panel lookups.
pub fn dictionary_client(settings: &ExtensionSettings) -> Result<Arc<FreeDictionaryClient>> {
    Ok(Arc::new(FreeDictionaryClient::new(settings.dictionary_url.clone())?))
}

/// Reads `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    log::info!("wordpeek logging initialized");
}
