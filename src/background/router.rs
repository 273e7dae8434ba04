use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::{
    models::{ExtensionMessage, LookupContext, LookupPayload, PanelNotification, SenderInfo},
    storage::PendingSlot,
};

use super::{
    host::{Broadcaster, ContextMenus, MenuClick, MenuContext, MenuItem, PanelHost, TabInfo},
    speech::SpeechDispatcher,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

pub const LOOKUP_MENU_ID: &str = "lookup-word";
pub const LOOKUP_MENU_TITLE: &str = "Lookup Definition";

/// Process-wide dispatcher living in the background coordinator.
pub struct MessageRouter {
    slot: Arc<dyn PendingSlot>,
    panel: Arc<dyn PanelHost>,
    broadcaster: Arc<dyn Broadcaster>,
    speech: SpeechDispatcher,
    broadcast_delay: Duration,
}

impl MessageRouter {
    pub fn new(
        slot: Arc<dyn PendingSlot>,
        panel: Arc<dyn PanelHost>,
        broadcaster: Arc<dyn Broadcaster>,
        speech: SpeechDispatcher,
        broadcast_delay: Duration,
    ) -> Self {
        Self {
            slot,
            panel,
            broadcaster,
            speech,
            broadcast_delay,
        }
    }

    /// Never fails: errors are logged so the coordinator stays up.
    pub async fn handle(&self, message: ExtensionMessage, sender: SenderInfo) {
        let kind = message.kind();
        if let Err(err) = self.dispatch(message, sender).await {
            log_error!("failed to handle {kind} message: {err:#}");
        }
    }

    async fn dispatch(&self, message: ExtensionMessage, sender: SenderInfo) -> Result<()> {
        match message {
            ExtensionMessage::Lookup(payload) => {
                // A tab without a window has no panel to anchor to.
                let Some(window_id) = sender.window_id else {
                    log_debug!("dropping LOOKUP '{}' without sender window", payload.word);
                    return Ok(());
                };
                self.open_lookup(payload, window_id).await.map(|_| ())
            }
            ExtensionMessage::Tts(payload) => self
                .speech
                .speak(&payload.text)
                .await
                .context("speech request failed"),
        }
    }

    /// Persist, open the panel, then broadcast after the mount delay.
    ///
    /// The returned handle resolves once the broadcast went out.
    pub async fn open_lookup(
        &self,
        payload: LookupPayload,
        window_id: u32,
    ) -> Result<JoinHandle<()>> {
        self.slot
            .set_pending(&payload)
            .await
            .context("failed to persist pending lookup")?;
        log_debug!("lookup '{}' persisted, opening panel", payload.word);
        self.panel
            .open(window_id)
            .await
            .with_context(|| format!("failed to open panel for window {window_id}"))?;

        Ok(self.schedule_broadcast(payload))
    }

    fn schedule_broadcast(&self, payload: LookupPayload) -> JoinHandle<()> {
        let broadcaster = self.broadcaster.clone();
        let delay = self.broadcast_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            log_debug!("broadcasting lookup '{}'", payload.word);
            broadcaster.broadcast(PanelNotification::ViewUpdate(payload));
        })
    }

    pub fn on_installed(&self, menus: &dyn ContextMenus) -> Result<()> {
        menus
            .create(&MenuItem {
                id: LOOKUP_MENU_ID.into(),
                title: LOOKUP_MENU_TITLE.into(),
                contexts: vec![MenuContext::Selection],
            })
            .context("failed to register lookup menu")?;
        log_info!("registered '{}' context menu", LOOKUP_MENU_ID);
        Ok(())
    }

    pub async fn on_menu_clicked(&self, click: MenuClick, tab: TabInfo) {
        if click.menu_item_id != LOOKUP_MENU_ID {
            return;
        }
        self.seed_from_selection(click.selection_text.as_deref(), &tab)
            .await;
    }

    /// Toolbar activation: always opens the panel, seeding a lookup when text is selected.
    pub async fn on_action_clicked(&self, tab: TabInfo, selection: Option<String>) {
        let Some(window_id) = tab.window_id else {
            return;
        };
        if self.seed_from_selection(selection.as_deref(), &tab).await {
            return;
        }
        if let Err(err) = self.panel.open(window_id).await {
            log_error!("failed to open panel for window {window_id}: {err:#}");
        }
    }

    /// Returns whether a lookup was started.
    async fn seed_from_selection(&self, selection: Option<&str>, tab: &TabInfo) -> bool {
        let Some(word) = selection.map(str::trim).filter(|text| !text.is_empty()) else {
            return false;
        };
        let Some(window_id) = tab.window_id else {
            return false;
        };

        // The selection is the only context this gesture provides.
        let payload = LookupPayload {
            word: word.to_string(),
            context: LookupContext::from_selection(word, tab.url.as_deref(), tab.title.as_deref()),
        };
        match self.open_lookup(payload, window_id).await {
            Ok(_) => true,
            Err(err) => {
                log_error!("selection lookup failed: {err:#}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;
    use crate::{
        background::speech::{
            tests::{FixedVoices, RecordingEngine},
            Voice,
        },
        models::TtsPayload,
        settings::SpeechSettings,
        storage::MemorySlot,
    };

    #[derive(Default)]
    struct RecordingPanel {
        opened: Mutex<Vec<u32>>,
        fail: bool,
    }

    #[async_trait]
    impl PanelHost for RecordingPanel {
        async fn open(&self, window_id: u32) -> Result<()> {
            if self.fail {
                return Err(anyhow!("no user gesture"));
            }
            self.opened.lock().unwrap().push(window_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingBroadcaster {
        sent: Mutex<Vec<PanelNotification>>,
    }

    impl Broadcaster for RecordingBroadcaster {
        fn broadcast(&self, notification: PanelNotification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    #[derive(Default)]
    struct RecordingMenus {
        items: Mutex<Vec<MenuItem>>,
    }

    impl ContextMenus for RecordingMenus {
        fn create(&self, item: &MenuItem) -> Result<()> {
            self.items.lock().unwrap().push(item.clone());
            Ok(())
        }
    }

    struct Fixture {
        router: MessageRouter,
        slot: Arc<MemorySlot>,
        panel: Arc<RecordingPanel>,
        broadcaster: Arc<RecordingBroadcaster>,
        engine: Arc<RecordingEngine>,
    }

    fn fixture_with_panel(panel: RecordingPanel) -> Fixture {
        let slot = Arc::new(MemorySlot::new());
        let panel = Arc::new(panel);
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let engine = Arc::new(RecordingEngine::default());
        let speech = SpeechDispatcher::new(
            Arc::new(FixedVoices(vec![
                Voice::new("Google US English", "en-US"),
                Voice::new("Samantha", "en-US"),
            ])),
            engine.clone(),
            SpeechSettings::default(),
        );
        let router = MessageRouter::new(
            slot.clone(),
            panel.clone(),
            broadcaster.clone(),
            speech,
            Duration::from_millis(500),
        );
        Fixture {
            router,
            slot,
            panel,
            broadcaster,
            engine,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_panel(RecordingPanel::default())
    }

    fn lookup(word: &str) -> ExtensionMessage {
        ExtensionMessage::Lookup(LookupPayload {
            word: word.into(),
            context: LookupContext::new("This is a test.".into(), "https://example.com", "Example"),
        })
    }

    fn broadcast_words(broadcaster: &RecordingBroadcaster) -> Vec<String> {
        broadcaster
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|PanelNotification::ViewUpdate(payload)| payload.word.clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_opens_panel_then_broadcasts_after_delay() {
        let fx = fixture();
        fx.router.handle(lookup("test"), SenderInfo::tab(1, 100)).await;

        assert_eq!(*fx.panel.opened.lock().unwrap(), vec![100]);
        assert!(broadcast_words(&fx.broadcaster).is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(broadcast_words(&fx.broadcaster).is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(broadcast_words(&fx.broadcaster), vec!["test".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_is_persisted_for_cold_start() {
        let fx = fixture();
        fx.router.handle(lookup("test"), SenderInfo::tab(1, 100)).await;

        let pending = fx.slot.get_pending().await.unwrap().expect("pending");
        assert_eq!(pending.word, "test");
        assert_eq!(pending.context.sentence, "This is a test.");
    }

    #[tokio::test(start_paused = true)]
    async fn later_lookup_overwrites_unread_pending() {
        let fx = fixture();
        fx.router.handle(lookup("first"), SenderInfo::tab(1, 100)).await;
        fx.router.handle(lookup("second"), SenderInfo::tab(2, 200)).await;

        assert_eq!(fx.slot.take_pending().await.unwrap().unwrap().word, "second");
        assert!(fx.slot.take_pending().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_without_window_is_dropped() {
        let fx = fixture();
        let sender = SenderInfo {
            tab_id: Some(1),
            window_id: None,
        };
        fx.router.handle(lookup("test"), sender).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(fx.panel.opened.lock().unwrap().is_empty());
        assert!(fx.slot.get_pending().await.unwrap().is_none());
        assert!(broadcast_words(&fx.broadcaster).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn panel_failure_is_logged_not_propagated() {
        let fx = fixture_with_panel(RecordingPanel {
            fail: true,
            ..RecordingPanel::default()
        });
        fx.router.handle(lookup("test"), SenderInfo::tab(1, 100)).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(broadcast_words(&fx.broadcaster).is_empty());
        // Persisted before the failure, so a panel opened later still sees it.
        assert!(fx.slot.get_pending().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn tts_selects_google_us_english() {
        let fx = fixture();
        fx.router
            .handle(
                ExtensionMessage::Tts(TtsPayload {
                    text: "Hello world".into(),
                }),
                SenderInfo::default(),
            )
            .await;

        let spoken = fx.engine.spoken.lock().unwrap();
        assert_eq!(spoken[0].0, "Hello world");
        assert_eq!(spoken[0].1.voice_name.as_deref(), Some("Google US English"));
    }

    #[test]
    fn install_registers_selection_menu() {
        let fx = fixture();
        let menus = RecordingMenus::default();
        fx.router.on_installed(&menus).unwrap();

        let items = menus.items.lock().unwrap();
        assert_eq!(items[0].id, LOOKUP_MENU_ID);
        assert_eq!(items[0].title, "Lookup Definition");
        assert_eq!(items[0].contexts, vec![MenuContext::Selection]);
    }

    fn tab() -> TabInfo {
        TabInfo {
            id: Some(3),
            window_id: Some(42),
            url: Some("https://example.com/post".into()),
            title: Some("A Post".into()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn menu_click_seeds_lookup_from_selection() {
        let fx = fixture();
        fx.router
            .on_menu_clicked(
                MenuClick {
                    menu_item_id: LOOKUP_MENU_ID.into(),
                    selection_text: Some(" serendipity ".into()),
                },
                tab(),
            )
            .await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(*fx.panel.opened.lock().unwrap(), vec![42]);
        let sent = fx.broadcaster.sent.lock().unwrap();
        let PanelNotification::ViewUpdate(payload) = &sent[0];
        assert_eq!(payload.word, "serendipity");
        assert_eq!(payload.context.sentence, "serendipity");
        assert_eq!(payload.context.url, "https://example.com/post");
    }

    #[tokio::test(start_paused = true)]
    async fn other_menu_items_are_ignored() {
        let fx = fixture();
        fx.router
            .on_menu_clicked(
                MenuClick {
                    menu_item_id: "something-else".into(),
                    selection_text: Some("word".into()),
                },
                tab(),
            )
            .await;
        assert!(fx.panel.opened.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn action_click_without_selection_only_opens_panel() {
        let fx = fixture();
        fx.router.on_action_clicked(tab(), None).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(*fx.panel.opened.lock().unwrap(), vec![42]);
        assert!(broadcast_words(&fx.broadcaster).is_empty());
        assert!(fx.slot.get_pending().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn action_click_with_selection_seeds_lookup() {
        let fx = fixture();
        fx.router.on_action_clicked(tab(), Some("ephemeral".into())).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(broadcast_words(&fx.broadcaster), vec!["ephemeral".to_string()]);
    }
}
