use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;

use wordpeek_lib::{
    background::{PanelHost, SpeakOptions, SpeechEngine, Voice, VoiceCatalog},
    content::{
        overlay::{OverlaySurface, OverlayView, PreviewSource, QuickDefinition},
        Caret, ClickEvent, ElementInfo, Modifiers, PageEvent, PageLocation, PageSurface, Selection,
        TextRange,
    },
    lookup::{Definition, LookupService},
    models::{PointerSample, Rect, SenderInfo, Size},
    panel::{LookupStatus, LookupView},
    settings::ExtensionSettings,
    storage::{MemorySlot, PendingSlot},
    Extension, HostServices,
};

#[derive(Default)]
struct Panels {
    opened: Mutex<Vec<u32>>,
}

#[async_trait]
impl PanelHost for Panels {
    async fn open(&self, window_id: u32) -> Result<()> {
        self.opened.lock().unwrap().push(window_id);
        Ok(())
    }
}

struct Voices;

#[async_trait]
impl VoiceCatalog for Voices {
    async fn list(&self) -> Result<Vec<Voice>> {
        Ok(vec![
            Voice::new("Samantha", "en-US"),
            Voice::new("Google US English", "en-US"),
        ])
    }
}

#[derive(Default)]
struct Speaker {
    spoken: Mutex<Vec<(String, SpeakOptions)>>,
}

impl SpeechEngine for Speaker {
    fn speak(&self, text: &str, options: &SpeakOptions) -> Result<()> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), options.clone()));
        Ok(())
    }
}

struct ArticlePage {
    selection: Mutex<Option<Selection>>,
}

impl ArticlePage {
    fn select(&self, text: &str) {
        *self.selection.lock().unwrap() = Some(Selection {
            text: text.into(),
            anchor_parent_text: Some("The serendipity of finding it was remarkable.".into()),
        });
    }
}

impl PageSurface for ArticlePage {
    fn caret_at(&self, _point: PointerSample) -> Option<Caret> {
        None
    }
    fn range_rect(&self, _range: &TextRange) -> Option<Rect> {
        None
    }
    fn selection(&self) -> Option<Selection> {
        self.selection.lock().unwrap().clone()
    }
    fn location(&self) -> PageLocation {
        PageLocation {
            url: "https://example.com/story".into(),
            title: "A Story".into(),
        }
    }
}

struct NullSurface;

impl OverlaySurface for NullSurface {
    fn viewport(&self) -> Size {
        Size::new(800.0, 600.0)
    }
    fn measured_height(&self) -> Option<f64> {
        None
    }
    fn render(&self, _view: &OverlayView) {}
    fn set_visible(&self, _visible: bool) {}
}

struct NoPreview;

#[async_trait]
impl PreviewSource for NoPreview {
    async fn quick_definition(&self, _word: &str) -> Result<Option<QuickDefinition>> {
        Ok(None)
    }
}

#[derive(Default)]
struct Dictionary {
    calls: Mutex<Vec<String>>,
    /// Answered only after eight seconds.
    slow_word: Option<&'static str>,
}

#[async_trait]
impl LookupService for Dictionary {
    async fn lookup(&self, word: &str, _context_sentence: Option<&str>) -> Result<Option<Definition>> {
        self.calls.lock().unwrap().push(word.to_string());
        if self.slow_word == Some(word) {
            tokio::time::sleep(Duration::from_secs(8)).await;
        }
        Ok(Some(Definition {
            id: word.into(),
            text: word.into(),
            phonetic: None,
            audio_url: None,
            senses: Vec::new(),
        }))
    }
}

struct Harness {
    extension: Extension,
    panels: Arc<Panels>,
    speaker: Arc<Speaker>,
    pending: Arc<MemorySlot>,
    page: Arc<ArticlePage>,
}

fn harness() -> Harness {
    wordpeek_lib::init_logging();
    let panels = Arc::new(Panels::default());
    let speaker = Arc::new(Speaker::default());
    let pending = Arc::new(MemorySlot::new());
    let extension = Extension::start(
        ExtensionSettings::default(),
        HostServices {
            panel: panels.clone(),
            voices: Arc::new(Voices),
            speech: speaker.clone(),
            pending: pending.clone(),
        },
    )
    .expect("extension starts");
    Harness {
        extension,
        panels,
        speaker,
        pending,
        page: Arc::new(ArticlePage {
            selection: Mutex::new(None),
        }),
    }
}

fn attach(h: &Harness) -> wordpeek_lib::content::ContentScript {
    h.extension.content_script(
        SenderInfo::tab(1, 100),
        h.page.clone(),
        Arc::new(NullSurface),
        Arc::new(NoPreview),
    )
}

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn cold_start_panel_reads_pending_once() {
    let h = harness();
    let script = attach(&h);

    h.page.select(" serendipity ");
    script.dispatch(PageEvent::DoubleClick).await;
    wait(10).await;

    assert_eq!(*h.panels.opened.lock().unwrap(), vec![100]);
    assert_eq!(
        h.pending.get_pending().await.unwrap().map(|p| p.word),
        Some("serendipity".to_string())
    );

    let dictionary = Arc::new(Dictionary::default());
    let view = Arc::new(LookupView::new(dictionary.clone()));
    let _listener = h.extension.mount_panel(view.clone()).await;
    wait(10).await;

    let state = view.state().await;
    assert_eq!(state.word.as_deref(), Some("serendipity"));
    assert_eq!(
        state.context.map(|c| c.sentence),
        Some("The serendipity of finding it was remarkable.".to_string())
    );
    assert!(matches!(state.status, LookupStatus::Ready(_)));
    assert!(h.pending.get_pending().await.unwrap().is_none());

    // The late broadcast carries the same request and is absorbed.
    wait(1_000).await;
    assert_eq!(*dictionary.calls.lock().unwrap(), vec!["serendipity".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn live_panel_receives_broadcast() {
    let h = harness();
    let script = attach(&h);

    let dictionary = Arc::new(Dictionary::default());
    let view = Arc::new(LookupView::new(dictionary.clone()));
    let _listener = h.extension.mount_panel(view.clone()).await;
    assert_eq!(view.state().await.word, None);

    h.page.select("ephemeral");
    script.dispatch(PageEvent::DoubleClick).await;
    wait(100).await;
    assert_eq!(view.state().await.word, None);

    wait(600).await;
    assert_eq!(view.state().await.word.as_deref(), Some("ephemeral"));
    assert_eq!(dictionary.calls.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_lookup_is_overtaken_by_newer_request() {
    let h = harness();
    let script = attach(&h);

    let dictionary = Arc::new(Dictionary {
        slow_word: Some("first"),
        ..Dictionary::default()
    });
    let view = Arc::new(LookupView::new(dictionary.clone()));
    let _listener = h.extension.mount_panel(view.clone()).await;

    h.page.select("first");
    script.dispatch(PageEvent::DoubleClick).await;
    wait(100).await;
    h.page.select("second");
    script.dispatch(PageEvent::DoubleClick).await;

    // Both broadcasts are out; "first" is still being looked up.
    wait(2_000).await;
    assert_eq!(
        *dictionary.calls.lock().unwrap(),
        vec!["first".to_string(), "second".to_string()]
    );
    let state = view.state().await;
    assert_eq!(state.word.as_deref(), Some("second"));
    assert!(matches!(state.status, LookupStatus::Ready(ref d) if d.text == "second"));

    // The stale answer lands later and is dropped.
    wait(8_000).await;
    let state = view.state().await;
    assert_eq!(state.word.as_deref(), Some("second"));
    assert!(matches!(state.status, LookupStatus::Ready(ref d) if d.text == "second"));
}

#[tokio::test(start_paused = true)]
async fn alt_click_speaks_selection() {
    let h = harness();
    let script = attach(&h);

    h.page.select("Selected Text");
    script
        .dispatch(PageEvent::Click(ClickEvent {
            target: ElementInfo::new("p").with_text("Paragraph Text"),
            modifiers: Modifiers::alt(),
        }))
        .await;
    wait(10).await;

    let spoken = h.speaker.spoken.lock().unwrap();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].0, "Selected Text");
    assert_eq!(spoken[0].1.voice_name.as_deref(), Some("Google US English"));
    assert_eq!(spoken[0].1.rate, 1.0);
}

#[tokio::test(start_paused = true)]
async fn pages_survive_coordinator_shutdown() {
    let mut h = harness();
    let script = attach(&h);
    assert!(h.extension.is_coordinator_running());

    h.extension.shutdown().await.expect("shutdown");
    assert!(!h.extension.is_coordinator_running());

    // Channel is invalidated; the page swallows the error.
    h.page.select("orphan");
    script.dispatch(PageEvent::DoubleClick).await;
    wait(1_000).await;

    assert!(h.panels.opened.lock().unwrap().is_empty());
    script.detach().await;
}

#[tokio::test]
async fn dictionary_client_builds_from_settings() {
    let settings = ExtensionSettings {
        dictionary_url: "http://127.0.0.1:9/entries".into(),
        ..ExtensionSettings::default()
    };
    assert!(wordpeek_lib::dictionary_client(&settings).is_ok());
}
