//! The long-lived coordinator: routes page requests, opens the panel, speaks.

pub mod host;
pub mod router;
pub mod speech;
pub mod worker;

pub use host::{Broadcaster, ContextMenus, MenuClick, MenuContext, MenuItem, PanelHost, TabInfo};
pub use router::{MessageRouter, LOOKUP_MENU_ID};
pub use speech::{choose_voice, SpeakOptions, SpeechDispatcher, SpeechEngine, Voice, VoiceCatalog, VoiceTier};
pub use worker::BackgroundWorker;
