pub mod context;
pub mod geometry;
pub mod message;

pub use context::{truncate_sentence, LookupContext};
pub use geometry::{PointerSample, Rect, Size};
pub use message::{ExtensionMessage, LookupPayload, PanelNotification, SenderInfo, TtsPayload};
