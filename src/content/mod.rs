//! The page-embedded script: hover preview and click triggers.

pub mod hover;
pub mod interactions;
pub mod overlay;
pub mod page;
pub mod resolver;
pub mod script;

pub use interactions::{ClickEvent, InteractionHandlers, Modifiers};
pub use page::{Caret, ElementInfo, NodeId, PageLocation, PageSurface, Selection, TextRange};
pub use resolver::{WordMatch, WordResolver};
pub use script::{ContentScript, PageEvent};
