pub mod controller;
pub mod layout;
pub mod preview;
pub mod state;

pub use controller::{OverlayBody, OverlayController, OverlaySurface, OverlayView, PREVIEW_HINT};
pub use layout::{place_overlay, ArrowSide, Placement};
pub use preview::{PreviewSource, QuickDefinition};
pub use state::TooltipState;
