//! The side panel: cold-start reconciliation and the lookup view.

pub mod bootstrap;
pub mod view;

pub use bootstrap::{PanelBootstrapper, ViewUpdateHandler};
pub use view::{LookupStatus, LookupView, LookupViewState};
