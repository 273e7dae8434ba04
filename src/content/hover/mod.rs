pub mod session;
pub mod state;

pub use session::HoverSession;
pub use state::HoverState;
