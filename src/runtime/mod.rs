pub mod bus;
pub mod channel;

pub use bus::{Envelope, PageChannel, RuntimeBus};
pub use channel::{ChannelError, RuntimeChannel, INVALIDATED_SIGNATURE};
