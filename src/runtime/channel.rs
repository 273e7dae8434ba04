use thiserror::Error;

use crate::models::ExtensionMessage;

/// Marker text hosts use when the extension was reloaded under a live page.
pub const INVALIDATED_SIGNATURE: &str = "Extension context invalidated";

#[derive(Debug, Error)]
pub enum ChannelError {
    /// The receiving side is gone, typically after an extension reload.
    #[error("Extension context invalidated")]
    Invalidated,
    #[error("message channel error: {0}")]
    Other(String),
}

impl ChannelError {
    /// Hosts may surface the teardown as a raw error string carrying the signature.
    pub fn is_invalidated(&self) -> bool {
        match self {
            ChannelError::Invalidated => true,
            ChannelError::Other(message) => message.contains(INVALIDATED_SIGNATURE),
        }
    }
}

/// One-way page to coordinator channel. There is no reply path.
pub trait RuntimeChannel: Send + Sync {
    fn send(&self, message: ExtensionMessage) -> Result<(), ChannelError>;
}
