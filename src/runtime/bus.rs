use tokio::sync::{broadcast, mpsc};

use crate::models::{ExtensionMessage, PanelNotification, SenderInfo};

use super::channel::{ChannelError, RuntimeChannel};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

const NOTIFICATION_CAPACITY: usize = 16;

/// A message as delivered to the coordinator.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub message: ExtensionMessage,
    pub sender: SenderInfo,
}

/// In-process stand-in for the browser's runtime messaging.
///
/// Pages send into a single unbounded queue drained by the coordinator;
/// the coordinator fans `VIEW_UPDATE` out to whichever panels are subscribed.
#[derive(Clone)]
pub struct RuntimeBus {
    to_background: mpsc::UnboundedSender<Envelope>,
    notifications: broadcast::Sender<PanelNotification>,
}

impl RuntimeBus {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        let (to_background, inbox) = mpsc::unbounded_channel();
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        (
            Self {
                to_background,
                notifications,
            },
            inbox,
        )
    }

    pub fn page_channel(&self, sender: SenderInfo) -> PageChannel {
        PageChannel {
            sender,
            tx: self.to_background.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelNotification> {
        self.notifications.subscribe()
    }

    /// Returns how many live listeners saw the notification.
    pub fn publish(&self, notification: PanelNotification) -> usize {
        match self.notifications.send(notification) {
            Ok(listeners) => listeners,
            Err(_) => {
                log_debug!("no live panel listener for notification");
                0
            }
        }
    }
}

/// A page's end of the bus, stamped with its tab identity.
#[derive(Clone)]
pub struct PageChannel {
    sender: SenderInfo,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl RuntimeChannel for PageChannel {
    fn send(&self, message: ExtensionMessage) -> Result<(), ChannelError> {
        self.tx
            .send(Envelope {
                message,
                sender: self.sender,
            })
            .map_err(|_| ChannelError::Invalidated)
    }
}
