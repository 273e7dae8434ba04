use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::runtime::Envelope;

use super::router::MessageRouter;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Owns the coordinator's dispatch loop.
pub struct BackgroundWorker {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl BackgroundWorker {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn start(
        &mut self,
        router: Arc<MessageRouter>,
        inbox: UnboundedReceiver<Envelope>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("background dispatch already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(dispatch_loop(router, inbox, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Stops dispatching. Pages sending afterwards see an invalidated channel.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("background dispatch task failed to join")
        } else {
            Ok(())
        }
    }
}

impl Default for BackgroundWorker {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles messages one at a time, in arrival order.
pub async fn dispatch_loop(
    router: Arc<MessageRouter>,
    mut inbox: UnboundedReceiver<Envelope>,
    cancel_token: CancellationToken,
) {
    log_info!("Background coordinator initialized");
    loop {
        tokio::select! {
            envelope = inbox.recv() => {
                let Some(Envelope { message, sender }) = envelope else {
                    log_info!("all page channels closed, dispatch loop exiting");
                    break;
                };
                router.handle(message, sender).await;
            }
            _ = cancel_token.cancelled() => {
                log_info!("dispatch loop shutting down");
                break;
            }
        }
    }
}
