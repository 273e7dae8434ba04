use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    task::{JoinError, JoinHandle, JoinSet},
};
use tokio_util::sync::CancellationToken;

use crate::{
    models::{LookupPayload, PanelNotification},
    storage::PendingSlot,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Downstream of both the cold-start read and live broadcasts.
#[async_trait]
pub trait ViewUpdateHandler: Send + Sync {
    async fn on_view_update(&self, payload: LookupPayload);
}

pub struct PanelBootstrapper {
    slot: Arc<dyn PendingSlot>,
    handler: Arc<dyn ViewUpdateHandler>,
}

impl PanelBootstrapper {
    pub fn new(slot: Arc<dyn PendingSlot>, handler: Arc<dyn ViewUpdateHandler>) -> Self {
        Self { slot, handler }
    }

    /// Consumes any pending lookup, then follows `updates` until cancelled.
    ///
    /// `updates` must be subscribed before calling so nothing broadcast
    /// during the cold-start read is missed. Returns once the slot has been
    /// read; deliveries run on the listener.
    pub async fn start(
        self,
        updates: Receiver<PanelNotification>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        let pending = match self.reconcile_pending().await {
            Ok(Some(payload)) => {
                log_info!("panel cold start with pending '{}'", payload.word);
                Some(payload)
            }
            Ok(None) => None,
            Err(err) => {
                log_error!("failed to read pending lookup: {err:#}");
                None
            }
        };

        tokio::spawn(listen(self.handler, updates, pending, cancel_token))
    }

    /// Cold-start read only; for hosts that wire the subscription themselves.
    pub async fn reconcile_pending(&self) -> Result<Option<LookupPayload>> {
        self.slot.take_pending().await
    }
}

/// Each delivery runs on its own task so a slow lookup never holds back a
/// newer one; the handler decides which result is current.
async fn listen(
    handler: Arc<dyn ViewUpdateHandler>,
    mut updates: Receiver<PanelNotification>,
    pending: Option<LookupPayload>,
    cancel_token: CancellationToken,
) {
    let mut deliveries = JoinSet::new();
    if let Some(payload) = pending {
        deliver(&mut deliveries, &handler, payload);
    }

    loop {
        tokio::select! {
            received = updates.recv() => match received {
                Ok(PanelNotification::ViewUpdate(payload)) => {
                    if payload.word.is_empty() {
                        continue;
                    }
                    deliver(&mut deliveries, &handler, payload);
                }
                Err(RecvError::Lagged(skipped)) => {
                    log_warn!("panel skipped {skipped} view updates");
                }
                Err(RecvError::Closed) => break,
            },
            Some(finished) = deliveries.join_next(), if !deliveries.is_empty() => {
                log_delivery_failure(finished);
            }
            _ = cancel_token.cancelled() => {
                deliveries.abort_all();
                return;
            }
        }
    }

    // Broadcaster gone: let in-flight lookups settle.
    while let Some(finished) = deliveries.join_next().await {
        log_delivery_failure(finished);
    }
}

fn deliver(
    deliveries: &mut JoinSet<()>,
    handler: &Arc<dyn ViewUpdateHandler>,
    payload: LookupPayload,
) {
    let handler = handler.clone();
    deliveries.spawn(async move { handler.on_view_update(payload).await });
}

fn log_delivery_failure(finished: Result<(), JoinError>) {
    if let Err(err) = finished {
        if err.is_panic() {
            log_error!("view update task panicked: {err}");
        }
    }
}
