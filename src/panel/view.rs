use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    lookup::{Definition, LookupService},
    models::{LookupContext, LookupPayload},
};

use super::bootstrap::ViewUpdateHandler;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading,
    Ready(Definition),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupViewState {
    pub word: Option<String>,
    pub context: Option<LookupContext>,
    pub status: LookupStatus,
}

/// The panel's lookup pane: whatever word arrived last is what it shows.
pub struct LookupView {
    service: Arc<dyn LookupService>,
    state: Mutex<LookupViewState>,
}

impl LookupView {
    pub fn new(service: Arc<dyn LookupService>) -> Self {
        Self {
            service,
            state: Mutex::new(LookupViewState::default()),
        }
    }

    pub async fn state(&self) -> LookupViewState {
        self.state.lock().await.clone()
    }

    fn is_current(state: &LookupViewState, payload: &LookupPayload) -> bool {
        state.word.as_deref() == Some(payload.word.as_str())
            && state.context.as_ref() == Some(&payload.context)
    }
}

#[async_trait]
impl ViewUpdateHandler for LookupView {
    async fn on_view_update(&self, payload: LookupPayload) {
        {
            let mut state = self.state.lock().await;
            // The same request can arrive via the pending slot and the broadcast.
            if Self::is_current(&state, &payload) {
                log_debug!("ignoring duplicate delivery of '{}'", payload.word);
                return;
            }
            *state = LookupViewState {
                word: Some(payload.word.clone()),
                context: Some(payload.context.clone()),
                status: LookupStatus::Loading,
            };
        }

        let outcome = self
            .service
            .lookup(&payload.word, Some(payload.context.sentence.as_str()))
            .await;

        let mut state = self.state.lock().await;
        if !Self::is_current(&state, &payload) {
            log_debug!("dropping lookup result for superseded '{}'", payload.word);
            return;
        }
        state.status = match outcome {
            Ok(Some(definition)) => LookupStatus::Ready(definition),
            Ok(None) => LookupStatus::NotFound,
            Err(err) => {
                log_warn!("lookup for '{}' failed: {err:#}", payload.word);
                LookupStatus::Failed(err.to_string())
            }
        };
    }
}
