//! Browser facilities the coordinator drives.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{models::PanelNotification, runtime::RuntimeBus};

/// Opens (or focuses) the side panel of a browser window. Idempotent.
#[async_trait]
pub trait PanelHost: Send + Sync {
    async fn open(&self, window_id: u32) -> Result<()>;
}

/// Fire-and-forget fan-out to whatever panels are currently listening.
pub trait Broadcaster: Send + Sync {
    fn broadcast(&self, notification: PanelNotification);
}

impl Broadcaster for RuntimeBus {
    fn broadcast(&self, notification: PanelNotification) {
        self.publish(notification);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuContext {
    Selection,
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

pub trait ContextMenus: Send + Sync {
    fn create(&self, item: &MenuItem) -> Result<()>;
}

/// The tab a gesture happened in, as reported by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: Option<u32>,
    pub window_id: Option<u32>,
    pub url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: String,
    pub selection_text: Option<String>,
}
