//! Seam to the host browser's extension runtime. Everything the background
//! context reads or changes in the browser goes through these traits.
#![allow(async_fn_in_trait)]

use serde_json::Value;
use thiserror::Error;

use crate::contract::BackgroundMessage;
use crate::model::{BookmarkNode, HistoryItem, TabInfo};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("browser api '{api}' failed: {message}")]
    Api { api: &'static str, message: String },
    #[error("no receiver in tab {0}")]
    NoReceiver(i64),
}

impl SourceError {
    pub fn api(api: &'static str, message: impl Into<String>) -> Self {
        Self::Api {
            api,
            message: message.into(),
        }
    }
}

/// History lookup bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub text: String,
    pub max_results: usize,
    /// Oldest visit to include, in milliseconds since the Unix epoch.
    pub start_time_ms: i64,
}

pub trait BrowserApi {
    async fn query_tabs(&self) -> Result<Vec<TabInfo>, SourceError>;

    /// Active tab of the focused window, if any.
    async fn active_tab(&self) -> Result<Option<TabInfo>, SourceError>;

    async fn search_bookmarks(&self, query: &str) -> Result<Vec<BookmarkNode>, SourceError>;

    async fn search_history(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>, SourceError>;

    async fn activate_tab(&self, tab_id: i64) -> Result<(), SourceError>;

    async fn focus_window(&self, window_id: i64) -> Result<(), SourceError>;

    async fn create_tab(&self, url: &str) -> Result<(), SourceError>;

    async fn send_to_tab(&self, tab_id: i64, message: BackgroundMessage) -> Result<(), SourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    /// Synchronized across the user's browsers.
    Sync,
    Local,
}

impl StorageArea {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Local => "local",
        }
    }
}

pub trait SettingsStorage {
    async fn get(&self, area: StorageArea, key: &str) -> Result<Option<Value>, SourceError>;

    async fn set(&self, area: StorageArea, key: &str, value: Value) -> Result<(), SourceError>;
}
