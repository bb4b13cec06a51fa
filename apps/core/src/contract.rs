use serde::{Deserialize, Serialize};

use crate::model::{BookmarkNode, HistoryItem, ResultAction, TabInfo};

/// Requests sent from a page to the background context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageRequest {
    Search {
        query: String,
    },
    #[serde(rename_all = "camelCase")]
    SwitchToTab {
        tab_id: i64,
        window_id: i64,
    },
    OpenBookmark {
        url: String,
    },
    OpenHistoryItem {
        url: String,
    },
    SettingsUpdated,
}

impl From<ResultAction> for PageRequest {
    fn from(value: ResultAction) -> Self {
        match value {
            ResultAction::SwitchToTab { tab_id, window_id } => Self::SwitchToTab { tab_id, window_id },
            ResultAction::OpenBookmark { url } => Self::OpenBookmark { url },
            ResultAction::OpenHistoryItem { url } => Self::OpenHistoryItem { url },
        }
    }
}

/// Messages pushed from the background context to a page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BackgroundMessage {
    OpenSearch,
}

/// Messages on the long-lived per-page shortcut channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PortMessage {
    Keydown { shortcut: String },
}

/// Unranked union returned for a `search` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchResponse {
    pub tabs: Vec<TabInfo>,
    pub bookmarks: Vec<BookmarkNode>,
    pub history: Vec<HistoryItem>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty() && self.bookmarks.is_empty() && self.history.is_empty()
    }
}
