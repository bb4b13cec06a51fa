use serde::{Deserialize, Serialize};

/// Where a candidate came from. Also the group tag of a ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Tab,
    Bookmark,
    History,
}

impl SourceKind {
    /// Display order of the result groups.
    pub const ORDER: [SourceKind; 3] = [SourceKind::Tab, SourceKind::Bookmark, SourceKind::History];

    pub fn group_label(self) -> &'static str {
        match self {
            Self::Tab => "Tabs",
            Self::Bookmark => "Bookmarks",
            Self::History => "History",
        }
    }
}

/// Tab as reported by the browser's tab query API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabInfo {
    pub id: Option<i64>,
    pub window_id: i64,
    pub title: Option<String>,
    pub url: Option<String>,
    pub fav_icon_url: Option<String>,
    pub active: bool,
    pub status: Option<String>,
}

/// Bookmark tree node. Folders carry no url.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryItem {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub last_visit_time: Option<f64>,
    pub visit_count: Option<u32>,
}

/// Identifier needed to act on a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Tab { tab_id: i64, window_id: i64 },
    Url(String),
}

/// What activating a result asks the background context to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultAction {
    SwitchToTab { tab_id: i64, window_id: i64 },
    OpenBookmark { url: String },
    OpenHistoryItem { url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    pub kind: SourceKind,
    /// Raw title, empty when the source had none.
    pub title: String,
    pub url: Option<String>,
    pub source: SourceRef,
    pub fav_icon_url: Option<String>,
    pub last_visit_time: Option<f64>,
    pub visit_count: Option<u32>,
}

impl SearchCandidate {
    /// Tabs without an id cannot be switched to and are skipped.
    pub fn from_tab(tab: &TabInfo) -> Option<Self> {
        let tab_id = tab.id?;
        Some(Self {
            kind: SourceKind::Tab,
            title: tab.title.clone().unwrap_or_default(),
            url: tab.url.clone(),
            source: SourceRef::Tab {
                tab_id,
                window_id: tab.window_id,
            },
            fav_icon_url: tab.fav_icon_url.clone(),
            last_visit_time: None,
            visit_count: None,
        })
    }

    pub fn from_bookmark(bookmark: &BookmarkNode) -> Option<Self> {
        let url = non_empty(bookmark.url.as_deref())?;
        Some(Self {
            kind: SourceKind::Bookmark,
            title: bookmark.title.clone(),
            url: Some(url.to_string()),
            source: SourceRef::Url(url.to_string()),
            fav_icon_url: None,
            last_visit_time: None,
            visit_count: None,
        })
    }

    pub fn from_history(item: &HistoryItem) -> Option<Self> {
        let url = non_empty(item.url.as_deref())?;
        Some(Self {
            kind: SourceKind::History,
            title: item.title.clone().unwrap_or_default(),
            url: Some(url.to_string()),
            source: SourceRef::Url(url.to_string()),
            fav_icon_url: None,
            last_visit_time: item.last_visit_time,
            visit_count: item.visit_count,
        })
    }

    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Title shown to the user; falls back to the url.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            self.url_or_empty()
        } else {
            &self.title
        }
    }

    pub fn action(&self) -> ResultAction {
        match (&self.source, self.kind) {
            (SourceRef::Tab { tab_id, window_id }, _) => ResultAction::SwitchToTab {
                tab_id: *tab_id,
                window_id: *window_id,
            },
            (SourceRef::Url(url), SourceKind::History) => {
                ResultAction::OpenHistoryItem { url: url.clone() }
            }
            (SourceRef::Url(url), _) => ResultAction::OpenBookmark { url: url.clone() },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub candidate: SearchCandidate,
    /// Text relevance plus the source bias.
    pub relevance: i64,
}

impl RankedResult {
    pub fn group(&self) -> SourceKind {
        self.candidate.kind
    }
}

/// Case-folds a query the same way titles and urls are folded before matching.
pub fn normalize_for_search(input: &str) -> String {
    input.trim().to_lowercase()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
