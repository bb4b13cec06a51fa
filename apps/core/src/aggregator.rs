use thiserror::Error;

use crate::browser::{BrowserApi, HistoryQuery, SettingsStorage, SourceError};
use crate::config::Config;
use crate::contract::{BackgroundMessage, PageRequest, PortMessage, SearchResponse};
use crate::hotkey::chords_match;
use crate::model::{normalize_for_search, TabInfo};
use crate::settings::{self, Settings, SettingsError};

/// Browser command that opens the overlay in the active tab.
pub const OPEN_SEARCH_COMMAND: &str = "open-search";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorOptions {
    pub history_window_days: u32,
    pub history_max_results: usize,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            history_window_days: 30,
            history_max_results: 30,
        }
    }
}

impl From<&Config> for AggregatorOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            history_window_days: cfg.history_window_days,
            history_max_results: cfg.history_max_results,
        }
    }
}

/// Tab lifecycle notifications that may invalidate the tab cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    Created,
    Removed,
    Updated {
        status: Option<String>,
        url: Option<String>,
    },
}

impl TabEvent {
    fn requires_refresh(&self) -> bool {
        match self {
            Self::Created | Self::Removed => true,
            Self::Updated { status, url } => status.as_deref() == Some("complete") && url.is_some(),
        }
    }
}

/// Background-context state: the tab cache and the current settings. Each
/// search is otherwise independent.
pub struct Aggregator<B> {
    browser: B,
    options: AggregatorOptions,
    tabs: Vec<TabInfo>,
    settings: Settings,
}

impl<B> Aggregator<B>
where
    B: BrowserApi + SettingsStorage,
{
    pub fn new(browser: B, options: AggregatorOptions) -> Self {
        Self {
            browser,
            options,
            tabs: Vec::new(),
            settings: Settings::default(),
        }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cached_tabs(&self) -> &[TabInfo] {
        &self.tabs
    }

    /// Primes the tab cache and loads settings.
    pub async fn start(&mut self) {
        self.refresh_tabs().await;
        self.settings = settings::load_or_default(&self.browser).await;
        tracing::info!(
            event = "aggregator_started",
            cached_tabs = self.tabs.len(),
            shortcut = %self.settings.shortcut,
        );
    }

    /// Full re-list of open tabs. On failure the previous cache is kept.
    pub async fn refresh_tabs(&mut self) -> usize {
        match self.browser.query_tabs().await {
            Ok(tabs) => {
                self.tabs = tabs;
                tracing::debug!(event = "tab_cache_refreshed", cached_tabs = self.tabs.len());
            }
            Err(error) => {
                tracing::warn!(event = "tab_cache_refresh_failed", %error);
            }
        }
        self.tabs.len()
    }

    pub async fn on_tab_event(&mut self, event: TabEvent) -> bool {
        if !event.requires_refresh() {
            return false;
        }
        self.refresh_tabs().await;
        true
    }

    /// Cached tabs whose title or url contains the query, case-insensitively.
    pub fn matching_tabs(&self, query: &str) -> Vec<TabInfo> {
        let needle = normalize_for_search(query);
        self.tabs
            .iter()
            .filter(|tab| {
                let title_match = tab
                    .title
                    .as_deref()
                    .is_some_and(|title| title.to_lowercase().contains(&needle));
                let url_match = tab
                    .url
                    .as_deref()
                    .is_some_and(|url| url.to_lowercase().contains(&needle));
                title_match || url_match
            })
            .cloned()
            .collect()
    }

    pub fn history_query(&self, query: &str, now_ms: i64) -> HistoryQuery {
        HistoryQuery {
            text: query.to_string(),
            max_results: self.options.history_max_results,
            start_time_ms: now_ms - i64::from(self.options.history_window_days) * MILLIS_PER_DAY,
        }
    }

    pub async fn search(&self, query: &str) -> SearchResponse {
        self.search_at(query, chrono::Utc::now().timestamp_millis()).await
    }

    /// Runs the three source lookups concurrently and answers once all have
    /// finished. A failed source contributes an empty list.
    pub async fn search_at(&self, query: &str, now_ms: i64) -> SearchResponse {
        let needle = normalize_for_search(query);
        if needle.is_empty() {
            return SearchResponse::default();
        }

        let history_query = self.history_query(&needle, now_ms);
        let (tabs, bookmarks, history) = tokio::join!(
            async { Ok::<_, SourceError>(self.matching_tabs(&needle)) },
            self.browser.search_bookmarks(&needle),
            self.browser.search_history(&history_query),
        );

        let response = SearchResponse {
            tabs: degrade("tabs", tabs),
            bookmarks: degrade("bookmarks", bookmarks),
            history: degrade("history", history),
        };
        tracing::debug!(
            event = "search_completed",
            tabs = response.tabs.len(),
            bookmarks = response.bookmarks.len(),
            history = response.history.len(),
        );
        response
    }

    /// Handles one page request. Only `search` produces a response body.
    pub async fn handle_request(
        &mut self,
        request: PageRequest,
    ) -> Result<Option<SearchResponse>, ServiceError> {
        match request {
            PageRequest::Search { query } => Ok(Some(self.search(&query).await)),
            PageRequest::SwitchToTab { tab_id, window_id } => {
                self.switch_to_tab(tab_id, window_id).await;
                Ok(None)
            }
            PageRequest::OpenBookmark { url } | PageRequest::OpenHistoryItem { url } => {
                let url = url.trim();
                if url.is_empty() {
                    return Err(ServiceError::InvalidRequest("url is required".to_string()));
                }
                self.open_url(url).await;
                Ok(None)
            }
            PageRequest::SettingsUpdated => {
                self.reload_settings().await?;
                Ok(None)
            }
        }
    }

    pub async fn switch_to_tab(&self, tab_id: i64, window_id: i64) {
        if let Err(error) = self.browser.activate_tab(tab_id).await {
            tracing::warn!(event = "activate_tab_failed", tab_id, %error);
        }
        if let Err(error) = self.browser.focus_window(window_id).await {
            tracing::warn!(event = "focus_window_failed", window_id, %error);
        }
    }

    pub async fn open_url(&self, url: &str) {
        if let Err(error) = self.browser.create_tab(url).await {
            tracing::warn!(event = "create_tab_failed", url, %error);
        }
    }

    pub async fn reload_settings(&mut self) -> Result<&Settings, ServiceError> {
        self.settings = settings::load(&self.browser).await?;
        tracing::info!(event = "settings_reloaded", shortcut = %self.settings.shortcut);
        Ok(&self.settings)
    }

    /// Global browser command. Returns whether a page was told to open the overlay.
    pub async fn on_command(&self, command: &str) -> bool {
        if command != OPEN_SEARCH_COMMAND {
            return false;
        }

        let tab_id = match self.browser.active_tab().await {
            Ok(Some(TabInfo { id: Some(id), .. })) => id,
            Ok(_) => return false,
            Err(error) => {
                tracing::warn!(event = "active_tab_lookup_failed", %error);
                return false;
            }
        };
        self.open_overlay_in(tab_id).await
    }

    /// Message from a page's shortcut channel.
    pub async fn on_port_message(&self, tab_id: i64, message: PortMessage) -> bool {
        match message {
            PortMessage::Keydown { shortcut } => {
                if !chords_match(&shortcut, &self.settings.shortcut) {
                    return false;
                }
                self.open_overlay_in(tab_id).await
            }
        }
    }

    async fn open_overlay_in(&self, tab_id: i64) -> bool {
        match self.browser.send_to_tab(tab_id, BackgroundMessage::OpenSearch).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(event = "open_search_send_failed", tab_id, %error);
                false
            }
        }
    }
}

fn degrade<T>(source: &'static str, result: Result<Vec<T>, SourceError>) -> Vec<T> {
    result.unwrap_or_else(|error| {
        tracing::warn!(event = "source_lookup_failed", source, %error);
        Vec::new()
    })
}
