//! SQLite-backed stand-in for the browser runtime, used by the native host
//! binary and by tests that want real storage.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use thiserror::Error;

use crate::browser::{BrowserApi, HistoryQuery, SettingsStorage, SourceError, StorageArea};
use crate::config::Config;
use crate::contract::BackgroundMessage;
use crate::model::{BookmarkNode, HistoryItem, TabInfo};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tab (
    id INTEGER PRIMARY KEY,
    window_id INTEGER NOT NULL,
    title TEXT,
    url TEXT,
    fav_icon_url TEXT,
    active INTEGER NOT NULL DEFAULT 0,
    status TEXT
);
CREATE TABLE IF NOT EXISTS window (
    id INTEGER PRIMARY KEY,
    focused INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS bookmark (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT '',
    url TEXT
);
CREATE TABLE IF NOT EXISTS history (
    id TEXT PRIMARY KEY,
    title TEXT,
    url TEXT,
    last_visit_time REAL,
    visit_count INTEGER
);
CREATE TABLE IF NOT EXISTS kv (
    area TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (area, key)
);
CREATE TABLE IF NOT EXISTS outbox (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    tab_id INTEGER NOT NULL,
    message TEXT NOT NULL
);
";

const TAB_COLUMNS: &str = "id, window_id, title, url, fav_icon_url, active, status";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tab has no id")]
    MissingTabId,
}

pub struct SnapshotStore {
    db: Connection,
}

impl SnapshotStore {
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            // A failure here surfaces as a sqlite open error below.
            let _ = std::fs::create_dir_all(parent);
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_from_config(cfg: &Config) -> Result<Self, StoreError> {
        Self::open(&cfg.snapshot_db_path)
    }

    fn with_connection(db: Connection) -> Result<Self, StoreError> {
        db.execute_batch(SCHEMA)?;
        Ok(Self { db })
    }

    pub fn upsert_tab(&self, tab: &TabInfo) -> Result<(), StoreError> {
        let id = tab.id.ok_or(StoreError::MissingTabId)?;
        self.db.execute(
            "INSERT INTO tab (id, window_id, title, url, fav_icon_url, active, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET window_id=excluded.window_id, title=excluded.title,
                url=excluded.url, fav_icon_url=excluded.fav_icon_url, active=excluded.active,
                status=excluded.status",
            params![id, tab.window_id, tab.title, tab.url, tab.fav_icon_url, tab.active, tab.status],
        )?;
        self.db.execute(
            "INSERT INTO window (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
            params![tab.window_id],
        )?;
        Ok(())
    }

    pub fn remove_tab(&self, tab_id: i64) -> Result<bool, StoreError> {
        Ok(self.db.execute("DELETE FROM tab WHERE id = ?1", params![tab_id])? > 0)
    }

    pub fn get_tab(&self, tab_id: i64) -> Result<Option<TabInfo>, StoreError> {
        let sql = format!("SELECT {TAB_COLUMNS} FROM tab WHERE id = ?1");
        Ok(self.db.query_row(&sql, params![tab_id], tab_from_row).optional()?)
    }

    pub fn list_tabs(&self) -> Result<Vec<TabInfo>, StoreError> {
        let sql = format!("SELECT {TAB_COLUMNS} FROM tab ORDER BY window_id, id");
        let mut stmt = self.db.prepare(&sql)?;
        let tabs = stmt
            .query_map([], tab_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tabs)
    }

    pub fn upsert_bookmark(&self, bookmark: &BookmarkNode) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO bookmark (id, title, url) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET title=excluded.title, url=excluded.url",
            params![bookmark.id, bookmark.title, bookmark.url],
        )?;
        Ok(())
    }

    pub fn upsert_history(&self, item: &HistoryItem) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO history (id, title, url, last_visit_time, visit_count)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET title=excluded.title, url=excluded.url,
                last_visit_time=excluded.last_visit_time, visit_count=excluded.visit_count",
            params![item.id, item.title, item.url, item.last_visit_time, item.visit_count],
        )?;
        Ok(())
    }

    pub fn focused_window(&self) -> Result<Option<i64>, StoreError> {
        Ok(self
            .db
            .query_row("SELECT id FROM window WHERE focused = 1 LIMIT 1", [], |row| row.get(0))
            .optional()?)
    }

    /// Messages delivered to pages, oldest first.
    pub fn outbox(&self) -> Result<Vec<(i64, BackgroundMessage)>, StoreError> {
        let mut stmt = self.db.prepare("SELECT tab_id, message FROM outbox ORDER BY seq")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(tab_id, raw)| Ok((tab_id, serde_json::from_str(&raw)?)))
            .collect()
    }

    fn search_bookmarks_sync(&self, needle: &str) -> Result<Vec<BookmarkNode>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT id, title, url FROM bookmark
             WHERE instr(lower(title), ?1) > 0 OR instr(lower(coalesce(url, '')), ?1) > 0
             ORDER BY rowid",
        )?;
        let bookmarks = stmt
            .query_map(params![needle], |row| {
                Ok(BookmarkNode {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    url: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookmarks)
    }

    fn search_history_sync(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT id, title, url, last_visit_time, visit_count FROM history
             WHERE (instr(lower(coalesce(title, '')), ?1) > 0 OR instr(lower(coalesce(url, '')), ?1) > 0)
               AND coalesce(last_visit_time, 0) >= ?2
             ORDER BY last_visit_time DESC
             LIMIT ?3",
        )?;
        let limit = i64::try_from(query.max_results).unwrap_or(i64::MAX);
        let items = stmt
            .query_map(
                params![query.text.to_lowercase(), query.start_time_ms as f64, limit],
                |row| {
                    Ok(HistoryItem {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        url: row.get(2)?,
                        last_visit_time: row.get(3)?,
                        visit_count: row.get(4)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn active_tab_sync(&self) -> Result<Option<TabInfo>, StoreError> {
        let sql = format!(
            "SELECT {TAB_COLUMNS} FROM tab
             WHERE active = 1
             ORDER BY window_id = coalesce((SELECT id FROM window WHERE focused = 1), -1) DESC, id
             LIMIT 1"
        );
        Ok(self.db.query_row(&sql, [], tab_from_row).optional()?)
    }

    fn activate_tab_sync(&self, tab_id: i64) -> Result<bool, StoreError> {
        let Some(tab) = self.get_tab(tab_id)? else {
            return Ok(false);
        };
        self.db.execute(
            "UPDATE tab SET active = (id = ?1) WHERE window_id = ?2",
            params![tab_id, tab.window_id],
        )?;
        Ok(true)
    }

    fn focus_window_sync(&self, window_id: i64) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO window (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
            params![window_id],
        )?;
        self.db
            .execute("UPDATE window SET focused = (id = ?1)", params![window_id])?;
        Ok(())
    }

    fn create_tab_sync(&self, url: &str) -> Result<i64, StoreError> {
        let window_id = self.focused_window()?.unwrap_or(1);
        let next_id: i64 = self
            .db
            .query_row("SELECT coalesce(max(id), 0) + 1 FROM tab", [], |row| row.get(0))?;
        self.db
            .execute("UPDATE tab SET active = 0 WHERE window_id = ?1", params![window_id])?;
        self.upsert_tab(&TabInfo {
            id: Some(next_id),
            window_id,
            title: None,
            url: Some(url.to_string()),
            fav_icon_url: None,
            active: true,
            status: Some("loading".to_string()),
        })?;
        Ok(next_id)
    }

    fn send_to_tab_sync(&self, tab_id: i64, message: BackgroundMessage) -> Result<bool, StoreError> {
        if self.get_tab(tab_id)?.is_none() {
            return Ok(false);
        }
        self.db.execute(
            "INSERT INTO outbox (tab_id, message) VALUES (?1, ?2)",
            params![tab_id, serde_json::to_string(&message)?],
        )?;
        Ok(true)
    }

    fn get_value(&self, area: StorageArea, key: &str) -> Result<Option<Value>, StoreError> {
        let raw: Option<String> = self
            .db
            .query_row(
                "SELECT value FROM kv WHERE area = ?1 AND key = ?2",
                params![area.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StoreError::from)
    }

    fn set_value(&self, area: StorageArea, key: &str, value: &Value) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO kv (area, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(area, key) DO UPDATE SET value=excluded.value",
            params![area.as_str(), key, serde_json::to_string(value)?],
        )?;
        Ok(())
    }
}

fn tab_from_row(row: &Row<'_>) -> rusqlite::Result<TabInfo> {
    Ok(TabInfo {
        id: row.get(0)?,
        window_id: row.get(1)?,
        title: row.get(2)?,
        url: row.get(3)?,
        fav_icon_url: row.get(4)?,
        active: row.get(5)?,
        status: row.get(6)?,
    })
}

fn api_error(api: &'static str) -> impl FnOnce(StoreError) -> SourceError {
    move |error| SourceError::api(api, error.to_string())
}

impl BrowserApi for SnapshotStore {
    async fn query_tabs(&self) -> Result<Vec<TabInfo>, SourceError> {
        self.list_tabs().map_err(api_error("tabs.query"))
    }

    async fn active_tab(&self) -> Result<Option<TabInfo>, SourceError> {
        self.active_tab_sync().map_err(api_error("tabs.query"))
    }

    async fn search_bookmarks(&self, query: &str) -> Result<Vec<BookmarkNode>, SourceError> {
        self.search_bookmarks_sync(&query.to_lowercase())
            .map_err(api_error("bookmarks.search"))
    }

    async fn search_history(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>, SourceError> {
        self.search_history_sync(query).map_err(api_error("history.search"))
    }

    async fn activate_tab(&self, tab_id: i64) -> Result<(), SourceError> {
        match self.activate_tab_sync(tab_id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(SourceError::api("tabs.update", format!("no tab with id {tab_id}"))),
            Err(error) => Err(api_error("tabs.update")(error)),
        }
    }

    async fn focus_window(&self, window_id: i64) -> Result<(), SourceError> {
        self.focus_window_sync(window_id).map_err(api_error("windows.update"))
    }

    async fn create_tab(&self, url: &str) -> Result<(), SourceError> {
        self.create_tab_sync(url)
            .map(|_| ())
            .map_err(api_error("tabs.create"))
    }

    async fn send_to_tab(&self, tab_id: i64, message: BackgroundMessage) -> Result<(), SourceError> {
        match self.send_to_tab_sync(tab_id, message) {
            Ok(true) => Ok(()),
            Ok(false) => Err(SourceError::NoReceiver(tab_id)),
            Err(error) => Err(api_error("tabs.sendMessage")(error)),
        }
    }
}

impl SettingsStorage for SnapshotStore {
    async fn get(&self, area: StorageArea, key: &str) -> Result<Option<Value>, SourceError> {
        self.get_value(area, key).map_err(api_error("storage.get"))
    }

    async fn set(&self, area: StorageArea, key: &str, value: Value) -> Result<(), SourceError> {
        self.set_value(area, key, &value).map_err(api_error("storage.set"))
    }
}
