use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::browser::{SettingsStorage, SourceError, StorageArea};

pub const HEARTBEAT_KEY: &str = "heartbeat";

pub async fn beat<S: SettingsStorage>(storage: &S, now_ms: i64) -> Result<(), SourceError> {
    storage.set(StorageArea::Local, HEARTBEAT_KEY, json!(now_ms)).await
}

/// Writes a timestamp to local storage every `period` until `shutdown` flips to
/// true or its sender is dropped. Returns the number of beats written.
pub async fn run<S: SettingsStorage>(
    storage: &S,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut beats = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                match beat(storage, now_ms).await {
                    Ok(()) => beats += 1,
                    Err(error) => tracing::warn!(event = "heartbeat_failed", %error),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return beats;
                }
            }
        }
    }
}
