use std::time::Duration;

use quickswitch_core::browser::{SettingsStorage, StorageArea};
use quickswitch_core::heartbeat::{self, HEARTBEAT_KEY};
use quickswitch_core::snapshot_store::SnapshotStore;
use serde_json::json;
use tokio::sync::watch;

#[tokio::test]
async fn beat_writes_timestamp_to_local_area() {
    let store = SnapshotStore::open_memory().unwrap();

    heartbeat::beat(&store, 1_792_324_800_000).await.unwrap();

    assert_eq!(
        store.get(StorageArea::Local, HEARTBEAT_KEY).await.unwrap(),
        Some(json!(1_792_324_800_000_i64))
    );
    assert_eq!(store.get(StorageArea::Sync, HEARTBEAT_KEY).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn run_beats_every_period_until_shutdown() {
    let store = SnapshotStore::open_memory().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let stopper = async {
        tokio::time::sleep(Duration::from_secs(80)).await;
        shutdown_tx.send(true).unwrap();
    };
    let ((), beats) = tokio::join!(
        stopper,
        heartbeat::run(&store, Duration::from_secs(25), shutdown_rx)
    );

    // Beats at 25s, 50s and 75s.
    assert_eq!(beats, 3);
    assert!(store
        .get(StorageArea::Local, HEARTBEAT_KEY)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test(start_paused = true)]
async fn run_stops_when_sender_is_dropped() {
    let store = SnapshotStore::open_memory().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    drop(shutdown_tx);

    let beats = heartbeat::run(&store, Duration::from_secs(25), shutdown_rx).await;
    assert_eq!(beats, 0);
}
