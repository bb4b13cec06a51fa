use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use crate::aggregator::{Aggregator, AggregatorOptions};
use crate::browser::{BrowserApi, SettingsStorage};
use crate::config::{self, ConfigError};
use crate::heartbeat;
use crate::snapshot_store::{SnapshotStore, StoreError};
use crate::transport;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--snapshot" => {
                let value = iter.next().ok_or("--snapshot requires a path")?;
                options.snapshot_path = Some(PathBuf::from(value));
            }
            other => {
                if let Some(value) = other.strip_prefix("--config=") {
                    options.config_path = Some(PathBuf::from(value));
                } else if let Some(value) = other.strip_prefix("--snapshot=") {
                    options.snapshot_path = Some(PathBuf::from(value));
                } else {
                    return Err(format!("unknown argument: {other}"));
                }
            }
        }
    }

    Ok(options)
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_host(options))
}

async fn run_host(options: CliOptions) -> Result<(), RuntimeError> {
    let mut cfg = config::load(options.config_path.as_deref())?;
    if let Some(snapshot_path) = options.snapshot_path {
        cfg.snapshot_db_path = snapshot_path;
    }
    tracing::info!(
        event = "startup",
        config_path = %cfg.config_path.display(),
        snapshot_db_path = %cfg.snapshot_db_path.display(),
        history_window_days = cfg.history_window_days,
        history_max_results = cfg.history_max_results,
    );

    let store = SnapshotStore::open_from_config(&cfg)?;
    // Separate connection so the heartbeat can write while requests are served.
    let heartbeat_store = SnapshotStore::open_from_config(&cfg)?;

    let mut aggregator = Aggregator::new(store, AggregatorOptions::from(&cfg));
    aggregator.start().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let period = Duration::from_secs(cfg.heartbeat_interval_secs);

    let serving = async {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        let served = serve(&mut aggregator, stdin, stdout).await;
        let _ = shutdown_tx.send(true);
        served
    };
    let (served, beats) = tokio::join!(serving, heartbeat::run(&heartbeat_store, period, shutdown_rx));

    let handled = served?;
    tracing::info!(event = "shutdown", handled_requests = handled, heartbeats = beats);
    Ok(())
}

/// Answers one JSON envelope per non-blank input line until the reader hits
/// EOF. Returns the number of requests handled.
pub async fn serve<B, R, W>(
    aggregator: &mut Aggregator<B>,
    reader: R,
    mut writer: W,
) -> Result<usize, std::io::Error>
where
    B: BrowserApi + SettingsStorage,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }

        let response = transport::handle_json(aggregator, payload).await;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}
