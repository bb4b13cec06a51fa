use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "quickswitch.log";

/// Keeps the background log writer alive; logs are flushed on drop.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

/// Installs the global subscriber: compact lines on stderr plus a daily file
/// under [`logs_dir`]. `RUST_LOG` overrides `default_level`.
///
/// stdout is left alone; the native host uses it for responses.
pub fn init(default_level: &str) -> LoggingGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let dir = logs_dir();
    let (file_layer, file_guard) = match fs::create_dir_all(&dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        Err(error) => {
            eprintln!("[quickswitch-core] failed to create log dir {}: {error}", dir.display());
            (None, None)
        }
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    if installed.is_ok() {
        tracing::info!(event = "logging_initialized", logs_dir = %dir.display());
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}
