//! File-based logging.
//!
//! The terminal belongs to the timer display, so log lines go to
//! `~/.config/tower-timer/tower-timer.log` (or platform equivalent).
//! Set `TOWER_TIMER_LOG` to an `EnvFilter` directive, e.g. `debug`, to change
//! the level.

use crate::utils::APP_NAME;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "TOWER_TIMER_LOG";

/// Install the global subscriber.
///
/// Returns a `WorkerGuard` that must be held until exit so buffered lines
/// are flushed. Returns `None` with logging disabled when the log file
/// cannot be created.
pub fn init() -> Option<WorkerGuard> {
    let Some(log_dir) = dirs::config_dir().map(|config| config.join(APP_NAME)) else {
        eprintln!("No config directory found, logging disabled");
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Can't use tracing yet since subscriber not initialized
        eprintln!("Failed to create log directory {:?}: {}, logging disabled", log_dir, e);
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(format!("{}.log", APP_NAME))
        .build(&log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file in {:?}: {}, logging disabled", log_dir, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Some(guard)
}
