//! Logging setup for the Jules SDK and its demo.
//!
//! Log records go to a daily-rolling file; records of the transport layer are
//! additionally forwarded into the diagnostic log of the event stream.

pub mod tracing_layer;

use std::path::Path;

use anyhow::{Context, Result};
use jules_application::EventSink;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub use tracing_layer::{DiagnosticLogLayer, TRANSPORT_TARGET};

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "JULES_LOG";
pub const LOG_FILE_PREFIX: &str = "jules.log";

/// Installs the global subscriber.
///
/// `default_level` applies when `JULES_LOG` is unset or invalid. Keep the
/// returned guard alive for the lifetime of the process, or buffered file
/// output is lost.
pub fn init_tracing(
    log_dir: &Path,
    default_level: &str,
    sink: Option<EventSink>,
) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(sink.map(DiagnosticLogLayer::new))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
