//! Tracing subscriber setup: human-readable stderr plus an optional file sink

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type LayeredEnvFilter = Layered<EnvFilter, Registry>;
type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Install the global subscriber described by `options`.
///
/// Terminal output goes to stderr so JSON printed on stdout stays machine-readable.
/// When a subscriber is already installed this is a no-op.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let level = std::env::var("SMARTQR_LOG_LEVEL").unwrap_or_else(|_| options.level.clone());
    let env_filter = EnvFilter::try_new(level.as_str())
        .map_err(|e| Error::Config(format!("Invalid log level '{level}': {e}")))?;

    let file = match &options.file {
        Some(path) => Some(file_layer::<LayeredEnvFilter>(path, options.rotation)?),
        None => None,
    };

    Registry::default()
        .with(env_filter)
        .with(file)
        .with(stderr_layer::<_>(options.color))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn rotation(policy: Option<LogRotation>) -> Rotation {
    match policy {
        Some(LogRotation::Hourly) => Rotation::HOURLY,
        Some(LogRotation::Daily) => Rotation::DAILY,
        None => Rotation::NEVER,
    }
}

/// Non-blocking plain-text sink writing to `path`, rolled per `policy`.
fn file_layer<S>(path: &Path, policy: Option<LogRotation>) -> Result<BoxedLayer<S>>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
        return Err(Error::Config(format!(
            "Log file path '{}' has no file name",
            path.display()
        )));
    };

    // With Rotation::NEVER the prefix is used as the whole file name.
    let appender = RollingFileAppender::builder()
        .rotation(rotation(policy))
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| Error::Config(format!("Cannot open log file {}: {e}", path.display())))?;

    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(appender);
    let _ = FILE_GUARD.set(guard);

    let layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false)
        .with_writer(writer)
        .with_target(true)
        .boxed();
    Ok(layer)
}

fn stderr_layer<S>(color: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(true)
        .boxed()
}
