//! Tracing setup: console layer (pretty or JSON) plus an optional JSON-lines file.

use std::path::Path;

use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::cli::FILE_GUARD;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. Console output goes to stderr so stdout
/// carries only command results.
pub fn init(level: &str, json: bool, logging: &bolus_config::Logging) -> eyre::Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };
    layers.push(console);

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
        let appender = match logging.rotation.as_deref().unwrap_or("never") {
            "daily" => tracing_appender::rolling::daily(dir, name),
            "hourly" => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let file_level = logging.level.as_deref().unwrap_or(level);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(file_level))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| eyre::eyre!("init logging: {e}"))
}
