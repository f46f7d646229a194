//! tracing subscriber setup: console layer on stderr plus optional file tee.

use std::path::Path;

use eyre::{Result, WrapErr};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. `RUST_LOG` wins over `level`.
///
/// The returned guard flushes the file writer when dropped; hold it until exit.
pub fn init(
    json: bool,
    level: &str,
    logging: &valve_config::Logging,
) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(level)
            .wrap_err_with(|| format!("invalid log level {level:?}"))?,
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    });
    let mut guard = None;
    if let Some(path) = &logging.file {
        let (layer, g) = file_layer(Path::new(path), logging.rotation.as_deref())?;
        layers.push(layer);
        guard = Some(g);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(guard)
}

fn file_layer(path: &Path, rotation: Option<&str>) -> Result<(BoxedLayer, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("logging.file has no file name: {}", path.display()))?;
    let appender = match rotation.map(str::to_ascii_lowercase).as_deref() {
        Some("daily") => tracing_appender::rolling::daily(dir, name),
        Some("hourly") => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .boxed();
    Ok((layer, guard))
}
