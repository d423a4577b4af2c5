use std::path::Path;

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Initializes logging to both stderr (for the operator watching the
/// process) and a rotating-per-process file under `<root>/logs/`, created
/// lazily. The returned guard must be kept alive for the duration of the
/// process - dropping it stops the non-blocking file writer from flushing.
pub fn init(root: &Path) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = root.join("logs");
    std::fs::create_dir_all(&logs_dir)?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = logs_dir.join(format!("mcp_server_{timestamp}.log"));
    let log_file = std::fs::File::create(&log_path)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
