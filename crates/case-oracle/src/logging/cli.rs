use std::fs;

use tracing::info;
use tracing_subscriber::{
    EnvFilter,
    Layer,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::{
    install_panic_hook,
    tracing_utils::FlushingWriter,
};
use crate::config::{
    ConfigError,
    LoggingConfig,
};

/// Install the global subscriber for a command-line run.
///
/// Human-readable events go to stderr so stdout stays free for the report.
/// With `logging.file` set, the same events are also written there as JSON lines.
pub fn init_cli_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|err| ConfigError::LogFilter {
            filter: config.level.clone(),
            message: err.to_string(),
        })?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true)
        .compact();

    let file_layer = match &config.file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(|source| ConfigError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            }
            let file = fs::File::create(path).map_err(|source| ConfigError::LogFile {
                path: path.clone(),
                source,
            })?;
            let writer = FlushingWriter::new(file);
            Some(
                fmt::layer()
                    .with_writer(move || writer.clone())
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .boxed(),
            )
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| ConfigError::Subscriber(err.to_string()))?;

    install_panic_hook();
    info!(level = %config.level, file = ?config.file, "tracing initialized");
    Ok(())
}
