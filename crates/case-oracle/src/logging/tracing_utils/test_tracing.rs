//! Per-test tracing guard

use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use tracing::Dispatch;
use tracing_subscriber::{
    EnvFilter,
    Layer,
    layer::SubscriberExt,
};

use super::{
    config::TracingConfig,
    writers::FlushingWriter,
};
use crate::logging::install_panic_hook_with;

/// Guard that handles test logging lifecycle
///
/// Holds a dispatcher that is the thread's default for the lifetime of the
/// test. Dropping it without a panic deletes the log file unless
/// `keep_success_logs` is set.
pub struct TestTracing {
    log_file_path: Option<PathBuf>,
    keep_success_logs: bool,
    _dispatcher: Dispatch,
    _guard: tracing::dispatcher::DefaultGuard,
}

impl TestTracing {
    pub fn init(test_name: &str) -> Self {
        Self::init_with_config(test_name, TracingConfig::default())
    }

    pub fn init_with_config(
        test_name: &str,
        config: TracingConfig,
    ) -> Self {
        install_panic_hook_with(config.panic.clone());

        let filter = |level: tracing::Level| {
            config
                .filter_directives
                .as_deref()
                .and_then(|directives| EnvFilter::try_new(directives).ok())
                .unwrap_or_else(|| EnvFilter::new(level.as_str()))
        };

        // A log file that cannot be created only costs the file layer
        let log_file = config
            .log_to_file
            .then(|| {
                fs::create_dir_all(&config.log_dir).ok()?;
                let path = config.log_dir.join(format!("{}.log", test_name));
                let file = fs::File::create(&path).ok()?;
                Some((path, FlushingWriter::new(file)))
            })
            .flatten();

        let stdout_layer = config.log_to_stdout.then(|| {
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_span_events(config.span_events.clone())
                .with_target(false)
                .compact()
                .with_filter(filter(config.stdout_level))
        });

        let file_layer = log_file.as_ref().map(|(_, writer)| {
            let writer = writer.clone();
            tracing_subscriber::fmt::layer()
                .with_writer(move || writer.clone())
                .with_span_events(config.span_events.clone())
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(filter(config.file_level))
        });

        let dispatcher = Dispatch::new(
            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(file_layer),
        );
        let guard = tracing::dispatcher::set_default(&dispatcher);
        let log_file_path = log_file.map(|(path, _)| path);

        tracing::info!(
            test_name = %test_name,
            log_file = ?log_file_path,
            "Test tracing initialized"
        );

        Self {
            log_file_path,
            keep_success_logs: config.keep_success_logs,
            _dispatcher: dispatcher,
            _guard: guard,
        }
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }
}

impl Drop for TestTracing {
    fn drop(&mut self) {
        let Some(path) = &self.log_file_path else {
            return;
        };
        if std::thread::panicking() {
            eprintln!("\nTest failed! Log file preserved at: {}", path.display());
        } else if self.keep_success_logs {
            eprintln!("\nTest passed! Log file kept at: {}", path.display());
        } else {
            fs::remove_file(path).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config(dir: &Path) -> TracingConfig {
        TracingConfig::default()
            .log_dir(dir)
            .stdout(false)
            .with_filter("trace")
    }

    #[test]
    fn passing_test_log_is_removed() {
        let dir = TempDir::new().unwrap();
        let guard = TestTracing::init_with_config(
            "passing_test_log_is_removed",
            config(dir.path()).keep_logs(false),
        );
        let path = guard.log_file().unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("passing_test_log_is_removed.log"));

        tracing::info!("written through the guard");
        let logged = fs::read_to_string(&path).unwrap();
        assert!(logged.contains("written through the guard"), "{}", logged);

        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn kept_log_outlives_the_guard() {
        let dir = TempDir::new().unwrap();
        let guard = TestTracing::init_with_config(
            "kept_log_outlives_the_guard",
            config(dir.path()).keep_logs(true),
        );
        let path = guard.log_file().unwrap().to_path_buf();
        drop(guard);
        assert!(path.exists());
    }

    #[test]
    fn no_log_file_when_file_logging_is_off() {
        let dir = TempDir::new().unwrap();
        let guard = TestTracing::init_with_config(
            "no_log_file_when_file_logging_is_off",
            config(dir.path()).file(false),
        );
        assert_eq!(guard.log_file(), None);
    }
}
