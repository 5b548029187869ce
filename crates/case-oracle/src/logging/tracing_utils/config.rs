//! Configuration for test tracing

use std::{
    env,
    path::PathBuf,
};

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use super::path::get_target_dir;
use crate::logging::PanicConfig;

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|v| {
        v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
    })
}

/// Configuration for test tracing
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Directory where log files are stored
    pub log_dir: PathBuf,
    pub stdout_level: Level,
    pub file_level: Level,
    pub log_to_stdout: bool,
    pub log_to_file: bool,
    /// Filter directives overriding the levels, e.g. `case_oracle::oracle=trace`
    pub filter_directives: Option<String>,
    pub span_events: FmtSpan,
    pub panic: PanicConfig,
    /// Keep log files even when tests pass
    pub keep_success_logs: bool,
}

impl Default for TracingConfig {
    /// Defaults with `LOG_STDOUT`, `LOG_FILTER` and `KEEP_SUCCESS_LOGS` applied.
    fn default() -> Self {
        Self {
            log_dir: get_target_dir().join("test-logs"),
            stdout_level: Level::DEBUG,
            file_level: Level::TRACE,
            log_to_stdout: env_flag("LOG_STDOUT").unwrap_or(false),
            log_to_file: true,
            filter_directives: env::var("LOG_FILTER").ok(),
            span_events: FmtSpan::CLOSE,
            panic: PanicConfig::default(),
            keep_success_logs: env_flag("KEEP_SUCCESS_LOGS").unwrap_or(false),
        }
    }
}

impl TracingConfig {
    pub fn with_level(
        mut self,
        level: Level,
    ) -> Self {
        self.stdout_level = level;
        self.file_level = level;
        self
    }

    /// Example: `"case_oracle::registry=debug,string_cases=trace"`
    pub fn with_filter(
        mut self,
        filter: impl Into<String>,
    ) -> Self {
        self.filter_directives = Some(filter.into());
        self
    }

    pub fn stdout(
        mut self,
        enabled: bool,
    ) -> Self {
        self.log_to_stdout = enabled;
        self
    }

    pub fn file(
        mut self,
        enabled: bool,
    ) -> Self {
        self.log_to_file = enabled;
        self
    }

    pub fn log_dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn keep_logs(
        mut self,
        keep: bool,
    ) -> Self {
        self.keep_success_logs = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_sets_fields() {
        let config = TracingConfig::default()
            .with_level(Level::TRACE)
            .with_filter("case_oracle=trace")
            .stdout(false)
            .file(true)
            .log_dir("custom/logs");

        assert_eq!(config.stdout_level, Level::TRACE);
        assert_eq!(config.file_level, Level::TRACE);
        assert_eq!(
            config.filter_directives,
            Some("case_oracle=trace".to_string())
        );
        assert!(!config.log_to_stdout);
        assert!(config.log_to_file);
        assert_eq!(config.log_dir, PathBuf::from("custom/logs"));
    }
}
