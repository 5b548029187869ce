//! Configuration loading
//!
//! Config file search order:
//! 1. Path in `CASE_ORACLE_CONFIG` environment variable
//! 2. `./case-oracle.toml` (current directory)
//! 3. `./config/case-oracle.toml` (config subdirectory)
//! 4. `~/.config/case-oracle/config.toml` (user config directory)
//!
//! Environment variables override config file values; command-line flags
//! override both.

use std::{
    env,
    fs,
    io,
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use tracing::{
    debug,
    info,
};

use crate::oracle::EvalSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{name}={value} is not a valid {expected}")]
    Env {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("invalid log filter `{filter}`: {message}")]
    LogFilter { filter: String, message: String },
    #[error("failed to open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    pub oracle: EvalConfig,
    pub logging: LoggingConfig,
}

/// Evaluation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Per-call deadline in milliseconds; no deadline when absent
    pub timeout_ms: Option<u64>,
    /// Stack size in bytes for isolated evaluation threads
    pub stack_size: Option<usize>,
    /// Worker threads used by the runner
    pub threads: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            stack_size: None,
            threads: 1,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directives: trace, debug, info, warn, error or `target=level` lists
    pub level: String,
    /// Optional JSON log file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl OracleConfig {
    /// Load from the first config file found, then apply environment overrides.
    ///
    /// A missing file means defaults; a file that exists but does not parse is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::search_paths().into_iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Get list of paths to search for a config file
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = env::var("CASE_ORACLE_CONFIG") {
            paths.push(PathBuf::from(path));
        }
        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join("case-oracle.toml"));
            paths.push(cwd.join("config").join("case-oracle.toml"));
        }
        if let Some(home) = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("case-oracle")
                    .join("config.toml"),
            );
        }
        paths
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Apply `CASE_TIMEOUT_MS`, `CASE_THREADS` and `LOG_LEVEL` as read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("CASE_TIMEOUT_MS") {
            self.oracle.timeout_ms = Some(parse_env("CASE_TIMEOUT_MS", value, "duration in ms")?);
        }
        if let Some(value) = lookup("CASE_THREADS") {
            self.oracle.threads = parse_env("CASE_THREADS", value, "thread count")?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn eval_settings(&self) -> EvalSettings {
        EvalSettings {
            timeout: self.oracle.timeout_ms.map(Duration::from_millis),
            stack_size: self.oracle.stack_size,
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    name: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        name,
        value,
        expected,
    })
}
