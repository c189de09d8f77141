//! Server configuration from environment variables.
//!
//! | Variable         | Default                          |
//! |------------------|----------------------------------|
//! | `TODO_DB_PATH`   | `<tmp>/todo_tracker.sqlite3`     |
//! | `HOST`           | `0.0.0.0`                        |
//! | `PORT`           | `8000`                           |
//! | `TODO_LOG_LEVEL` | `debug` (debug) / `info` (release) |
//! | `TODO_LOG_DIR`   | `<tmp>/todo_tracker_logs`        |
//!
//! Blank values count as unset.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use todo_core::logging::{default_log_level, normalize_level};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_FILE_NAME: &str = "todo_tracker.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "todo_tracker_logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidHost(String),
    InvalidPort(String),
    InvalidLogLevel(String),
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHost(value) => write!(f, "HOST `{value}` is not an IP address"),
            Self::InvalidPort(value) => write!(f, "PORT `{value}` is not a valid port number"),
            Self::InvalidLogLevel(message) => write!(f, "TODO_LOG_LEVEL: {message}"),
            Self::RelativeLogDir(value) => {
                write!(f, "TODO_LOG_DIR must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns a variable's raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let db_path = value("TODO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let host = match value("HOST") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match value("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let log_level = match value("TODO_LOG_LEVEL") {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = match value("TODO_LOG_DIR") {
            Some(raw) => {
                let path = PathBuf::from(&raw);
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(raw));
                }
                path
            }
            None => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            db_path,
            host,
            port,
            log_level,
            log_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
