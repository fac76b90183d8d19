//! Configuration management for the file picker service.
//!
//! Values are read once at startup from environment variables, with a `.env`
//! file in the working directory loaded first if present. Nothing is re-read
//! afterwards.

use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Files directory configuration.
    pub files: FilesConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub http: HttpConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the served directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Directory whose direct children are listed and served.
    pub directory: PathBuf,

    /// Create the directory at startup when it does not exist.
    pub create_if_missing: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./files"),
            create_if_missing: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "file-picker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            files: FilesConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// `FILES_DIRECTORY` and `CORS_ORIGINS` keep their historical names;
    /// everything else is prefixed with `FILE_PICKER_`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("FILE_PICKER_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("FILE_PICKER_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(directory) = std::env::var("FILES_DIRECTORY") {
            if !directory.trim().is_empty() {
                config.files.directory = PathBuf::from(directory);
            }
        }

        config.files.create_if_missing =
            env_flag("FILES_CREATE_DIRECTORY", config.files.create_if_missing);

        config.http = HttpConfig::from_env();

        config
    }
}

/// Read a boolean flag; anything other than `false`/`0`/`no`/`off` counts as true.
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => !matches!(
            value.trim().to_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        ),
        Err(_) => default,
    }
}
