//! Transport configuration types.

use serde::{Deserialize, Serialize};

use crate::core::config::env_flag;

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Origins allowed to call the API. `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            enable_cors: default_cors(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl HttpConfig {
    /// Create an HTTP config bound to the given address.
    pub fn new(port: u16, host: impl Into<String>) -> Self {
        Self {
            port,
            host: host.into(),
            ..Default::default()
        }
    }

    /// Load HTTP config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("FILE_PICKER_HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let host = std::env::var("FILE_PICKER_HTTP_HOST").unwrap_or_else(|_| default_host());
        let enable_cors = env_flag("FILE_PICKER_CORS", default_cors());
        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| default_cors_origins());

        Self {
            port,
            host,
            enable_cors,
            cors_origins,
        }
    }

    /// The `host:port` string to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        let cors = if !self.enable_cors {
            "disabled".to_string()
        } else if self.allows_any_origin() {
            "any origin".to_string()
        } else {
            self.cors_origins.join(", ")
        };
        format!("HTTP on {} (CORS: {})", self.address(), cors)
    }
}

/// Split a comma-separated origin list, dropping blanks.
///
/// An empty result falls back to `*`.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        default_cors_origins()
    } else {
        origins
    }
}
