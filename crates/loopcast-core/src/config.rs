//! Application configuration types.
//!
//! The top-level [`Config`] is deserialized from TOML and carries all
//! sub-configs for the HTTP server, the stream window, the origin client,
//! and the database. Every section defaults sensibly so an empty file is
//! valid. File loading lives in the binary crate; this module only defines
//! the shape and validation.

use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub origin: OriginConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Deployment-time streaming parameters, fixed per channel service
/// rather than per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Trailing duration of content visible to a client, in seconds.
    pub sliding_window_secs: u32,

    /// Optional CDN base URL. When set, segment URLs are rewritten to
    /// `{cdn_base_url}{origin path}`; when unset, clients fetch segments
    /// straight from the origin.
    pub cdn_base_url: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sliding_window_secs: 30,
            cdn_base_url: None,
        }
    }
}

impl StreamConfig {
    /// Sliding window in engine units.
    pub fn sliding_window_ms(&self) -> i64 {
        i64::from(self.sliding_window_secs) * 1000
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Per-request timeout for origin manifest fetches, in seconds.
    pub timeout_secs: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./loopcast.db".to_string(),
        }
    }
}

impl Config {
    /// Return a list of fatal validation problems.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.server.port == 0 {
            problems.push("server.port cannot be 0".to_string());
        }
        if self.stream.sliding_window_secs == 0 {
            problems.push("stream.sliding_window_secs must be positive".to_string());
        }
        if self.origin.timeout_secs == 0 {
            problems.push("origin.timeout_secs must be positive".to_string());
        }
        if let Some(ref cdn) = self.stream.cdn_base_url {
            if !cdn.starts_with("http://") && !cdn.starts_with("https://") {
                problems.push(format!("stream.cdn_base_url is not an HTTP URL: {cdn}"));
            }
        }

        problems
    }
}
