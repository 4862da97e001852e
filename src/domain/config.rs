//! Application configuration models.
//!
//! Loaded from TOML; every field has a default so a missing file or a
//! partial file both work.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

/// Locations of persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` database holding the joke tables.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// JSON record holding the rotation cursor.
    #[serde(default = "default_cursor_path")]
    pub cursor_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            cursor_path: default_cursor_path(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./jokes.db")
}

fn default_cursor_path() -> PathBuf {
    PathBuf::from("./counter.json")
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage locations.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Default configuration file name, resolved against the working directory.
    pub const DEFAULT_FILE: &'static str = "joke-rotator.toml";

    /// Address string for the HTTP listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
