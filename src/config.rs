//! Server configuration
//!
//! Configuration is read from an optional YAML file (named by the
//! `WEBROOT_CONFIG` environment variable) and then overridden by the
//! `LISTEN` and `WEB_ROOT` environment variables. Every field has a default,
//! so an empty document is a valid configuration.

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default listen address (1 ounce = 28.35 grams)
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:2835";

/// Default content type for extensions missing from the table
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:2835"
    pub listen_addr: String,

    /// Spawn a task per connection instead of handling them one at a time
    pub concurrent: bool,

    /// Give up on a client that sends no request line within this window
    pub read_timeout_ms: Option<u64>,

    /// How long to drain unread request bytes before closing
    pub linger_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory below which every served file must reside
    pub root: PathBuf,

    /// File served when a request names a directory
    pub index_file: String,

    /// Returned for extensions missing from the table
    pub default_content_type: String,

    /// Extension (without dot) to MIME type, merged over the built-in table
    pub content_types: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            concurrent: false,
            read_timeout_ms: None,
            linger_ms: 500,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./www"),
            index_file: "index.html".to_string(),
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content_types: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from `WEBROOT_CONFIG` (if set) and apply the
    /// `LISTEN` / `WEB_ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("WEBROOT_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml(&text)
                    .with_context(|| format!("invalid config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("WEB_ROOT") {
            cfg.static_files.root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    /// Parse a YAML document. Missing sections and fields keep their defaults.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
