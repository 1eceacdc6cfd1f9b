use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::server::listener::DEFAULT_BACKLOG;

/// Names the YAML file to load settings from.
pub const CONFIG_ENV: &str = "WEBVIEWER_CONFIG";
pub const PORT_ENV: &str = "WEBVIEWER_PORT";
pub const ROOT_ENV: &str = "WEBVIEWER_ROOT";

/// Server settings. The host is not configurable: the server only ever
/// listens on 127.0.0.1.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    /// Project directory to serve
    pub root: PathBuf,
    pub backlog: u32,
    pub read_buffer_size: usize,
    /// Watch the project root and rescan on change
    pub watch: bool,
    /// Quiet period after a change before rescanning
    pub watch_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            root: PathBuf::from("."),
            backlog: DEFAULT_BACKLOG,
            read_buffer_size: 8192,
            watch: true,
            watch_debounce_ms: 100,
        }
    }
}

impl Config {
    /// Loads the YAML file named by `WEBVIEWER_CONFIG` (if set), then applies
    /// `WEBVIEWER_PORT` and `WEBVIEWER_ROOT` on top.
    pub fn load() -> anyhow::Result<Self> {
        let base = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path))?;
                Self::from_yaml(&text).with_context(|| format!("Invalid config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Parses a YAML document. Missing fields take their defaults.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies the port and root overrides found through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid port: {:?}", PORT_ENV, port))?;
        }
        if let Some(root) = lookup(ROOT_ENV) {
            self.root = PathBuf::from(root);
        }
        Ok(self)
    }

    /// Debounce for the directory watcher, or `None` when watching is off.
    pub fn watch_debounce(&self) -> Option<Duration> {
        self.watch.then(|| Duration::from_millis(self.watch_debounce_ms))
    }
}
