//! Configuration loaded from `~/.config/rinsefm/config.toml`.
//!
//! Every section and key is optional; a missing file yields the defaults.
//!
//! ```toml
//! [http]
//! user_agent = "rinsefm/0.1"
//! connect_timeout_secs = 10
//! timeout_secs = 30
//! max_redirects = 10
//!
//! [scanner]
//! chunk_size = 1000
//!
//! [probe]
//! dead_links = "error"   # or "fallback"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::nextdata::DEFAULT_CHUNK_SIZE;
use crate::site::DeadLinkPolicy;

/// HTTP transport settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("rinsefm/{}", crate::VERSION),
            connect_timeout_secs: 10,
            timeout_secs: 30,
            max_redirects: 10,
        }
    }
}

/// Payload scanner settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Characters decoded per tokenizer feed.
    pub chunk_size: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Format probe settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub dead_links: DeadLinkPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub scanner: ScannerConfig,
    pub probe: ProbeConfig,
}

impl Config {
    /// Load from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config: Self =
            toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))?;

        if config.scanner.chunk_size == 0 {
            anyhow::bail!("scanner.chunk_size must be positive in {}", path.display());
        }
        Ok(config)
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rinsefm")
        .join("config.toml")
}
