// ABOUTME: Optional TOML configuration for the known_hosts location and interactive UI timing
// ABOUTME: Every setting has a default so a missing file is never an error

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ssh: SshConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SshConfig {
    pub known_hosts_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub tick_interval_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

impl UiConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Config {
    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("known-hosts").join("config.toml"))
    }

    /// Loads `path` (or the default location), falling back to defaults
    /// when the file is absent, unreadable or invalid.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_config_path() {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!("{e:#}. Using defaults.");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            tracing::debug!("No configuration at {}", path.display());
            return Self::default();
        }

        match Self::load_from_file(&path).and_then(|config| config.validate().map(|_| config)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Invalid configuration: {e:#}. Using defaults.");
                Self::default()
            }
        }
    }

    /// The configured known_hosts path with a leading `~/` expanded.
    pub fn known_hosts_path(&self) -> Result<Option<PathBuf>> {
        self.ssh
            .known_hosts_path
            .as_deref()
            .map(expand_tilde)
            .transpose()
    }

    pub fn validate(&self) -> Result<()> {
        if self.ui.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be greater than 0");
        }

        if self
            .ssh
            .known_hosts_path
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            anyhow::bail!("known_hosts_path cannot be empty");
        }

        Ok(())
    }
}

fn expand_tilde(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().context("Failed to determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}
