//! Configuration management for frostkeep.
//!
//! Loads configuration from ${FROSTKEEP_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for frostkeep configuration and data directories.
    //!
    //! FROSTKEEP_HOME resolution order:
    //! 1. FROSTKEEP_HOME environment variable (if set)
    //! 2. ~/.config/frostkeep (default)

    use std::path::PathBuf;

    /// Returns the frostkeep home directory.
    ///
    /// Checks FROSTKEEP_HOME env var first, falls back to ~/.config/frostkeep
    pub fn frostkeep_home() -> PathBuf {
        if let Ok(home) = std::env::var("FROSTKEEP_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("frostkeep"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        frostkeep_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        frostkeep_home().join("session.json")
    }
}

/// Backend connection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST backend, including the /api prefix.
    pub base_url: Option<String>,
    /// Request timeout in seconds (0 disables)
    pub timeout_secs: Option<u32>,
}

impl BackendConfig {
    /// Returns the configured base URL, treating empty/whitespace as unset.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// How many days ahead counts as "expiring soon".
    pub expiry_warning_days: u32,
}

impl Config {
    /// Default backend, matching the development server.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8082/api";
    const DEFAULT_TIMEOUT_SECS: u32 = 30;
    pub const DEFAULT_EXPIRY_WARNING_DAYS: u32 = 7;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Returns the request timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        let secs = self
            .backend
            .timeout_secs
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        if secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(secs)))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only the backend base URL to the default config file.
    pub fn save_base_url(url: &str) -> Result<()> {
        Self::save_base_url_to(&paths::config_path(), url)
    }

    /// Saves only the backend base URL to a specific config file path.
    ///
    /// Creates the file with the default template if it doesn't exist;
    /// existing fields and comments are preserved.
    pub fn save_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        url::Url::parse(url).with_context(|| format!("Invalid backend base URL: {url}"))?;

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["backend"]["base_url"] = value(url);

        Self::write_config(path, &doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            expiry_warning_days: Self::DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}

fn default_config_template() -> &'static str {
    r#"# frostkeep configuration

[backend]
# Base URL of the inventory backend, including the /api prefix.
# The FROSTKEEP_BACKEND_URL environment variable takes precedence.
# base_url = "http://localhost:8082/api"

# Request timeout in seconds (0 disables).
# timeout_secs = 30

# How many days ahead counts as "expiring soon".
# expiry_warning_days = 7
"#
}
