//! User settings (`settings.yaml`)
//!
//! Holds where the NIPs index is fetched from, how long a fetched copy stays
//! fresh, and which reference URL the user prefers to open.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::entry::UrlTarget;

/// Default cache TTL in seconds (15 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15 * 60;

/// GitHub contents API location of the NIPs index
pub const DEFAULT_DOCUMENT_URL: &str =
    "https://api.github.com/repos/nostr-protocol/nips/contents/README.md";

const SETTINGS_FILE: &str = "settings.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// URL of the GitHub contents API document to fetch
    #[serde(default = "default_document_url")]
    pub document_url: String,

    /// How long a cached document is reused
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Preferred reference URL, unset until the user picks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_target: Option<UrlTarget>,
}

fn default_document_url() -> String {
    DEFAULT_DOCUMENT_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            document_url: default_document_url(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            url_target: None,
        }
    }
}

impl Settings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Loads and persists `Settings`
pub struct SettingsManager {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        let settings_path = Self::config_dir()?.join(SETTINGS_FILE);
        Self::load_from_path(settings_path)
    }

    /// Load settings from a specific path, falling back to defaults when the
    /// file does not exist yet
    pub fn load_from_path(settings_path: PathBuf) -> Result<Self> {
        let settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path).with_context(|| {
                format!("Failed to read settings: {}", settings_path.display())
            })?;
            serde_yaml_ng::from_str(&content).with_context(|| {
                format!("Failed to parse settings: {}", settings_path.display())
            })?
        } else {
            Settings::default()
        };

        Ok(Self {
            settings,
            settings_path,
        })
    }

    /// Get the config directory, creating it if needed
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("org", "nostr", "nipdex")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("nipdex")))
            .context("Could not determine config directory")?;

        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        Ok(config_dir)
    }

    /// Get the default cache directory, creating it if needed
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = directories::ProjectDirs::from("org", "nostr", "nipdex")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .or_else(|| dirs::cache_dir().map(|d| d.join("nipdex")))
            .context("Could not determine cache directory")?;

        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Ok(cache_dir)
    }

    /// Save the current settings
    pub fn save(&self) -> Result<()> {
        let content =
            serde_yaml_ng::to_string(&self.settings).context("Failed to serialize settings")?;

        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.settings_path, content).with_context(|| {
            format!("Failed to write settings: {}", self.settings_path.display())
        })?;

        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &PathBuf {
        &self.settings_path
    }

    /// The persisted URL preference, if any
    pub fn url_target(&self) -> Option<UrlTarget> {
        self.settings.url_target
    }

    /// Change the URL preference; call `save` to persist it
    pub fn set_url_target(&mut self, target: Option<UrlTarget>) {
        self.settings.url_target = target;
    }
}
