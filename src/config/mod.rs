use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::status::poller::{PollSettings, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT};

pub const DEFAULT_SERVER_NAME: &str = "BlockRealm";
pub const DEFAULT_SERVER_ADDRESS: &str = "play.myserver.ru";
pub const DEFAULT_STATUS_ENDPOINT: &str = "http://127.0.0.1:8080/minecraft-stats";
pub const DEFAULT_FALLBACK_VERSION: &str = "1.20";

/// Optional hex color overrides (`#RRGGBB` or `#RGB`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ThemeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Name shown in the hero banner
    pub server_name: String,

    /// Address players connect to; this is what gets copied
    pub server_address: String,

    /// Status aggregator URL
    pub status_endpoint: String,

    /// Version shown when the aggregator does not report one
    pub fallback_version: String,

    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,

    /// Desktop notifications on online/offline changes (watch mode)
    pub notifications: bool,

    pub theme: ThemeOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            status_endpoint: DEFAULT_STATUS_ENDPOINT.to_string(),
            fallback_version: DEFAULT_FALLBACK_VERSION.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            notifications: false,
            theme: ThemeOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("blockportal");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Keep a broken file around for the user to fix
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save() {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Parse TOML content and clamp values into a usable range
    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(&self.clone().sanitized())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        let defaults = AppConfig::default();

        if self.server_address.trim().is_empty() {
            self.server_address = defaults.server_address;
        }
        if self.status_endpoint.trim().is_empty() {
            self.status_endpoint = defaults.status_endpoint;
        }
        if self.fallback_version.trim().is_empty() {
            self.fallback_version = defaults.fallback_version;
        }
        self.poll_interval_secs = self.poll_interval_secs.max(1);
        self.request_timeout_secs = self.request_timeout_secs.max(1);

        // A request must finish before the next tick
        if self.request_timeout_secs >= self.poll_interval_secs && self.poll_interval_secs > 1 {
            self.request_timeout_secs = self.poll_interval_secs - 1;
        }
        self
    }

    /// Apply a command-line endpoint; blank values keep the configured one
    pub fn override_endpoint(&mut self, endpoint: &str) {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            tracing::warn!("Ignoring empty --endpoint, using {}", self.status_endpoint);
            return;
        }
        self.status_endpoint = endpoint.to_string();
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            fallback_version: self.fallback_version.clone(),
        }
    }
}
