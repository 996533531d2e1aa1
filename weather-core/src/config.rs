use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::DEFAULT_CITY;

pub const DEFAULT_PROVIDER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_BIND: &str = "0.0.0.0:8081";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://weather.db?mode=rwc";

/// Settings for the upstream weather provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub default_city: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            default_city: DEFAULT_CITY.to_string(),
        }
    }
}

/// Where the last lookup per city is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub enabled: bool,
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [provider]
/// api_key = "..."
///
/// [storage]
/// database_url = "sqlite://weather.db?mode=rwc"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Load config from `path`, or from the platform config file when `path` is `None`.
    /// A missing file yields the defaults. Environment overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        let mut cfg = Self::load_file(&path)?;
        cfg.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Read a config file without looking at the environment.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the platform config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    /// Variables that are set but blank are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("WEATHER_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = var("WEATHER_PROVIDER_URL") {
            self.provider.base_url = url;
        }
        if let Some(secs) = var("WEATHER_PROVIDER_TIMEOUT_SECS") {
            self.provider.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid WEATHER_PROVIDER_TIMEOUT_SECS: {secs}"))?;
        }
        if let Some(bind) = var("WEATHER_BIND") {
            self.server.bind = bind;
        }
        if let Some(city) = var("WEATHER_DEFAULT_CITY") {
            self.server.default_city = city;
        }
        if let Some(enabled) = var("WEATHER_STORAGE_ENABLED") {
            self.storage.enabled = parse_bool(&enabled)
                .ok_or_else(|| anyhow!("Invalid WEATHER_STORAGE_ENABLED: {enabled}"))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.storage.database_url = url;
        }
        Ok(())
    }

    /// Returns the provider API key, if present and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
