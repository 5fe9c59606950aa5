use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::{viacep, weatherapi};

pub const WEATHERAPI_KEY_ENV: &str = "WEATHERAPI_KEY";
pub const VIACEP_BASE_URL_ENV: &str = "VIACEP_BASE_URL";
pub const WEATHERAPI_BASE_URL_ENV: &str = "WEATHERAPI_BASE_URL";
pub const BIND_ENV: &str = "CEP_WEATHER_BIND";

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Process-wide settings, read once at startup.
///
/// Example TOML:
/// ```toml
/// weatherapi_key = "..."
/// bind = "127.0.0.1:8080"
/// request_timeout_secs = 3
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key. Lookups still run without it but every
    /// temperature request fails.
    pub weatherapi_key: Option<String>,
    pub viacep_base_url: String,
    pub weatherapi_base_url: String,
    /// Upper bound for each upstream request.
    pub request_timeout_secs: u64,
    /// Socket address the HTTP server listens on.
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weatherapi_key: None,
            viacep_base_url: viacep::DEFAULT_BASE_URL.to_string(),
            weatherapi_base_url: weatherapi::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("weatherapi_key", &self.weatherapi_key.as_ref().map(|_| "<redacted>"))
            .field("viacep_base_url", &self.viacep_base_url)
            .field("weatherapi_base_url", &self.weatherapi_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("bind", &self.bind)
            .finish()
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
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

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
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

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("br", "cep-weather", "cep-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `WEATHERAPI_KEY` and friends from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = var(WEATHERAPI_KEY_ENV) {
            self.weatherapi_key = Some(key);
        }
        if let Some(url) = var(VIACEP_BASE_URL_ENV) {
            self.viacep_base_url = url;
        }
        if let Some(url) = var(WEATHERAPI_BASE_URL_ENV) {
            self.weatherapi_base_url = url;
        }
        if let Some(bind) = var(BIND_ENV) {
            self.bind = bind;
        }

        self
    }

    pub fn set_weatherapi_key(&mut self, api_key: String) {
        self.weatherapi_key = Some(api_key);
    }

    /// Returns the API key, treating a blank value as unset.
    pub fn weatherapi_key(&self) -> Option<&str> {
        self.weatherapi_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
