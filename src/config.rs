use crate::flight::timezone::{DEFAULT_TIMEZONE, try_parse_timezone_offset};
use crate::platform;
use crate::rates::client::DEFAULT_API_URL;
use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub flights: FlightsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RatesConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Cached rates younger than this are used without a network call
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// First retry delay, doubled on each further attempt
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_refresh_interval() -> u64 {
    3600
}

fn default_max_retries() -> u32 {
    2
}

fn default_timeout() -> u64 {
    10
}

fn default_retry_backoff() -> u64 {
    100
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            refresh_interval_secs: default_refresh_interval(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

impl RatesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn refresh_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.refresh_interval_secs).unwrap_or(i64::MAX))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            anyhow::bail!("rates.api_url must not be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("rates.timeout_secs must be greater than 0");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FlightsConfig {
    /// Timezone label pre-filled for new flight legs
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
        }
    }
}

impl FlightsConfig {
    pub fn validate(&self) -> Result<()> {
        if try_parse_timezone_offset(&self.default_timezone).is_none() {
            anyhow::bail!(
                "Invalid flights.default_timezone '{}', expected a label like 'UTC+8'",
                self.default_timezone
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    /// Optional override for the data directory (for testing)
    pub data_dir_override: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.rates.validate()?;
        self.flights.validate()?;
        Ok(())
    }
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

/// Load `~/.trip-planner/config.toml`. A missing file means defaults.
pub fn load() -> Result<Config> {
    let config_path = platform::config_path()?;

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config = load_from_path(&config_path)?;
    config.validate()?;

    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
