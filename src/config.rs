//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub counter: CounterSectionConfig,

    #[serde(default)]
    pub geo: GeoSectionConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Visit store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("footfall").to_string_lossy().to_string())
        .unwrap_or_else(|| "./footfall_data".to_string())
}

impl StorageConfig {
    /// Path of the key-value store file
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("store.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Remote counter service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CounterSectionConfig {
    #[serde(default = "default_counter_url")]
    pub base_url: String,

    #[serde(default = "default_site_id")]
    pub site_id: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_counter_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_site_id() -> String {
    "homepage".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_enabled() -> bool {
    true
}

impl Default for CounterSectionConfig {
    fn default() -> Self {
        Self {
            base_url: default_counter_url(),
            site_id: default_site_id(),
            timeout_ms: default_timeout_ms(),
            enabled: default_enabled(),
        }
    }
}

/// Geolocation lookup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeoSectionConfig {
    #[serde(default = "default_geo_url")]
    pub url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_geo_url() -> String {
    "https://ipapi.co/json/".to_string()
}

impl Default for GeoSectionConfig {
    fn default() -> Self {
        Self {
            url: default_geo_url(),
            timeout_ms: default_timeout_ms(),
            enabled: default_enabled(),
        }
    }
}

/// Page content configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Author name to bold in publication author lists
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    /// JSON file holding the news feed
    #[serde(default = "default_news_path")]
    pub news_path: String,

    /// JSON file holding the bibliography
    #[serde(default = "default_publications_path")]
    pub publications_path: String,
}

fn default_owner_name() -> String {
    "Xu Chen".to_string()
}

fn default_news_path() -> String {
    "news.json".to_string()
}

fn default_publications_path() -> String {
    "publications.json".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner_name: default_owner_name(),
            news_path: default_news_path(),
            publications_path: default_publications_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("footfall").join("config.toml")),
            Some(PathBuf::from("./footfall.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("FOOTFALL_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Ok(url) = std::env::var("FOOTFALL_COUNTER_URL") {
            self.counter.base_url = url;
        }
        if let Ok(site_id) = std::env::var("FOOTFALL_COUNTER_SITE_ID") {
            self.counter.site_id = site_id;
        }

        if let Ok(url) = std::env::var("FOOTFALL_GEO_URL") {
            self.geo.url = url;
        }

        if let Ok(level) = std::env::var("FOOTFALL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FOOTFALL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Footfall Configuration
#
# Environment variables override these settings:
# - FOOTFALL_DATA_DIR
# - FOOTFALL_COUNTER_URL
# - FOOTFALL_COUNTER_SITE_ID
# - FOOTFALL_GEO_URL
# - FOOTFALL_LOG_LEVEL
# - FOOTFALL_LOG_FORMAT

[storage]
# Directory for the persisted visit store
data_dir = "~/.local/share/footfall"

[counter]
# Remote counting service base URL
base_url = "http://localhost:8080"

# Counter namespace for this site
site_id = "homepage"

# Request timeout (ms)
timeout_ms = 5000

# Enable the remote counter (totals fall back to local records when off)
enabled = true

[geo]
# Geolocation lookup endpoint
url = "https://ipapi.co/json/"

# Request timeout (ms)
timeout_ms = 5000

# Enable geolocation lookups (location records are skipped when off)
enabled = true

[site]
# Author name to bold in publication lists
owner_name = "Xu Chen"

# Page content data files
news_path = "news.json"
publications_path = "publications.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
