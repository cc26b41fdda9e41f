//! Configuration System
//!
//! Loads the dashboard configuration from a TOML file. Every field has a
//! default, so an absent file or an empty section is valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiConfig;
use crate::controller::RefreshSettings;
use crate::format::Formatter;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the screener document comes from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// File path or URL of the document
    #[serde(default = "default_location")]
    pub location: String,

    /// Base URL that a relative `location` is resolved against
    #[serde(default)]
    pub http_base: Option<String>,

    #[serde(default = "default_fetch_timeout")]
    pub timeout_ms: u64,
}

fn default_location() -> String {
    crate::fetch::DEFAULT_LOCATION.to_string()
}

fn default_fetch_timeout() -> u64 {
    10_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            http_base: None,
            timeout_ms: default_fetch_timeout(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

/// Polling and animation timing
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_resume_debounce")]
    pub resume_debounce_ms: u64,

    #[serde(default = "default_animation")]
    pub animation_ms: u64,
}

fn default_interval() -> u64 {
    15 * 60 // 15 minutes
}

fn default_resume_debounce() -> u64 {
    1000
}

fn default_animation() -> u64 {
    1000
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            resume_debounce_ms: default_resume_debounce(),
            animation_ms: default_animation(),
        }
    }
}

impl RefreshConfig {
    /// Controller timing; the interval is at least one second
    pub fn settings(&self) -> RefreshSettings {
        RefreshSettings {
            interval: Duration::from_secs(self.interval_secs.max(1)),
            resume_debounce: Duration::from_millis(self.resume_debounce_ms),
            animation: Duration::from_millis(self.animation_ms),
        }
    }
}

/// Date display
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Fixed UTC offset for dates; the host's local offset when unset
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl DisplayConfig {
    pub fn formatter(&self) -> Formatter {
        Formatter::from_offset_minutes(self.utc_offset_minutes)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.host.clone(), self.port)
    }
}

/// Theme persistence
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeConfig {
    /// File holding the saved preference
    #[serde(default = "default_theme_path")]
    pub store_path: String,
}

fn default_theme_path() -> String {
    dirs::config_dir()
        .map(|p| {
            p.join("screener-dashboard")
                .join("theme")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./.screener-theme".to_string())
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            store_path: default_theme_path(),
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

        Self::from_toml(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Paths searched by [`Config::load_default`], in order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("screener-dashboard").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/screener-dashboard/config.toml"));
        paths.push(PathBuf::from("./config.toml"));
        paths
    }

    /// Load from the first default location that loads, else defaults.
    ///
    /// Nothing is logged here since this runs before the subscriber exists;
    /// call [`LoadedConfig::report`] once tracing is up.
    pub fn load_default() -> LoadedConfig {
        Self::load_first(&Self::default_paths())
    }

    fn load_first(paths: &[PathBuf]) -> LoadedConfig {
        let mut errors = Vec::new();

        for path in paths.iter().filter(|path| path.exists()) {
            match Self::load(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        path: Some(path.clone()),
                        errors,
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        LoadedConfig {
            config: Self::default(),
            path: None,
            errors,
        }
    }

    /// Write the commented default config to `path` unless a file exists.
    ///
    /// Returns whether a file was written.
    pub fn write_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }

        let io_error = |e: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, generate_default_config()).map_err(io_error)?;
        Ok(true)
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from; `None` when defaults are in use
    pub path: Option<PathBuf>,
    /// Files that existed but failed to load
    pub errors: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Log where the config came from and every file that was skipped
    pub fn report(&self) {
        for error in &self.errors {
            tracing::warn!("Skipped config file: {}", error);
        }
        match &self.path {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config"),
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
    r#"# Screener Dashboard Configuration
#
# Log filtering can be overridden with RUST_LOG.

[source]
# Path or URL of the screener results document
location = "data/screener_results.json"

# Resolve a relative location against this base URL instead of the filesystem
# http_base = "https://example.com/screener"

# Give up on a fetch after this many milliseconds
timeout_ms = 10000

[refresh]
# Automatic refresh interval (seconds)
interval_secs = 900

# Delay before refreshing when the page becomes visible again (ms)
resume_debounce_ms = 1000

# Counter animation length (ms), 0 to disable
animation_ms = 1000

[display]
# Fixed UTC offset for dates, in minutes. Uses the host offset when unset.
# utc_offset_minutes = 540

[server]
host = "127.0.0.1"
port = 8080

[theme]
# File holding the saved light/dark preference
# store_path = "~/.config/screener-dashboard/theme"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
