//! Configuration management for indexd
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `IDXD_*` environment variables, then command line flags applied by
//! the binary. The merged configuration is validated before use.

use crate::core::error::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Dataset and refresh configuration
    pub dataset: DatasetConfig,

    /// Metrics and monitoring
    pub metrics: MetricsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,
}

/// Dataset configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Dataset file path, one base-10 integer per line, sorted ascending
    pub path: PathBuf,

    /// How often the snapshot is rebuilt from the dataset
    #[serde(deserialize_with = "deserialize_duration")]
    pub refresh_interval: Duration,

    /// Upper bound on a single dataset read during a refresh
    #[serde(deserialize_with = "deserialize_duration")]
    pub read_timeout: Duration,
}

/// Metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable the Prometheus exposition listener
    pub enabled: bool,

    /// Metrics server bind address
    pub metrics_addr: SocketAddr,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            dataset: DatasetConfig::default(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".parse().unwrap(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/input.txt"),
            refresh_interval: Duration::from_secs(60 * 60),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            metrics_addr: "0.0.0.0:9090".parse().unwrap(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Ok(file_config) = Self::from_file("indexd.toml") {
            config = file_config;
        }

        // Override with environment variables
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        use std::env;

        if let Ok(addr) = env::var("IDXD_HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Ok(path) = env::var("IDXD_DATASET_PATH") {
            self.dataset.path = PathBuf::from(path);
        }

        if let Ok(interval) = env::var("IDXD_REFRESH_INTERVAL") {
            self.dataset.refresh_interval = parse_duration(&interval)
                .map_err(|e| Error::config(format!("Invalid refresh interval: {}", e)))?;
        }

        if let Ok(timeout) = env::var("IDXD_READ_TIMEOUT") {
            self.dataset.read_timeout = parse_duration(&timeout)
                .map_err(|e| Error::config(format!("Invalid read timeout: {}", e)))?;
        }

        if let Ok(addr) = env::var("IDXD_METRICS_ADDR") {
            self.metrics.metrics_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid metrics address: {}", e)))?;
        }

        if let Ok(level) = env::var("IDXD_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // The API and metrics listeners need distinct ports
        if self.metrics.enabled && self.server.http_addr.port() == self.metrics.metrics_addr.port()
        {
            return Err(Error::config("Port conflict detected"));
        }

        // A sub-second refresh interval would hammer the data source
        if self.dataset.refresh_interval < Duration::from_secs(1) {
            return Err(Error::config("Refresh interval too small (minimum 1s)"));
        }

        if self.dataset.read_timeout.is_zero() {
            return Err(Error::config("Read timeout must be non-zero"));
        }

        // Validate log level
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(Error::config("Invalid log level")),
        }

        Ok(())
    }
}

// For TOML parsing
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

// Custom deserializer for Duration from string
fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration string like '30s' or '5m'")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            parse_duration(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_str(DurationVisitor)
}

/// Parse a duration from common shorthand formats
///
/// Accepts `ms`, `s`, `m` and `h` suffixes, or a bare number of seconds.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    if s.ends_with("ms") {
        let ms: u64 = s[..s.len() - 2].parse().map_err(|_| "Invalid milliseconds")?;
        Ok(Duration::from_millis(ms))
    } else if s.ends_with('s') {
        let secs: u64 = s[..s.len() - 1].parse().map_err(|_| "Invalid seconds")?;
        Ok(Duration::from_secs(secs))
    } else if s.ends_with('m') {
        let mins: u64 = s[..s.len() - 1].parse().map_err(|_| "Invalid minutes")?;
        Ok(Duration::from_secs(mins * 60))
    } else if s.ends_with('h') {
        let hours: u64 = s[..s.len() - 1].parse().map_err(|_| "Invalid hours")?;
        Ok(Duration::from_secs(hours * 3600))
    } else {
        // Try parsing as raw seconds
        let secs: u64 = s.parse().map_err(|_| "Invalid duration format")?;
        Ok(Duration::from_secs(secs))
    }
}
