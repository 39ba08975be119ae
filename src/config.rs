//! # Configuration Management
//!
//! Centralized configuration for metadata framing, the factory, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Security Considerations
//! - Key and body limits bound allocations when decoding untrusted frames
//! - The default body limit (16 MB) matches common transport payload ceilings

use crate::error::{MetadataError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Default maximum key length in bytes
pub const MAX_KEY_LEN: usize = 255;

/// Max allowed body size (16 MB)
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MetadataConfig {
    /// Frame size limits
    #[serde(default)]
    pub framing: FramingConfig,

    /// Factory behavior
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MetadataConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| MetadataError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| MetadataError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| MetadataError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(len) = std::env::var("RESOURCE_METADATA_MAX_KEY_LEN") {
            if let Ok(val) = len.parse::<usize>() {
                config.framing.max_key_len = val;
            }
        }

        if let Ok(size) = std::env::var("RESOURCE_METADATA_MAX_BODY_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.framing.max_body_size = val;
            }
        }

        if let Ok(flag) = std::env::var("RESOURCE_METADATA_LOG_UNRESOLVED_KEYS") {
            if let Ok(val) = flag.parse::<bool>() {
                config.registry.log_unresolved_keys = val;
            }
        }

        if let Ok(flag) = std::env::var("RESOURCE_METADATA_WARN_ON_TRAILING_BYTES") {
            if let Ok(val) = flag.parse::<bool>() {
                config.registry.warn_on_trailing_bytes = val;
            }
        }

        if let Ok(level) = std::env::var("RESOURCE_METADATA_LOG_LEVEL") {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MetadataError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| MetadataError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.framing.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(MetadataError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Frame size limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FramingConfig {
    /// Maximum key length in bytes (at most 65535, the key length prefix is 2 bytes)
    pub max_key_len: usize,

    /// Maximum body length in bytes
    pub max_body_size: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_key_len: MAX_KEY_LEN,
            max_body_size: MAX_BODY_SIZE,
        }
    }
}

impl FramingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_key_len == 0 {
            errors.push("Max key length must be greater than 0".to_string());
        } else if self.max_key_len > u16::MAX as usize {
            errors.push(format!(
                "Max key length too large: {} (maximum: {})",
                self.max_key_len,
                u16::MAX
            ));
        }

        if self.max_body_size > u32::MAX as usize {
            errors.push(format!(
                "Max body size too large: {} bytes (maximum: {})",
                self.max_body_size,
                u32::MAX
            ));
        }

        errors
    }
}

/// Factory behavior
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Emit a debug event whenever a key falls back to raw metadata
    pub log_unresolved_keys: bool,

    /// Warn (instead of debug) when a typed reader leaves bytes unread
    pub warn_on_trailing_bytes: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            log_unresolved_keys: true,
            warn_on_trailing_bytes: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("resource-metadata"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = level.as_str().to_ascii_lowercase();
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
