use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/pinecone/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("pinecone").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The render root id is not empty
    /// - Clock and price periods are non-zero
    /// - The price spread is not negative
    /// - The highest generated price fits in an `i64`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view.root_id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "view.root_id must not be empty".to_string(),
            });
        }

        for (name, value) in [
            ("view.tick_ms", self.view.tick_ms),
            ("source.price_interval_ms", self.source.price_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationError {
                    message: format!("{} must be greater than zero", name),
                });
            }
        }

        if self.source.price_spread < 0 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "source.price_spread must not be negative (got {})",
                    self.source.price_spread
                ),
            });
        }

        if self
            .source
            .price_base
            .checked_add(self.source.price_spread)
            .is_none()
        {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "source.price_base + source.price_spread overflows ({} + {})",
                    self.source.price_base, self.source.price_spread
                ),
            });
        }

        Ok(())
    }
}
