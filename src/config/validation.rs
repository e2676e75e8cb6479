//! Configuration validation logic
//!
//! Validation methods for each settings section. `Settings::validate` runs
//! them in order and reports the first failure.

use reqwest::Url;

use crate::chunker::Chunker;
use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, HttpSettings, LoggerSettings, RelaySettings, Settings,
};

/// Valid log levels; `off` is what `--silent` selects
const VALID_LOG_LEVELS: &[&str] = &["off", "trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Proxy schemes reqwest can dial with the enabled features
const VALID_PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

impl RelaySettings {
    /// Validate relay configuration
    ///
    /// # Validation Rules
    /// - `char_limit` must be greater than 0
    /// - Marker strategies need `char_limit` larger than the marker
    /// - `search_limit`, when set, must not exceed `char_limit`
    /// - `message_format` must not be empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.char_limit == 0 {
            return Err(ConfigError::validation(
                "relay.char_limit",
                "Character limit must be greater than 0.",
            ));
        }

        if let Some(limit) = self.search_limit
            && limit > self.char_limit
        {
            return Err(ConfigError::validation(
                "relay.search_limit",
                format!(
                    "Search limit ({}) cannot exceed the character limit ({}).",
                    limit, self.char_limit
                ),
            ));
        }

        Chunker::new(self.effective_strategy(), self.char_limit)
            .with_marker(self.marker.as_str())
            .validate()
            .map_err(|e| ConfigError::validation("relay.marker", e.to_string()))?;

        if self.message_format.trim().is_empty() {
            return Err(ConfigError::validation(
                "relay.message_format",
                "Message format cannot be empty. Use {{data}} to send the input unchanged.",
            ));
        }

        Ok(())
    }
}

impl HttpSettings {
    /// Validate HTTP client configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "http.timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if let Some(proxy) = &self.proxy {
            let url = Url::parse(proxy).map_err(|e| {
                ConfigError::validation("http.proxy", format!("Invalid proxy URL '{}': {}", proxy, e))
            })?;
            if !VALID_PROXY_SCHEMES.contains(&url.scheme()) {
                return Err(ConfigError::validation(
                    "http.proxy",
                    format!(
                        "Unsupported proxy scheme '{}'. Valid schemes are: {}",
                        url.scheme(),
                        VALID_PROXY_SCHEMES.join(", ")
                    ),
                ));
            }
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if self.rotation.max_size == 0 || self.rotation.max_files == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation",
                "Rotation max_size and max_files must be greater than 0.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Provider entries are checked when the registry builds them, since the
    /// rules differ per provider.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.relay.validate()?;
        self.http.validate()?;
        Ok(())
    }
}
