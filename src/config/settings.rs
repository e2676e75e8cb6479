//! Configuration settings structures
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chunker::{DEFAULT_MARKER, SplitStrategy, default_search_limit};
use crate::config::error::ConfigError;
use crate::logger::{LogFile, LogFormat, LoggerConfig, RotationPolicy, StderrOutput, parse_level};
use crate::providers::ProvidersConfig;
use crate::relay::DEFAULT_FORMAT;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "notify-relay".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/notify-relay.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_files() -> usize {
    5
}

fn default_char_limit() -> usize {
    4000
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_message_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Relay Configuration
// ============================================================================

/// How input is chunked, formatted and paced on its way to the providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Send the whole input as few large messages instead of one per line
    #[serde(default)]
    pub bulk: bool,

    /// Maximum characters per delivered message
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,

    /// Newline search window; defaults to `min(250, char_limit)`
    #[serde(default)]
    pub search_limit: Option<usize>,

    /// Explicit chunking strategy. When unset, bulk mode uses `newline` and
    /// line mode uses `lines`.
    #[serde(default)]
    pub split_strategy: Option<SplitStrategy>,

    /// Appended to a line that had to be cut
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Pause between consecutive chunks, in milliseconds
    #[serde(default)]
    pub delay_ms: u64,

    /// Maximum provider requests per second, 0 disables throttling
    #[serde(default)]
    pub rate_limit: u32,

    /// Message template, see [`crate::relay::MessageFormatter`]
    #[serde(default = "default_message_format")]
    pub message_format: String,

    /// Remove ANSI escape sequences before chunking
    #[serde(default = "default_true")]
    pub strip_ansi: bool,

    /// Print each chunk to stdout before delivering it
    #[serde(default = "default_true")]
    pub echo: bool,

    /// Only use these provider kinds (empty means all configured)
    #[serde(default)]
    pub providers: Vec<String>,

    /// Only use provider entries with these ids (empty means all)
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            bulk: false,
            char_limit: default_char_limit(),
            search_limit: None,
            split_strategy: None,
            marker: default_marker(),
            delay_ms: 0,
            rate_limit: 0,
            message_format: default_message_format(),
            strip_ansi: default_true(),
            echo: default_true(),
            providers: Vec::new(),
            ids: Vec::new(),
        }
    }
}

impl RelaySettings {
    /// Strategy actually used for chunking
    pub fn effective_strategy(&self) -> SplitStrategy {
        match self.split_strategy {
            Some(strategy) => strategy,
            None if self.bulk => SplitStrategy::Newline,
            None => SplitStrategy::Lines,
        }
    }

    /// Search window actually used by the newline strategy
    pub fn effective_search_limit(&self) -> usize {
        self.search_limit
            .unwrap_or_else(|| default_search_limit(self.char_limit))
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ============================================================================
// HTTP Configuration
// ============================================================================

/// Outbound HTTP client configuration shared by all providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// HTTP or SOCKS5 proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Override the default `notify-relay/<version>` user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            proxy: None,
            user_agent: None,
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// Size-based rotation settings for file logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSettings {
    /// Maximum file size in bytes before rotation
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Maximum number of rotated files to keep
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_files: default_max_files(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub rotation: RotationSettings,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
            rotation: RotationSettings::default(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "off", "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime logger configuration
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let level = parse_level(&self.level)
            .map_err(|e| ConfigError::validation("logger.level", e.to_string()))?;
        let stderr = self.console.enabled.then_some(StderrOutput {
            ansi: self.console.colored,
        });
        let file = self.file.into_log_file()?;

        Ok(LoggerConfig { level, stderr, file })
    }
}

impl FileSettings {
    /// `None` when file logging is switched off
    pub fn into_log_file(self) -> Result<Option<LogFile>, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;
        if !self.enabled {
            return Ok(None);
        }

        let rotation = RotationPolicy::new(self.rotation.max_size, self.rotation.max_files)
            .map_err(|e| ConfigError::validation("logger.file.rotation", e.to_string()))?;
        let log_file = LogFile::new(PathBuf::from(self.path), format)
            .with_append(self.append)
            .with_rotation(rotation);
        log_file
            .validate()
            .map_err(|e| ConfigError::validation("logger.file.path", e.to_string()))?;

        Ok(Some(log_file))
    }
}

// ============================================================================
// Root
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub relay: RelaySettings,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub providers: ProvidersConfig,
}
