//! What the relay logs and where it goes

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

use crate::logger::error::LoggerError;

/// Logger setup handed to [`super::init_logger`].
///
/// Each output is optional. With neither set nothing is installed, which is
/// different from `level = off`: an installed subscriber still honours
/// `RUST_LOG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    pub stderr: Option<StderrOutput>,
    pub file: Option<LogFile>,
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        match &self.file {
            Some(file) => file.validate(),
            None => Ok(()),
        }
    }

    pub fn has_outputs(&self) -> bool {
        self.stderr.is_some() || self.file.is_some()
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            stderr: Some(StderrOutput { ansi: true }),
            file: None,
        }
    }
}

/// Accepts `off` as well as the usual level names, in any case
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| LoggerError::config(format!("unknown log level '{}'", level)))
}

/// Human-readable events on stderr; stdout belongs to the relayed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StderrOutput {
    /// Colour when stderr is a terminal
    pub ansi: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    /// Keep what a previous run wrote instead of truncating
    pub append: bool,
    pub format: LogFormat,
    pub rotation: RotationPolicy,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>, format: LogFormat) -> Self {
        Self {
            path: path.into(),
            append: true,
            format,
            rotation: RotationPolicy::default(),
        }
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.path.file_name().is_none() {
            return Err(LoggerError::config(format!(
                "log file path '{}' does not name a file",
                self.path.display()
            )));
        }
        self.rotation.validate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("full") {
            Ok(Self::Full)
        } else if s.eq_ignore_ascii_case("compact") {
            Ok(Self::Compact)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(LoggerError::config(format!(
                "unknown log format '{}', expected full, compact or json",
                s
            )))
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Roll the file once it holds `max_bytes`; keep `keep` old generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub keep: usize,
}

impl RotationPolicy {
    pub fn new(max_bytes: u64, keep: usize) -> Result<Self, LoggerError> {
        let policy = Self { max_bytes, keep };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.max_bytes == 0 || self.keep == 0 {
            return Err(LoggerError::config(format!(
                "rotation needs max_bytes and keep above zero, got {} and {}",
                self.max_bytes, self.keep
            )));
        }
        Ok(())
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            keep: 5,
        }
    }
}
