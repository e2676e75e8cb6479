//! Errors raised while loading or checking settings

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file named on the command line or in the environment is absent
    #[error("missing configuration file: {0}")]
    MissingFile(String),

    #[error("cannot read configuration: {0}")]
    Parse(String),

    /// A setting holds a value the relay cannot use
    #[error("invalid setting `{field}`: {message}")]
    Invalid { field: String, message: String },

    /// Two settings were given that cannot be used together
    #[error("conflicting configuration sources: {0}")]
    Conflict(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn missing_file(path: impl Into<String>) -> Self {
        Self::MissingFile(path.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
