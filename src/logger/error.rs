//! Logger failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid logger settings: {message}")]
    Config { message: String },

    #[error("cannot rotate log file: {message}")]
    Rotation { message: String },

    /// Another subscriber already owns the global default
    #[error("tracing subscriber not installed: {message}")]
    Init { message: String },
}

impl LoggerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn rotation(message: impl Into<String>) -> Self {
        Self::Rotation {
            message: message.into(),
        }
    }
}
