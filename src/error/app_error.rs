use thiserror::Error;

use crate::chunker::ChunkError;
use crate::config::error::ConfigError;
use crate::providers::ProviderError;

/// Application-wide error type.
///
/// Module errors convert into this type at the relay and CLI boundaries, so
/// handlers can use `?` across chunking, configuration, and delivery code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// No usable input was supplied
    #[error("Input error: {message}")]
    Input { message: String },

    /// Reading input or writing output failed
    #[error("I/O error while {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// The chunk budget is unusable; nothing was produced
    #[error(transparent)]
    Chunking(#[from] ChunkError),

    /// Provider construction or configuration failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Some deliveries were rejected; the rest of the run completed
    #[error("{failed} of {attempted} deliveries failed")]
    Delivery { failed: usize, attempted: usize },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn input(message: impl Into<String>) -> Self {
        AppError::Input {
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            operation: operation.into(),
            source,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::Invalid { field, .. } => field.clone(),
            ConfigError::MissingFile(path) => path.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_error_converts_transparently() {
        let err: AppError = ChunkError::invalid_argument("max_chunk_size must be at least 1").into();
        assert!(matches!(err, AppError::Chunking(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: max_chunk_size must be at least 1"
        );
    }

    #[test]
    fn test_config_error_keeps_field_as_key() {
        let err: AppError = ConfigError::validation("relay.char_limit", "must be positive").into();
        match err {
            AppError::Configuration { key, source } => {
                assert_eq!(key, "relay.char_limit");
                assert!(source.to_string().contains("must be positive"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_input_error_message() {
        let err = AppError::input("works with stdin or file using --data");
        assert_eq!(
            err.to_string(),
            "Input error: works with stdin or file using --data"
        );
    }

    #[test]
    fn test_delivery_error_message() {
        let err = AppError::Delivery {
            failed: 2,
            attempted: 6,
        };
        assert_eq!(err.to_string(), "2 of 6 deliveries failed");
    }
}
