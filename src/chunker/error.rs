//! Error types for the chunker

use thiserror::Error;

/// Errors produced while validating chunking parameters.
///
/// Chunking itself is total: once the parameters are accepted every input
/// produces a chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl ChunkError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
