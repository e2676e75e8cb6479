use thiserror::Error;

/// Errors raised while building or configuring providers.
///
/// Delivery failures are not errors here; they come back as an unsuccessful
/// [`NotificationResult`](super::NotificationResult).
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid {provider} configuration for id '{id}': {reason}")]
    InvalidConfig {
        provider: &'static str,
        id: String,
        reason: String,
    },

    #[error("Unknown provider '{0}'. Valid providers are: {1}")]
    UnknownProvider(String, String),

    #[error("No providers match the current selection")]
    NoProviders,

    #[error("Could not build the {provider} payload for id '{id}': {reason}")]
    Payload {
        provider: &'static str,
        id: String,
        reason: String,
    },
}

impl ProviderError {
    pub fn invalid_config(
        provider: &'static str,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            provider,
            id: id.into(),
            reason: reason.into(),
        }
    }
}
