//! Core notification provider trait and types.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::error::ProviderError;

/// One rendered chunk on its way to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Text after the message format was applied
    pub body: String,
    /// The chunk as produced by the chunker
    pub data: String,
    /// 1-based position of the chunk in this run
    pub count: usize,
}

/// Result of a notification send attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Whether send was successful
    pub success: bool,
    /// HTTP status code, if a response arrived
    pub status_code: Option<u16>,
    /// Response body or transport error
    pub response: Option<String>,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

/// A delivery target.
///
/// Implementations make exactly one HTTP call per `send` and report HTTP or
/// transport failures through [`NotificationResult::success`].
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Sends a notification message
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError>;

    /// Provider kind, e.g. "slack"
    fn name(&self) -> &'static str;

    /// The `id` of the configuration entry this provider was built from
    fn id(&self) -> &str;

    /// Checks the configuration entry without contacting the service
    fn validate_config(&self) -> Result<(), ProviderError>;

    /// Message format configured for this entry, if any
    fn format(&self) -> Option<&str>;
}

/// Send `request` and record how it went
pub(crate) async fn execute(request: RequestBuilder) -> NotificationResult {
    let start = Instant::now();
    let response = request.send().await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match response {
        Ok(resp) => {
            let status_code = resp.status().as_u16();
            let success = resp.status().is_success();
            let response_text = resp.text().await.ok();

            NotificationResult {
                success,
                status_code: Some(status_code),
                response: response_text,
                duration_ms,
            }
        }
        Err(e) => NotificationResult {
            success: false,
            status_code: None,
            response: Some(e.to_string()),
            duration_ms,
        },
    }
}

/// Parse `raw` as an http(s) URL
pub(crate) fn parse_http_url(
    provider: &'static str,
    id: &str,
    field: &str,
    raw: &str,
) -> Result<Url, ProviderError> {
    let url = Url::parse(raw).map_err(|e| {
        ProviderError::invalid_config(provider, id, format!("invalid {} '{}': {}", field, raw, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ProviderError::invalid_config(
            provider,
            id,
            format!("{} must use http or https", field),
        ));
    }
    Ok(url)
}

/// Reject blank required fields
pub(crate) fn require(
    provider: &'static str,
    id: &str,
    field: &str,
    value: &str,
) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::invalid_config(
            provider,
            id,
            format!("{} cannot be empty", field),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url() {
        assert!(parse_http_url("bark", "a", "server_url", "https://bark.example.com").is_ok());
        assert!(parse_http_url("bark", "a", "server_url", "http://localhost:8080").is_ok());

        let err = parse_http_url("bark", "a", "server_url", "not-a-url").unwrap_err();
        assert!(err.to_string().contains("server_url"));
        assert!(parse_http_url("bark", "a", "server_url", "ftp://files.example.com").is_err());
    }

    #[test]
    fn test_require() {
        assert!(require("gotify", "home", "token", "abc").is_ok());
        let err = require("gotify", "home", "token", "  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid gotify configuration for id 'home': token cannot be empty"
        );
    }

    #[tokio::test]
    async fn test_execute_reports_transport_failure() {
        let client = reqwest::Client::new();
        // Port 9 on loopback is the discard port; nothing listens there in CI
        let result = execute(client.post("http://127.0.0.1:9/hook")).await;
        assert!(!result.success);
        assert_eq!(result.status_code, None);
        assert!(result.response.is_some());
    }
}
