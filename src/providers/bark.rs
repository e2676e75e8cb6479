//! Bark push notifications for iOS devices.
//!
//! API reference: https://github.com/Finb/Bark

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

const DEFAULT_TITLE: &str = "Notification";

const VALID_LEVELS: &[&str] = &["passive", "active", "timeSensitive"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarkOptions {
    pub id: String,
    pub server_url: String,
    pub device_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// `passive`, `active` or `timeSensitive`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Defaults to "Notification"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl BarkOptions {
    fn api_url(&self) -> String {
        format!(
            "{}/push/{}",
            self.server_url.trim_end_matches('/'),
            self.device_key
        )
    }
}

pub struct BarkProvider {
    options: BarkOptions,
    client: reqwest::Client,
}

impl BarkProvider {
    pub fn new(options: BarkOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn build_request_body(&self, message: &NotificationMessage) -> serde_json::Value {
        let mut body = json!({
            "title": self.options.title.as_deref().unwrap_or(DEFAULT_TITLE),
            "body": message.body,
        });

        if let Some(icon) = &self.options.icon {
            body["icon"] = json!(icon);
        }
        if let Some(sound) = &self.options.sound {
            body["sound"] = json!(sound);
        }
        if let Some(level) = &self.options.level {
            body["level"] = json!(level);
        }
        if let Some(group) = &self.options.group {
            body["group"] = json!(group);
        }

        body
    }
}

#[async_trait]
impl NotificationProvider for BarkProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(self.options.api_url())
            .json(&self.build_request_body(message));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "bark"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::parse_http_url(self.name(), &self.options.id, "server_url", &self.options.server_url)?;
        provider::require(self.name(), &self.options.id, "device_key", &self.options.device_key)?;

        if let Some(level) = &self.options.level
            && !VALID_LEVELS.contains(&level.as_str())
        {
            return Err(ProviderError::invalid_config(
                self.name(),
                &self.options.id,
                format!("level must be one of: {}", VALID_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }

    fn format(&self) -> Option<&str> {
        self.options.format.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(server_url: &str) -> BarkOptions {
        BarkOptions {
            id: "phone".to_string(),
            server_url: server_url.to_string(),
            device_key: "test_key_123".to_string(),
            ..Default::default()
        }
    }

    fn message() -> NotificationMessage {
        NotificationMessage {
            body: "Test Body".to_string(),
            data: "Test Body".to_string(),
            count: 1,
        }
    }

    #[test]
    fn test_api_url_trailing_slash() {
        for server in ["https://bark.example.com", "https://bark.example.com/"] {
            assert_eq!(
                options(server).api_url(),
                "https://bark.example.com/push/test_key_123"
            );
        }
    }

    #[test]
    fn test_validate_config() {
        let provider = BarkProvider::new(options("https://bark.example.com"), reqwest::Client::new());
        assert!(provider.validate_config().is_ok());

        let provider = BarkProvider::new(options("not-a-url"), reqwest::Client::new());
        assert!(provider.validate_config().is_err());

        let provider = BarkProvider::new(
            BarkOptions {
                level: Some("urgent".to_string()),
                ..options("https://bark.example.com")
            },
            reqwest::Client::new(),
        );
        assert!(provider.validate_config().is_err());
    }

    #[test]
    fn test_build_request_body_minimal() {
        let provider = BarkProvider::new(options("https://bark.example.com"), reqwest::Client::new());

        let body = provider.build_request_body(&message());
        assert_eq!(body["title"], "Notification");
        assert_eq!(body["body"], "Test Body");
        assert!(body.get("icon").is_none());
        assert!(body.get("sound").is_none());
    }

    #[test]
    fn test_build_request_body_full() {
        let provider = BarkProvider::new(
            BarkOptions {
                icon: Some("https://example.com/icon.png".to_string()),
                sound: Some("notification.wav".to_string()),
                level: Some("active".to_string()),
                group: Some("relay".to_string()),
                title: Some("Test Title".to_string()),
                ..options("https://bark.example.com")
            },
            reqwest::Client::new(),
        );

        let body = provider.build_request_body(&message());
        assert_eq!(body["title"], "Test Title");
        assert_eq!(body["icon"], "https://example.com/icon.png");
        assert_eq!(body["sound"], "notification.wav");
        assert_eq!(body["level"], "active");
        assert_eq!(body["group"], "relay");
    }
}
