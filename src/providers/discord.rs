//! Discord webhooks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordOptions {
    pub id: String,
    pub webhook_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

pub struct DiscordProvider {
    options: DiscordOptions,
    client: reqwest::Client,
}

impl DiscordProvider {
    pub fn new(options: DiscordOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn build_payload(&self, message: &NotificationMessage) -> serde_json::Value {
        let mut body = json!({ "content": message.body });

        if let Some(username) = &self.options.username {
            body["username"] = json!(username);
        }
        if let Some(avatar) = &self.options.avatar_url {
            body["avatar_url"] = json!(avatar);
        }

        body
    }
}

#[async_trait]
impl NotificationProvider for DiscordProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(&self.options.webhook_url)
            .json(&self.build_payload(message));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "discord"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::parse_http_url(self.name(), &self.options.id, "webhook_url", &self.options.webhook_url)?;
        if let Some(avatar) = &self.options.avatar_url {
            provider::parse_http_url(self.name(), &self.options.id, "avatar_url", avatar)?;
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

    #[test]
    fn test_payload_fields() {
        let p = DiscordProvider::new(
            DiscordOptions {
                id: "alerts".to_string(),
                webhook_url: "https://discord.com/api/webhooks/1/abc".to_string(),
                username: Some("relay".to_string()),
                avatar_url: Some("https://example.com/a.png".to_string()),
                format: None,
            },
            reqwest::Client::new(),
        );
        let message = NotificationMessage {
            body: "disk full".to_string(),
            data: "disk full".to_string(),
            count: 3,
        };

        assert_eq!(
            p.build_payload(&message),
            json!({
                "content": "disk full",
                "username": "relay",
                "avatar_url": "https://example.com/a.png",
            })
        );
        assert!(p.validate_config().is_ok());
    }

    #[test]
    fn test_invalid_avatar_url() {
        let p = DiscordProvider::new(
            DiscordOptions {
                id: "alerts".to_string(),
                webhook_url: "https://discord.com/api/webhooks/1/abc".to_string(),
                avatar_url: Some("avatar.png".to_string()),
                ..Default::default()
            },
            reqwest::Client::new(),
        );
        assert!(p.validate_config().is_err());
    }
}
