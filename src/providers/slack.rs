//! Slack incoming webhooks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

const WEBHOOK_PREFIX: &str = "https://hooks.slack.com/services/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackOptions {
    pub id: String,
    pub webhook_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

pub struct SlackProvider {
    options: SlackOptions,
    client: reqwest::Client,
}

impl SlackProvider {
    pub fn new(options: SlackOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn build_payload(&self, message: &NotificationMessage) -> serde_json::Value {
        let mut body = json!({ "text": message.body });

        if let Some(username) = &self.options.username {
            body["username"] = json!(username);
        }
        if let Some(channel) = &self.options.channel {
            body["channel"] = json!(channel);
        }
        if let Some(icon) = &self.options.icon_emoji {
            body["icon_emoji"] = json!(icon);
        }

        body
    }
}

#[async_trait]
impl NotificationProvider for SlackProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(&self.options.webhook_url)
            .json(&self.build_payload(message));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "slack"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        if !self.options.webhook_url.starts_with(WEBHOOK_PREFIX) {
            return Err(ProviderError::invalid_config(
                self.name(),
                &self.options.id,
                format!("webhook_url must start with {}", WEBHOOK_PREFIX),
            ));
        }
        Ok(())
    }

    fn format(&self) -> Option<&str> {
        self.options.format.as_deref()
    }
}
