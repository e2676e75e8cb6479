//! Microsoft Teams incoming webhooks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsOptions {
    pub id: String,
    pub webhook_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

pub struct TeamsProvider {
    options: TeamsOptions,
    client: reqwest::Client,
}

impl TeamsProvider {
    pub fn new(options: TeamsOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }
}

#[async_trait]
impl NotificationProvider for TeamsProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(&self.options.webhook_url)
            .json(&json!({ "text": message.body }));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "teams"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::parse_http_url(self.name(), &self.options.id, "webhook_url", &self.options.webhook_url)
            .map(|_| ())
    }

    fn format(&self) -> Option<&str> {
        self.options.format.as_deref()
    }
}
