//! Google Chat space webhooks.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

const API_BASE: &str = "https://chat.googleapis.com/v1/spaces";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleChatOptions {
    pub id: String,
    pub space: String,
    pub key: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

pub struct GoogleChatProvider {
    options: GoogleChatOptions,
    client: reqwest::Client,
}

impl GoogleChatProvider {
    pub fn new(options: GoogleChatOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn endpoint(&self) -> Result<Url, ProviderError> {
        let raw = format!("{}/{}/messages", API_BASE, self.options.space);
        let mut url = provider::parse_http_url(self.name(), &self.options.id, "space", &raw)?;
        url.query_pairs_mut()
            .append_pair("key", &self.options.key)
            .append_pair("token", &self.options.token);
        Ok(url)
    }
}

#[async_trait]
impl NotificationProvider for GoogleChatProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(self.endpoint()?)
            .json(&json!({ "text": message.body }));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "googlechat"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::require(self.name(), &self.options.id, "space", &self.options.space)?;
        provider::require(self.name(), &self.options.id, "key", &self.options.key)?;
        provider::require(self.name(), &self.options.id, "token", &self.options.token)?;
        self.endpoint().map(|_| ())
    }

    fn format(&self) -> Option<&str> {
        self.options.format.as_deref()
    }
}
