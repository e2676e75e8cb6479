//! Arbitrary HTTP endpoints.
//!
//! The request body is the formatted message as plain text. A format
//! containing `{{dataJsonString}}` instead gets the raw chunk spliced in as a
//! JSON string literal, which makes JSON bodies easy to template.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

pub const JSON_STRING_PLACEHOLDER: &str = "{{dataJsonString}}";

fn default_method() -> String {
    "POST".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOptions {
    pub id: String,
    pub webhook_url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for CustomOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            webhook_url: String::new(),
            method: default_method(),
            headers: BTreeMap::new(),
            format: None,
        }
    }
}

pub struct CustomProvider {
    options: CustomOptions,
    client: reqwest::Client,
}

impl CustomProvider {
    pub fn new(options: CustomOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn parse_method(&self) -> Result<Method, ProviderError> {
        self.options.method.to_uppercase().parse().map_err(|_| {
            ProviderError::invalid_config(
                self.name(),
                &self.options.id,
                format!("invalid HTTP method: {}", self.options.method),
            )
        })
    }

    fn build_body(&self, message: &NotificationMessage) -> Result<String, ProviderError> {
        match self.options.format.as_deref() {
            Some(format) if format.contains(JSON_STRING_PLACEHOLDER) => {
                let escaped = serde_json::to_string(&message.data).map_err(|e| {
                    ProviderError::Payload {
                        provider: self.name(),
                        id: self.options.id.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(format.replace(JSON_STRING_PLACEHOLDER, &escaped))
            }
            _ => Ok(message.body.clone()),
        }
    }
}

#[async_trait]
impl NotificationProvider for CustomProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let body = self.build_body(message)?;
        tracing::trace!(id = %self.options.id, %body, "custom body");

        let mut request = self
            .client
            .request(self.parse_method()?, &self.options.webhook_url)
            .body(body);
        for (key, value) in &self.options.headers {
            request = request.header(key, value);
        }

        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "custom"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::parse_http_url(self.name(), &self.options.id, "webhook_url", &self.options.webhook_url)?;
        self.parse_method()?;
        Ok(())
    }

    fn format(&self) -> Option<&str> {
        self.options.format.as_deref()
    }
}
