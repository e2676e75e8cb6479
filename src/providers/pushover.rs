//! Pushover message API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

fn default_api_url() -> String {
    "https://api.pushover.net/1/messages.json".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushoverOptions {
    pub id: String,
    pub api_token: String,
    pub user_key: String,
    /// Restrict delivery to these devices; empty means all of the user's devices
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Title shown above every message from this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for PushoverOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            api_token: String::new(),
            user_key: String::new(),
            devices: Vec::new(),
            api_url: default_api_url(),
            title: None,
            format: None,
        }
    }
}

pub struct PushoverProvider {
    options: PushoverOptions,
    client: reqwest::Client,
}

impl PushoverProvider {
    pub fn new(options: PushoverOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn build_form(&self, message: &NotificationMessage) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("token", self.options.api_token.clone()),
            ("user", self.options.user_key.clone()),
            ("message", message.body.clone()),
        ];
        if !self.options.devices.is_empty() {
            form.push(("device", self.options.devices.join(",")));
        }
        if let Some(title) = &self.options.title {
            form.push(("title", title.clone()));
        }
        form
    }
}

#[async_trait]
impl NotificationProvider for PushoverProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(&self.options.api_url)
            .form(&self.build_form(message));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "pushover"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::require(self.name(), &self.options.id, "api_token", &self.options.api_token)?;
        provider::require(self.name(), &self.options.id, "user_key", &self.options.user_key)?;
        provider::parse_http_url(self.name(), &self.options.id, "api_url", &self.options.api_url)?;
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
    fn test_form_fields() {
        let p = PushoverProvider::new(
            PushoverOptions {
                id: "phone".to_string(),
                api_token: "app".to_string(),
                user_key: "user".to_string(),
                devices: vec!["iphone".to_string(), "pixel".to_string()],
                title: Some("notify-relay".to_string()),
                ..Default::default()
            },
            reqwest::Client::new(),
        );
        let message = NotificationMessage {
            body: "done".to_string(),
            data: "done".to_string(),
            count: 1,
        };

        assert_eq!(
            p.build_form(&message),
            vec![
                ("token", "app".to_string()),
                ("user", "user".to_string()),
                ("message", "done".to_string()),
                ("device", "iphone,pixel".to_string()),
                ("title", "notify-relay".to_string()),
            ]
        );
        assert!(p.validate_config().is_ok());
    }
}
