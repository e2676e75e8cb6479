//! Gotify `/message` endpoint.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotifyOptions {
    pub id: String,
    /// Base URL including scheme and port, e.g. `https://gotify.example.com:8443`
    pub server_url: String,
    /// Application token
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Title shown above every message from this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

pub struct GotifyProvider {
    options: GotifyOptions,
    client: reqwest::Client,
}

impl GotifyProvider {
    pub fn new(options: GotifyOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn endpoint(&self) -> Result<Url, ProviderError> {
        let raw = format!("{}/message", self.options.server_url.trim_end_matches('/'));
        let mut url = provider::parse_http_url(self.name(), &self.options.id, "server_url", &raw)?;
        url.query_pairs_mut().append_pair("token", &self.options.token);
        Ok(url)
    }

    fn build_payload(&self, message: &NotificationMessage) -> serde_json::Value {
        let mut body = json!({ "message": message.body });
        if let Some(title) = &self.options.title {
            body["title"] = json!(title);
        }
        if let Some(priority) = self.options.priority {
            body["priority"] = json!(priority);
        }
        body
    }
}

#[async_trait]
impl NotificationProvider for GotifyProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(self.endpoint()?)
            .json(&self.build_payload(message));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "gotify"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::require(self.name(), &self.options.id, "token", &self.options.token)?;
        self.endpoint().map(|_| ())
    }

    fn format(&self) -> Option<&str> {
        self.options.format.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(server_url: &str) -> GotifyProvider {
        GotifyProvider::new(
            GotifyOptions {
                id: "home".to_string(),
                server_url: server_url.to_string(),
                token: "secret".to_string(),
                priority: Some(5),
                title: Some("notify-relay".to_string()),
                format: None,
            },
            reqwest::Client::new(),
        )
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        for server in ["https://gotify.example.com", "https://gotify.example.com/"] {
            assert_eq!(
                provider(server).endpoint().unwrap().as_str(),
                "https://gotify.example.com/message?token=secret"
            );
        }
    }

    #[test]
    fn test_payload() {
        let message = NotificationMessage {
            body: "up".to_string(),
            data: "up".to_string(),
            count: 1,
        };
        assert_eq!(
            provider("https://gotify.example.com").build_payload(&message),
            json!({ "message": "up", "title": "notify-relay", "priority": 5 })
        );
    }

    #[test]
    fn test_title_from_entry() {
        let options: GotifyOptions = toml::from_str(
            r#"
id = "ci"
server_url = "https://gotify.example.com"
token = "secret"
title = "nightly build"
"#,
        )
        .unwrap();
        let provider = GotifyProvider::new(options, reqwest::Client::new());
        let message = NotificationMessage {
            body: "green".to_string(),
            data: "green".to_string(),
            count: 2,
        };
        assert_eq!(
            provider.build_payload(&message),
            json!({ "message": "green", "title": "nightly build" })
        );
    }

    #[test]
    fn test_invalid_server() {
        assert!(provider("gotify.example.com").validate_config().is_err());
    }
}
