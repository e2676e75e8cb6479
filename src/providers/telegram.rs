//! Telegram Bot API `sendMessage`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ProviderError;
use super::provider::{self, NotificationMessage, NotificationProvider, NotificationResult};

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramOptions {
    pub id: String,
    pub api_key: String,
    pub chat_id: String,
    /// `Markdown`, `MarkdownV2` or `HTML`; unset or `None` sends plain text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for TelegramOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            api_key: String::new(),
            chat_id: String::new(),
            parse_mode: None,
            api_url: default_api_url(),
            format: None,
        }
    }
}

pub struct TelegramProvider {
    options: TelegramOptions,
    client: reqwest::Client,
}

impl TelegramProvider {
    pub fn new(options: TelegramOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    fn parse_mode(&self) -> Option<&str> {
        self.options
            .parse_mode
            .as_deref()
            .filter(|mode| !mode.is_empty() && !mode.eq_ignore_ascii_case("none"))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.options.api_url.trim_end_matches('/'),
            self.options.api_key
        )
    }

    fn build_payload(&self, message: &NotificationMessage) -> serde_json::Value {
        let mode = self.parse_mode();
        // Legacy Markdown treats a bare underscore as an italic marker
        let text = if mode == Some("Markdown") {
            message.body.replace('_', "\\_")
        } else {
            message.body.clone()
        };

        let mut body = json!({
            "chat_id": self.options.chat_id,
            "text": text,
        });
        if let Some(mode) = mode {
            body["parse_mode"] = json!(mode);
        }
        body
    }
}

#[async_trait]
impl NotificationProvider for TelegramProvider {
    async fn send(&self, message: &NotificationMessage) -> Result<NotificationResult, ProviderError> {
        let request = self
            .client
            .post(self.endpoint())
            .json(&self.build_payload(message));
        Ok(provider::execute(request).await)
    }

    fn name(&self) -> &'static str {
        "telegram"
    }

    fn id(&self) -> &str {
        &self.options.id
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        provider::require(self.name(), &self.options.id, "api_key", &self.options.api_key)?;
        provider::require(self.name(), &self.options.id, "chat_id", &self.options.chat_id)?;
        provider::parse_http_url(self.name(), &self.options.id, "api_url", &self.options.api_url)?;

        if let Some(mode) = self.parse_mode()
            && !matches!(mode, "Markdown" | "MarkdownV2" | "HTML")
        {
            return Err(ProviderError::invalid_config(
                self.name(),
                &self.options.id,
                "parse_mode must be one of: None, Markdown, MarkdownV2, HTML",
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

    fn provider(parse_mode: Option<&str>) -> TelegramProvider {
        TelegramProvider::new(
            TelegramOptions {
                id: "tg".to_string(),
                api_key: "123:ABC".to_string(),
                chat_id: "-10042".to_string(),
                parse_mode: parse_mode.map(str::to_string),
                ..Default::default()
            },
            reqwest::Client::new(),
        )
    }

    fn message(body: &str) -> NotificationMessage {
        NotificationMessage {
            body: body.to_string(),
            data: body.to_string(),
            count: 1,
        }
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            provider(None).endpoint(),
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );
    }

    #[test]
    fn test_plain_text_by_default() {
        for mode in [None, Some("None"), Some("")] {
            let payload = provider(mode).build_payload(&message("snake_case"));
            assert_eq!(payload, json!({ "chat_id": "-10042", "text": "snake_case" }));
        }
    }

    #[test]
    fn test_markdown_escapes_underscores() {
        let payload = provider(Some("Markdown")).build_payload(&message("a_b_c"));
        assert_eq!(payload["text"], "a\\_b\\_c");
        assert_eq!(payload["parse_mode"], "Markdown");

        let payload = provider(Some("HTML")).build_payload(&message("a_b"));
        assert_eq!(payload["text"], "a_b");
    }

    #[test]
    fn test_validate_config() {
        assert!(provider(None).validate_config().is_ok());
        assert!(provider(Some("MarkdownV2")).validate_config().is_ok());
        assert!(provider(Some("rich")).validate_config().is_err());

        let mut options = provider(None).options;
        options.chat_id.clear();
        let p = TelegramProvider::new(options, reqwest::Client::new());
        assert!(p.validate_config().is_err());
    }
}
