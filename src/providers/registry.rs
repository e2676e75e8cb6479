//! Builds the ordered provider list from configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::bark::{BarkOptions, BarkProvider};
use super::custom::{CustomOptions, CustomProvider};
use super::discord::{DiscordOptions, DiscordProvider};
use super::error::ProviderError;
use super::googlechat::{GoogleChatOptions, GoogleChatProvider};
use super::gotify::{GotifyOptions, GotifyProvider};
use super::provider::NotificationProvider;
use super::pushover::{PushoverOptions, PushoverProvider};
use super::slack::{SlackOptions, SlackProvider};
use super::teams::{TeamsOptions, TeamsProvider};
use super::telegram::{TelegramOptions, TelegramProvider};

/// Provider kinds in delivery order
pub const PROVIDER_NAMES: &[&str] = &[
    "slack",
    "discord",
    "telegram",
    "teams",
    "googlechat",
    "pushover",
    "gotify",
    "bark",
    "custom",
];

/// Every configured provider entry, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub slack: Vec<SlackOptions>,
    pub discord: Vec<DiscordOptions>,
    pub telegram: Vec<TelegramOptions>,
    pub teams: Vec<TeamsOptions>,
    pub googlechat: Vec<GoogleChatOptions>,
    pub pushover: Vec<PushoverOptions>,
    pub gotify: Vec<GotifyOptions>,
    pub bark: Vec<BarkOptions>,
    pub custom: Vec<CustomOptions>,
}

impl ProvidersConfig {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of configured entries across all kinds
    pub fn len(&self) -> usize {
        self.slack.len()
            + self.discord.len()
            + self.telegram.len()
            + self.teams.len()
            + self.googlechat.len()
            + self.pushover.len()
            + self.gotify.len()
            + self.bark.len()
            + self.custom.len()
    }
}

/// Which configured entries take part in a run.
///
/// An empty list selects everything on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFilter {
    pub names: Vec<String>,
    pub ids: Vec<String>,
}

impl ProviderFilter {
    pub fn new(names: Vec<String>, ids: Vec<String>) -> Result<Self, ProviderError> {
        let names = names
            .into_iter()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>();

        if let Some(unknown) = names.iter().find(|n| !PROVIDER_NAMES.contains(&n.as_str())) {
            return Err(ProviderError::UnknownProvider(
                unknown.clone(),
                PROVIDER_NAMES.join(", "),
            ));
        }

        Ok(Self { names, ids })
    }

    fn allows_kind(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| n == name)
    }

    fn allows_id(&self, id: &str) -> bool {
        self.ids.is_empty() || self.ids.iter().any(|i| i == id)
    }
}

/// Validated providers in delivery order
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn NotificationProvider>>,
}

impl ProviderRegistry {
    /// Build every entry the filter selects and validate its configuration.
    ///
    /// Kinds follow [`PROVIDER_NAMES`]; entries of one kind keep file order.
    pub fn from_settings(
        config: &ProvidersConfig,
        filter: &ProviderFilter,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let mut providers: Vec<Arc<dyn NotificationProvider>> = Vec::new();

        macro_rules! collect {
            ($field:ident, $name:literal, $provider:ident) => {
                if filter.allows_kind($name) {
                    for options in config.$field.iter().filter(|o| filter.allows_id(&o.id)) {
                        providers.push(Arc::new($provider::new(options.clone(), client.clone())));
                    }
                }
            };
        }

        collect!(slack, "slack", SlackProvider);
        collect!(discord, "discord", DiscordProvider);
        collect!(telegram, "telegram", TelegramProvider);
        collect!(teams, "teams", TeamsProvider);
        collect!(googlechat, "googlechat", GoogleChatProvider);
        collect!(pushover, "pushover", PushoverProvider);
        collect!(gotify, "gotify", GotifyProvider);
        collect!(bark, "bark", BarkProvider);
        collect!(custom, "custom", CustomProvider);

        for provider in &providers {
            provider.validate_config()?;
            tracing::debug!(provider = provider.name(), id = provider.id(), "provider enabled");
        }

        Ok(Self { providers })
    }

    pub fn from_providers(providers: Vec<Arc<dyn NotificationProvider>>) -> Self {
        Self { providers }
    }

    /// Fails with [`ProviderError::NoProviders`] when nothing was selected
    pub fn require_any(self) -> Result<Self, ProviderError> {
        if self.providers.is_empty() {
            return Err(ProviderError::NoProviders);
        }
        Ok(self)
    }

    pub fn providers(&self) -> &[Arc<dyn NotificationProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
