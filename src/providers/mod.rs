//! Notification providers.
//!
//! Each provider turns one rendered chunk into a single HTTP request through
//! the shared `reqwest::Client`.

mod bark;
mod custom;
mod discord;
mod error;
mod googlechat;
mod gotify;
mod provider;
mod pushover;
mod registry;
mod slack;
mod teams;
mod telegram;

pub use bark::{BarkOptions, BarkProvider};
pub use custom::{CustomOptions, CustomProvider, JSON_STRING_PLACEHOLDER};
pub use discord::{DiscordOptions, DiscordProvider};
pub use error::ProviderError;
pub use googlechat::{GoogleChatOptions, GoogleChatProvider};
pub use gotify::{GotifyOptions, GotifyProvider};
pub use provider::{NotificationMessage, NotificationProvider, NotificationResult};
pub use pushover::{PushoverOptions, PushoverProvider};
pub use registry::{PROVIDER_NAMES, ProviderFilter, ProviderRegistry, ProvidersConfig};
pub use slack::{SlackOptions, SlackProvider};
pub use teams::{TeamsOptions, TeamsProvider};
pub use telegram::{TelegramOptions, TelegramProvider};
