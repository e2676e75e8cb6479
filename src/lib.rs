//! notify-relay library
//!
//! Splits text into messages that fit a provider's character limit and
//! relays them, in order, to chat and push notification services.

use shadow_rs::shadow;
shadow!(build);

pub mod chunker;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod providers;
pub mod relay;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
