//! Command handlers for CLI operations
//!
//! Handlers hold the merged settings and carry out one command each.

pub mod check;
pub mod send;

pub use check::CheckCommandHandler;
pub use send::SendCommandHandler;

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::http::build_client;
use crate::providers::{ProviderFilter, ProviderRegistry};

/// Providers selected by the `[relay]` filters, validated
fn build_registry(config: &Settings) -> AppResult<ProviderRegistry> {
    let filter = ProviderFilter::new(config.relay.providers.clone(), config.relay.ids.clone())?;
    let client = build_client(&config.http)?;
    Ok(ProviderRegistry::from_settings(&config.providers, &filter, client)?)
}
