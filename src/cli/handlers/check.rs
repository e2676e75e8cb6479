//! Check command handler
//!
//! Validates configuration and lists the providers a send would use.

use crate::config::settings::Settings;
use crate::error::AppResult;

use super::build_registry;

pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<()> {
        self.config.validate()?;
        let registry = build_registry(&self.config)?;
        let relay = &self.config.relay;

        println!("✓ Configuration is valid");
        println!(
            "✓ Chunking: {} (char limit {}, search limit {}, marker {:?})",
            relay.effective_strategy(),
            relay.char_limit,
            relay.effective_search_limit(),
            relay.marker
        );
        println!("✓ Message format: {}", relay.message_format);
        if let Some(proxy) = &self.config.http.proxy {
            println!("✓ Proxy: {}", proxy);
        }

        if registry.is_empty() {
            println!(
                "! No providers selected ({} configured)",
                self.config.providers.len()
            );
        } else {
            println!("✓ {} provider(s) enabled:", registry.len());
            for provider in registry.providers() {
                println!("    - {} (id: {})", provider.name(), provider.id());
            }
        }

        Ok(())
    }
}
