//! Send command handler
//!
//! Reads the input, then either previews the chunks (dry run) or relays them.

use crate::cli::parser::SendArgs;
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::relay::{InputSource, Relay, RelayReport, read_input};

use super::build_registry;

pub struct SendCommandHandler {
    config: Settings,
    args: SendArgs,
}

impl SendCommandHandler {
    pub fn new(config: Settings, args: SendArgs) -> Self {
        Self { config, args }
    }

    pub async fn execute(&self) -> AppResult<()> {
        let source = InputSource::detect(self.args.data.clone())?;
        let text = read_input(&source).await?;

        if self.args.dry_run {
            return self.preview(&text);
        }

        let report = self.relay(&text).await?;
        if report.is_success() {
            Ok(())
        } else {
            Err(AppError::Delivery {
                failed: report.failures.len(),
                attempted: report.delivered + report.failures.len(),
            })
        }
    }

    /// Deliver `text` to every selected provider
    pub async fn relay(&self, text: &str) -> AppResult<RelayReport> {
        let registry = build_registry(&self.config)?.require_any()?;
        Relay::from_settings(&self.config.relay, registry).run(text).await
    }

    /// Print the chunks `text` would be sent as
    pub fn preview(&self, text: &str) -> AppResult<()> {
        let registry = build_registry(&self.config)?;
        let relay = &self.config.relay;
        let chunks = Relay::from_settings(relay, registry).plan(text)?;

        println!("✓ Configuration is valid");
        println!(
            "✓ Strategy: {} (char limit {}, search limit {})",
            relay.effective_strategy(),
            relay.char_limit,
            relay.effective_search_limit()
        );
        println!("✓ {} message(s) would be sent", chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            println!(
                "--- message {}/{} ({} chars) ---",
                index + 1,
                chunks.len(),
                chunk.char_len()
            );
            println!("{}", chunk.text);
        }

        println!("Dry run completed - nothing was sent");
        Ok(())
    }
}
