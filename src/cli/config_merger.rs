//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override file and environment configuration.

use super::parser::Cli;
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of loaded settings
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load settings from the locations the CLI points at
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(path) = &cli.provider_config {
            loader = loader.with_provider_config(path);
        }
        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments into a copy of the base settings and validate it
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        self.apply_global_overrides(&mut config, cli);
        self.apply_send_overrides(&mut config, cli);

        config.validate()?;
        Ok(config)
    }

    fn apply_global_overrides(&self, config: &mut Settings, cli: &Cli) {
        if cli.silent {
            config.logger.level = "off".to_string();
        } else if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if cli.no_color {
            config.logger.console.colored = false;
        }
    }

    fn apply_send_overrides(&self, config: &mut Settings, cli: &Cli) {
        let args = &cli.send;
        let relay = &mut config.relay;

        if args.bulk {
            relay.bulk = true;
        }
        if let Some(limit) = args.char_limit {
            relay.char_limit = limit;
        }
        if let Some(limit) = args.search_limit {
            relay.search_limit = Some(limit);
        }
        if let Some(strategy) = args.split_strategy {
            relay.split_strategy = Some(strategy);
        }
        if let Some(marker) = &args.marker {
            relay.marker = marker.clone();
        }
        if let Some(seconds) = args.delay {
            relay.delay_ms = seconds.saturating_mul(1000);
        }
        if let Some(rate) = args.rate_limit {
            relay.rate_limit = rate;
        }
        if !args.providers.is_empty() {
            relay.providers = args.providers.clone();
        }
        if !args.ids.is_empty() {
            relay.ids = args.ids.clone();
        }
        if let Some(format) = &args.msg_format {
            relay.message_format = format.clone();
        }
        if args.no_strip_ansi {
            relay.strip_ansi = false;
        }

        if let Some(proxy) = &args.proxy {
            config.http.proxy = Some(proxy.clone());
        }
    }
}
