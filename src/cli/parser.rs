//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::build;
use crate::chunker::SplitStrategy;

/// Relay text from stdin or a file to chat and push services
#[derive(Parser, Debug)]
#[command(name = "notify-relay")]
#[command(about = "Relay text from stdin or a file to chat and push notification services")]
#[command(long_about = "
notify-relay reads text from stdin or a file, splits it into messages that fit
the configured character limit and delivers every message, in order, to each
configured provider (Slack, Discord, Telegram, Teams, Google Chat, Pushover,
Gotify, Bark or any custom HTTP endpoint).

EXAMPLES:
    # One message per line to every configured provider
    subfinder -d example.com | notify-relay

    # Send a whole file as few large messages
    notify-relay --data scan.txt --bulk

    # Only the 'ops' Slack entry, with a custom template
    notify-relay --provider slack --id ops --msg-format '[{{count}}] {{data}}' < alerts.txt

    # Show how the input would be split without sending anything
    notify-relay --data scan.txt --bulk --char-limit 2000 --dry-run

    # Validate configuration and list enabled providers
    notify-relay --provider-config ~/notify.toml check
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub send: SendArgs,

    /// Configuration file path
    ///
    /// Use this TOML file instead of config/default.toml and config/local.toml.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Provider configuration file path
    ///
    /// TOML file with one array of tables per provider kind, e.g. [[slack]].
    /// Defaults to $NOTIFY_PROVIDER_CONFIG, then
    /// <user config dir>/notify-relay/provider-config.toml when it exists.
    #[arg(long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub provider_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable logging; only relayed messages are printed
    #[arg(long, global = true, conflicts_with_all = ["verbose", "quiet"])]
    pub silent: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Validate configuration and list the providers that would be used
    Check,
}

/// Options for relaying input (the default action)
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SendArgs {
    /// Read input from this file instead of stdin
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_input_file)]
    pub data: Option<PathBuf>,

    /// Send the input as few large messages instead of one per line
    #[arg(short, long)]
    pub bulk: bool,

    /// Maximum characters per message
    #[arg(long, value_name = "CHARS", value_parser = super::validation::validate_char_limit)]
    pub char_limit: Option<usize>,

    /// How far back from a cut to look for a newline (newline strategy)
    #[arg(long, value_name = "CHARS")]
    pub search_limit: Option<usize>,

    /// Chunking strategy; defaults to newline with --bulk and lines without
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub split_strategy: Option<SplitStrategy>,

    /// Text appended to a line that had to be cut
    #[arg(long, value_name = "TEXT")]
    pub marker: Option<String>,

    /// Seconds to wait between messages
    #[arg(long, value_name = "SECONDS")]
    pub delay: Option<u64>,

    /// Maximum provider requests per second
    #[arg(long, value_name = "N")]
    pub rate_limit: Option<u32>,

    /// Only use these provider kinds (comma separated)
    #[arg(short, long = "provider", value_name = "NAME", value_delimiter = ',', value_parser = super::validation::validate_provider_name)]
    pub providers: Vec<String>,

    /// Only use provider entries with these ids (comma separated)
    #[arg(long = "id", value_name = "ID", value_delimiter = ',')]
    pub ids: Vec<String>,

    /// Message template, e.g. '[{{count}}] {{data}}'
    #[arg(long, value_name = "TEMPLATE")]
    pub msg_format: Option<String>,

    /// HTTP or SOCKS5 proxy for provider requests
    #[arg(long, value_name = "URL", value_parser = super::validation::validate_proxy_url)]
    pub proxy: Option<String>,

    /// Print the messages that would be sent and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Keep ANSI escape sequences in the input
    #[arg(long)]
    pub no_strip_ansi: bool,
}
