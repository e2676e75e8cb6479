//! Command executor for dispatching CLI commands

use super::handlers::{CheckCommandHandler, SendCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;

/// Execute the parsed command with merged settings.
///
/// Without a subcommand the input is relayed.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Some(Commands::Check) => CheckCommandHandler::new(settings).execute().await,
        None => {
            SendCommandHandler::new(settings, cli.send.clone())
                .execute()
                .await
        }
    }
}
