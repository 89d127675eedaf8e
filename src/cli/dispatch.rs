//! Routes a parsed subcommand to its handler.

use anyhow::Result;

use super::args::{Cli, Commands};
use super::handlers::{self, Session};
use crate::exit::CollabExit;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if configuration loading or the command handler fails.
pub fn execute(cli: &Cli, command: &Commands) -> Result<CollabExit> {
    let session = Session::from_cli(cli)?;
    match command {
        Commands::Import { file } => handlers::handle_import(&session, file),
        Commands::Analyze => handlers::handle_analyze(&session),
        Commands::Communities => handlers::handle_communities(&session),
        Commands::Regress => handlers::handle_regress(&session),
        Commands::Stats => handlers::handle_stats(&session),
        Commands::Export { out } => handlers::handle_export(&session, out.as_deref()),
        Commands::Run => handlers::handle_run(&session),
    }
}
