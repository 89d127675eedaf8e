use clap::Parser;
use colored::Colorize;
use collabnet_core::cli::{self, Cli};
use collabnet_core::exit::CollabExit;
use tracing_subscriber::EnvFilter;

fn main() -> CollabExit {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command.clone() else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        return CollabExit::Success;
    };

    match cli::dispatch::execute(&cli, &command) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            CollabExit::from(&e)
        }
    }
}

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
