//! `workbench` command-line front end.
//!
//! Each subcommand drives an `editor_state::Session` the same way an editing
//! surface would: load a file, query or transform it, save it.
//!
//! Logs go to stderr so command output on stdout stays pipeable.
//! `RUST_LOG` takes precedence over `--log-level`.

mod commands;
mod config;
mod errors;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> std::process::ExitCode {
    let cli = config::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    match commands::run(&cli.config, cli.command, &mut stdout.lock()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "command failed");
            std::process::ExitCode::FAILURE
        }
    }
}
