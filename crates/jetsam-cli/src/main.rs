//! Jetsam CLI: the `jetsam` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Snapshot { source } => commands::snapshot::run(source),
        Commands::Model { source } => commands::model::run(source),
        Commands::Svg { source, out } => commands::svg::run(source, out),
        Commands::State { source } => commands::state::run(source),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout carries command output.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
