use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod github;
mod model;
mod store;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "nfmod=debug" } else { "nfmod=info" })
        }))
        .with_writer(std::io::stderr)
        .init();

    let remote = &cli.remote;
    match cli.command {
        cli::Command::List => cli::list::run(remote).await,
        cli::Command::Install { module, dir } => cli::install::run(remote, module, dir).await,
        cli::Command::Update { module } => cli::update::run(remote, module),
        cli::Command::Remove { module } => cli::remove::run(remote, module),
        cli::Command::Check => cli::check::run(remote),
        cli::Command::Config(cmd) => cli::config::run(remote, cmd),
    }
}
