pub mod check;
pub mod config;
pub mod install;
pub mod list;
pub mod remove;
pub mod update;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::error::{ModulesError, recover};
use crate::github::GitHubClient;
use crate::store::{ConfigStore, ModuleManager};

#[derive(Debug, Parser)]
#[command(
    name = "nfmod",
    about = "Install DSL2 pipeline modules from a GitHub modules repository",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where modules come from, shared by every subcommand.
#[derive(Debug, Args)]
pub struct RemoteArgs {
    /// Modules repository in owner/repo form (default: nf-core/modules)
    #[arg(short, long, global = true, value_parser = parse_repository)]
    pub repository: Option<String>,

    /// Branch of the modules repository (default: master)
    #[arg(short, long, global = true)]
    pub branch: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "NFMOD_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Override the config directory (default: ~/.config/nfmod)
    #[arg(long, env = "NFMOD_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,
}

impl RemoteArgs {
    pub fn open_config(&self) -> Result<ConfigStore> {
        ConfigStore::open(self.config_dir.as_deref()).context("failed to open configuration")
    }

    pub fn open_manager(&self, working_dir: PathBuf) -> Result<ModuleManager<GitHubClient>> {
        let config = self.open_config()?;
        let reference = config.resolve_reference(self.repository.clone(), self.branch.clone());
        let api_url = config.resolve_api_url(self.api_url.clone());
        let client = GitHubClient::new().context("failed to create HTTP client")?;

        Ok(ModuleManager::new(reference, working_dir, client).with_api_url(api_url))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List modules available in the repository
    List,

    /// Install a module into the pipeline's modules/ directory
    Install {
        /// Name of the module (e.g. fastqc, samtools/sort)
        module: String,

        /// Pipeline directory to install into (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Update an installed module
    Update {
        /// Name of the module
        module: String,
    },

    /// Remove an installed module
    Remove {
        /// Name of the module
        module: String,
    },

    /// Check installed modules against the repository
    Check,

    /// Manage global configuration
    #[command(subcommand)]
    Config(ConfigSubcommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (repository, branch, api_url)
        key: String,
        /// Configuration value ("none" clears it)
        value: String,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },
}

pub fn parse_repository(value: &str) -> std::result::Result<String, String> {
    match value.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok(value.to_string())
        }
        _ => Err(format!("'{value}' is not in owner/repo form")),
    }
}

fn working_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(d) => Ok(d),
        None => std::env::current_dir().context("failed to determine current directory"),
    }
}

/// Maps a stubbed command's outcome to an exit code; fatal errors still propagate.
fn report_stub(outcome: std::result::Result<(), ModulesError>) -> Result<ExitCode> {
    match recover(outcome)? {
        Some(()) => Ok(ExitCode::SUCCESS),
        None => Ok(ExitCode::FAILURE),
    }
}
