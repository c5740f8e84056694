use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::cli::{ConfigSubcommand, RemoteArgs};
use crate::store::ConfigStore;

const KEYS: &str = "repository, branch, api_url";

pub fn run(remote: &RemoteArgs, cmd: ConfigSubcommand) -> Result<ExitCode> {
    let config_dir = remote.config_dir.as_ref();
    match cmd {
        ConfigSubcommand::Show => run_show(remote),
        ConfigSubcommand::Set { key, value } => run_set(config_dir, key, value),
        ConfigSubcommand::Get { key } => run_get(config_dir, key),
    }?;
    Ok(ExitCode::SUCCESS)
}

fn open(config_dir: Option<&PathBuf>) -> Result<ConfigStore> {
    ConfigStore::open(config_dir.map(|p| p.as_path())).context("failed to open configuration")
}

fn run_show(remote: &RemoteArgs) -> Result<()> {
    let store = remote.open_config()?;
    let reference = store.resolve_reference(remote.repository.clone(), remote.branch.clone());
    let api_url = store.resolve_api_url(remote.api_url.clone());

    println!("Config directory: {}", store.root().display());
    println!("Repository:       {}", reference.name());
    println!("Branch:           {}", reference.branch());
    println!("API URL:          {api_url}");
    Ok(())
}

fn run_set(config_dir: Option<&PathBuf>, key: String, value: String) -> Result<()> {
    let mut store = open(config_dir)?;

    let cleared = value.is_empty() || value == "none";
    let new_value = if cleared { None } else { Some(value.clone()) };

    let config = store.config_mut();
    match key.as_str() {
        "repository" => {
            if let Some(repo) = &new_value {
                super::parse_repository(repo)
                    .map_err(|e| anyhow::anyhow!("invalid repository value: {e}"))?;
            }
            config.repository = new_value;
        }
        "branch" => config.branch = new_value,
        "api_url" => config.api_url = new_value,
        _ => anyhow::bail!("unknown config key: {key}\nValid keys: {KEYS}"),
    }

    store.save().context("failed to save config")?;
    if cleared {
        println!("Cleared {key}");
    } else {
        println!("Set {key} = {value}");
    }
    Ok(())
}

fn run_get(config_dir: Option<&PathBuf>, key: String) -> Result<()> {
    let store = open(config_dir)?;

    let config = store.config();
    let value = match key.as_str() {
        "repository" => config.repository.as_deref(),
        "branch" => config.branch.as_deref(),
        "api_url" => config.api_url.as_deref(),
        _ => anyhow::bail!("unknown config key: {key}\nValid keys: {KEYS}"),
    };
    println!("{}", value.unwrap_or("(not set)"));
    Ok(())
}
