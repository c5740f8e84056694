use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ModulesError;
use crate::github::GITHUB_API_URL;
use crate::model::{DEFAULT_BRANCH, DEFAULT_REPOSITORY, GlobalConfig, RepositoryReference};

const CONFIG_FILE: &str = "config.toml";

pub struct ConfigStore {
    root: PathBuf,
    config: GlobalConfig,
}

impl ConfigStore {
    pub fn open(config_dir: Option<&Path>) -> Result<Self, ModulesError> {
        let root = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_config_dir()?,
        };
        let config = load_config(&root)?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GlobalConfig {
        &mut self.config
    }

    pub fn save(&self) -> Result<(), ModulesError> {
        fs::create_dir_all(&self.root).map_err(|source| ModulesError::DirCreate {
            path: self.root.clone(),
            source,
        })?;
        let path = self.root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(&self.config)?;
        fs::write(&path, content).map_err(|source| ModulesError::FileWrite { path, source })?;
        Ok(())
    }

    /// Repository reference from command-line overrides, falling back to
    /// config.toml and then to the built-in defaults.
    pub fn resolve_reference(
        &self,
        repository: Option<String>,
        branch: Option<String>,
    ) -> RepositoryReference {
        let name = repository
            .or_else(|| self.config.repository.clone())
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        let branch = branch
            .or_else(|| self.config.branch.clone())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        RepositoryReference::new(name, branch)
    }

    pub fn resolve_api_url(&self, api_url: Option<String>) -> String {
        api_url
            .or_else(|| self.config.api_url.clone())
            .unwrap_or_else(|| GITHUB_API_URL.to_string())
    }
}

fn default_config_dir() -> Result<PathBuf, ModulesError> {
    dirs::config_dir()
        .map(|d| d.join("nfmod"))
        .ok_or(ModulesError::ConfigDirNotFound)
}

fn load_config(root: &Path) -> Result<GlobalConfig, ModulesError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    let content = fs::read_to_string(&path).map_err(|source| ModulesError::FileRead {
        path: path.clone(),
        source,
    })?;
    let config: GlobalConfig = toml::from_str(&content)?;
    Ok(config)
}
