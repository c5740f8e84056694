use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ModulesError, recover};
use crate::github::{self, GITHUB_API_URL, HttpFetch};
use crate::model::{BlobResponse, FileTreeEntry, RepositoryReference, TreeResponse};

const SOFTWARE_PREFIX: &str = "software/";
const MODULE_ENTRYPOINT: &str = "/main.nf";
const TEST_SEGMENT: &str = "/test/";

/// Everything learned from one tree listing. Replaced as a whole on refetch.
#[derive(Debug, Clone)]
pub struct ModuleTree {
    pub commit_sha: String,
    pub entries: Vec<FileTreeEntry>,
    pub module_names: Vec<String>,
}

impl ModuleTree {
    fn from_response(response: TreeResponse) -> Self {
        let module_names = response
            .tree
            .iter()
            .filter_map(|entry| module_name(&entry.path))
            .map(str::to_string)
            .collect();

        Self {
            commit_sha: response.sha,
            entries: response.tree,
            module_names,
        }
    }

    pub fn contains_module(&self, name: &str) -> bool {
        self.module_names.iter().any(|m| m == name)
    }
}

/// Files written by a successful install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub module: String,
    pub commit_sha: String,
    pub module_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Discovers and installs modules from one repository into one working directory.
pub struct ModuleManager<F> {
    reference: RepositoryReference,
    working_dir: PathBuf,
    api_url: String,
    client: F,
    tree: Option<ModuleTree>,
}

impl<F: HttpFetch> ModuleManager<F> {
    pub fn new(reference: RepositoryReference, working_dir: impl Into<PathBuf>, client: F) -> Self {
        Self {
            reference,
            working_dir: working_dir.into(),
            api_url: GITHUB_API_URL.to_string(),
            client,
            tree: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn reference(&self) -> &RepositoryReference {
        &self.reference
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The most recently fetched tree, if any.
    #[cfg(test)]
    pub fn tree(&self) -> Option<&ModuleTree> {
        self.tree.as_ref()
    }

    pub fn module_names(&self) -> &[String] {
        self.tree
            .as_ref()
            .map(|t| t.module_names.as_slice())
            .unwrap_or_default()
    }

    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.working_dir.join("modules").join("software").join(name)
    }

    /// Fetches the recursive tree listing and replaces any previous state.
    pub async fn fetch_file_tree(&mut self) -> Result<&ModuleTree, ModulesError> {
        let url = github::tree_url(&self.api_url, &self.reference);
        let response = self.client.get(&url).await?;

        match response.status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(ModulesError::RepositoryNotFound {
                    name: self.reference.name().to_string(),
                    branch: self.reference.branch().to_string(),
                    url,
                });
            }
            status => return Err(ModulesError::Fetch { status, url }),
        }

        let listing: TreeResponse = parse_json(&url, &response.body)?;
        if listing.truncated {
            return Err(ModulesError::UnsupportedTruncatedTree {
                name: self.reference.name().to_string(),
                branch: self.reference.branch().to_string(),
            });
        }

        let tree = ModuleTree::from_response(listing);
        debug!(
            "fetched {} tree entries at {} ({} modules)",
            tree.entries.len(),
            tree.commit_sha,
            tree.module_names.len()
        );
        Ok(&*self.tree.insert(tree))
    }

    /// Refreshes the tree and writes every module name to `out`, one per line.
    pub async fn list_modules(&mut self, out: &mut impl Write) -> Result<usize, ModulesError> {
        self.fetch_file_tree().await?;

        let names = self.module_names();
        if names.is_empty() {
            info!("No available software found in {}", self.reference);
            return Ok(0);
        }

        info!("Software available from {}:", self.reference);
        for name in names {
            writeln!(out, "{name}").map_err(|source| ModulesError::FileWrite {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
        Ok(names.len())
    }

    /// Blob paths under `software/<name>/` in the current tree, mapped to their API URLs.
    ///
    /// Does not fetch; call [`Self::fetch_file_tree`] first.
    pub fn module_file_urls(&self, name: &str) -> BTreeMap<String, String> {
        let prefix = format!("{SOFTWARE_PREFIX}{name}/");
        self.tree
            .iter()
            .flat_map(|t| t.entries.iter())
            .filter(|entry| entry.is_blob() && entry.path.starts_with(&prefix))
            .map(|entry| (entry.path.clone(), entry.url.clone()))
            .collect()
    }

    /// Installs a module, reporting recoverable failures and returning `false` for them.
    #[allow(dead_code)] // the CLI calls try_install so it can print the report
    pub async fn install(&mut self, name: &str) -> Result<bool, ModulesError> {
        Ok(recover(self.try_install(name).await)?.is_some())
    }

    /// Installs a module, returning every failure to the caller.
    ///
    /// Files already written are left in place if a download fails.
    pub async fn try_install(&mut self, name: &str) -> Result<InstallReport, ModulesError> {
        let tree = self.fetch_file_tree().await?;
        if !tree.contains_module(name) {
            return Err(ModulesError::ModuleNotFound {
                name: name.to_string(),
            });
        }
        let commit_sha = tree.commit_sha.clone();
        debug!("installing module '{name}' at modules hash {commit_sha}");

        let module_dir = self.module_dir(name);
        if module_dir.exists() {
            return Err(ModulesError::ModuleDirectoryExists { path: module_dir });
        }

        let files = self.module_file_urls(name);
        if files.is_empty() {
            warn!("module '{name}' has no files to download");
        }
        debug!(
            "fetching module files:\n - {}",
            files.keys().map(String::as_str).collect::<Vec<_>>().join("\n - ")
        );

        let modules_root = self.working_dir.join("modules");
        let mut written = Vec::with_capacity(files.len());
        for (path, url) in &files {
            let local_path = modules_root.join(path);
            self.download_file(&local_path, url).await?;
            written.push(local_path);
        }

        Ok(InstallReport {
            module: name.to_string(),
            commit_sha,
            module_dir,
            files: written,
        })
    }

    /// Fetches one blob and writes its decoded bytes to `local_path`.
    pub async fn download_file(&self, local_path: &Path, url: &str) -> Result<(), ModulesError> {
        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ModulesError::DirCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let response = self.client.get(url).await?;
        if response.status != StatusCode::OK {
            return Err(ModulesError::Fetch {
                status: response.status,
                url: url.to_string(),
            });
        }

        let blob: BlobResponse = parse_json(url, &response.body)?;
        let bytes = decode_blob(url, &blob)?;

        fs::write(local_path, &bytes).map_err(|source| ModulesError::FileWrite {
            path: local_path.to_path_buf(),
            source,
        })?;
        debug!("wrote {} bytes to {}", bytes.len(), local_path.display());
        Ok(())
    }

    pub fn update(&self, _name: &str) -> Result<(), ModulesError> {
        Err(ModulesError::NotImplemented { command: "update" })
    }

    pub fn remove(&self, _name: &str) -> Result<(), ModulesError> {
        Err(ModulesError::NotImplemented { command: "remove" })
    }

    pub fn check_modules(&self) -> Result<(), ModulesError> {
        Err(ModulesError::NotImplemented { command: "check" })
    }
}

/// Module name for a `software/<name>/main.nf` path outside any `test/` directory.
pub fn module_name(path: &str) -> Option<&str> {
    if path.contains(TEST_SEGMENT) {
        return None;
    }
    path.strip_prefix(SOFTWARE_PREFIX)?
        .strip_suffix(MODULE_ENTRYPOINT)
}

fn parse_json<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, ModulesError> {
    serde_json::from_slice(body).map_err(|source| ModulesError::InvalidResponse {
        url: url.to_string(),
        source,
    })
}

fn decode_blob(url: &str, blob: &BlobResponse) -> Result<Vec<u8>, ModulesError> {
    if let Some(encoding) = blob.encoding.as_deref() {
        if encoding != "base64" {
            return Err(ModulesError::UnsupportedEncoding {
                encoding: encoding.to_string(),
                url: url.to_string(),
            });
        }
    }

    // GitHub wraps base64 content at 60 columns.
    let compact: String = blob
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|source| ModulesError::InvalidContent {
            url: url.to_string(),
            source,
        })?;

    if let Some(expected) = blob.size {
        let actual = bytes.len() as u64;
        if actual != expected {
            return Err(ModulesError::ContentSizeMismatch {
                url: url.to_string(),
                expected,
                actual,
            });
        }
    }
    Ok(bytes)
}
