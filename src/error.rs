use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info};

/// Whether an error should abort the whole command or only the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

#[derive(Debug, Error)]
pub enum ModulesError {
    #[error("repository / branch not found: {name} ({branch})\n{url}")]
    RepositoryNotFound {
        name: String,
        branch: String,
        url: String,
    },

    #[error("could not fetch {url}: HTTP {status}")]
    Fetch { status: StatusCode, url: String },

    #[error("tree for {name} ({branch}) is truncated; repositories this large are not supported")]
    UnsupportedTruncatedTree { name: String, branch: String },

    #[error("invalid response from {url}")]
    InvalidResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base64 content from {url}")]
    InvalidContent {
        url: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("unsupported blob encoding '{encoding}' from {url}")]
    UnsupportedEncoding { encoding: String, url: String },

    #[error("blob from {url} decoded to {actual} bytes, expected {expected}")]
    ContentSizeMismatch {
        url: String,
        expected: u64,
        actual: u64,
    },

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("module '{name}' not found in list of available modules")]
    ModuleNotFound { name: String },

    #[error("module directory already exists: {}", path.display())]
    ModuleDirectoryExists { path: PathBuf },

    #[error("`{command}` is not yet implemented")]
    NotImplemented { command: &'static str },

    #[error("failed to read file: {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file: {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory: {}", path.display())]
    DirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("failed to determine config directory; set NFMOD_CONFIG_DIR or --config-dir")]
    ConfigDirNotFound,
}

impl ModulesError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ModuleNotFound { .. }
            | Self::ModuleDirectoryExists { .. }
            | Self::NotImplemented { .. } => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// A follow-up suggestion shown to the user after the error itself.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ModuleNotFound { .. } => {
                Some("Use the command `nfmod list` to view available software")
            }
            Self::ModuleDirectoryExists { .. } => {
                Some("To update an existing module, use the command `nfmod update`")
            }
            Self::UnsupportedTruncatedTree { .. } => {
                Some("Point --repository at a smaller modules repository")
            }
            _ => None,
        }
    }

    /// Logs the error followed by its hint, if any.
    pub fn report(&self) {
        error!("{self}");
        self.report_hint();
    }

    fn report_hint(&self) {
        if let Some(hint) = self.hint() {
            info!("{hint}");
        }
    }
}

/// Reports recoverable errors and maps them to `None`; fatal errors are
/// returned after logging their hint, so the caller still prints the error.
pub fn recover<T>(result: Result<T, ModulesError>) -> Result<Option<T>, ModulesError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if !e.is_fatal() => {
            e.report();
            Ok(None)
        }
        Err(e) => {
            e.report_hint();
            Err(e)
        }
    }
}
