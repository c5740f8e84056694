use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule pointer; has no content of its own.
    Commit,
}

/// One entry of a recursive git tree listing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FileTreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub url: String,
    pub sha: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl FileTreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

/// Body of `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    pub sha: String,
    pub tree: Vec<FileTreeEntry>,
    pub truncated: bool,
}

/// Body of `GET /repos/{owner}/{repo}/git/blobs/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobResponse {
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}
