pub mod config;
pub mod repository;
pub mod tree;

pub use config::GlobalConfig;
pub use repository::{DEFAULT_BRANCH, DEFAULT_REPOSITORY, RepositoryReference};
pub use tree::{BlobResponse, FileTreeEntry, TreeResponse};
