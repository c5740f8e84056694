use std::fmt;

pub const DEFAULT_REPOSITORY: &str = "nf-core/modules";
pub const DEFAULT_BRANCH: &str = "master";

/// The remote modules repository and branch a command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    name: String,
    branch: String,
}

impl RepositoryReference {
    pub fn new(name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// Repository in `owner/repo` form.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }
}

impl Default for RepositoryReference {
    fn default() -> Self {
        Self::new(DEFAULT_REPOSITORY, DEFAULT_BRANCH)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.branch)
    }
}
