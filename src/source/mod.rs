//! Where release listings come from.

mod github;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::asset::{Asset, Release};

pub use github::{DEFAULT_API_URL, GitHubSource};

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A host that publishes release assets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Source: Send + Sync {
    /// Host name recorded on every asset, e.g. `github.com`.
    fn host(&self) -> &str;

    /// Lists the assets of one release, the latest one when `version` is
    /// `None`. Each asset carries the release tag as its version.
    async fn release_assets(&self, repo: &RepoId, version: Option<String>) -> Result<Vec<Asset>>;

    /// Lists the most recent releases of a repository, newest first.
    async fn list_releases(&self, repo: &RepoId) -> Result<Vec<Release>>;
}
