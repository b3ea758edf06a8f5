//! Application reference parsing.

use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

use crate::source::RepoId;

pub const DEFAULT_HOST: &str = "github.com";

const LATEST: &str = "latest";

/// An application published in a repository's releases.
/// Format: "[host/]owner/repo[@version][#name]", with an optional scheme.
#[derive(Debug, PartialEq, Clone)]
pub struct AppSpec {
    pub host: String,
    pub repo: RepoId,
    pub version: Option<String>,
    pub name: Option<String>,
}

impl AppSpec {
    /// The release item to look for: the explicit name, else the repository name.
    pub fn target_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.repo.repo)
    }
}

impl fmt::Display for AppSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.repo)?;
        if let Some(v) = &self.version {
            write!(f, "@{}", v)?;
        }
        if let Some(n) = &self.name {
            write!(f, "#{}", n)?;
        }
        Ok(())
    }
}

impl FromStr for AppSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s
            .strip_prefix("https://")
            .or_else(|| s.strip_prefix("http://"))
            .unwrap_or(s);

        let (s, name) = match s.split_once('#') {
            Some((_, "")) => {
                return Err(anyhow!(
                    "Invalid format: name after # cannot be empty. Expected 'owner/repo#name'."
                ));
            }
            Some((rest, name)) => (rest, Some(name.to_string())),
            None => (s, None),
        };

        let (s, version) = match s.rfind('@') {
            Some(at_pos) => {
                let (rest, ver) = s.split_at(at_pos);
                let ver = &ver[1..];
                if ver.is_empty() {
                    return Err(anyhow!(
                        "Invalid format: version after @ cannot be empty. Expected 'owner/repo@version'."
                    ));
                }
                // `@latest` is the same as no version
                (rest, Some(ver).filter(|v| *v != LATEST).map(str::to_string))
            }
            None => (s, None),
        };

        let s = s.trim_end_matches('/');
        let (host, repo_part) = match s.split_once('/') {
            Some((host, rest)) if host.contains('.') => (host.to_string(), rest),
            _ => (DEFAULT_HOST.to_string(), s),
        };

        let repo = repo_part
            .parse::<RepoId>()
            .map_err(|e| anyhow!("Invalid app reference {:?}: {}", s, e))?;
        Ok(AppSpec {
            host,
            repo,
            version,
            name,
        })
    }
}
