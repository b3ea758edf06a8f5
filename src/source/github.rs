//! GitHub releases API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::asset::{Asset, DEFAULT_HOST, Release};
use crate::http::HttpClient;

use super::{RepoId, Source};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page the releases endpoint serves.
const RELEASES_PER_PAGE: u32 = 100;

/// GitHub API response types (internal).
mod api {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        #[serde(default)]
        pub prerelease: bool,
        pub author: Option<User>,
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub name: String,
        pub size: u64,
        pub browser_download_url: String,
        pub label: Option<String>,
        pub uploader: Option<User>,
        pub created_at: Option<DateTime<Utc>>,
        pub updated_at: Option<DateTime<Utc>>,
    }

    #[derive(Deserialize, Debug)]
    pub struct User {
        pub login: String,
    }
}

pub struct GitHubSource {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubSource {
    pub fn new(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn release_url(&self, repo: &RepoId, version: Option<&str>) -> String {
        match version {
            Some(tag) => format!(
                "{}/repos/{}/{}/releases/tags/{}",
                self.api_url, repo.owner, repo.repo, tag
            ),
            None => format!(
                "{}/repos/{}/{}/releases/latest",
                self.api_url, repo.owner, repo.repo
            ),
        }
    }

    fn releases_url(&self, repo: &RepoId) -> String {
        format!(
            "{}/repos/{}/{}/releases?per_page={}",
            self.api_url, repo.owner, repo.repo, RELEASES_PER_PAGE
        )
    }
}

#[async_trait]
impl Source for GitHubSource {
    fn host(&self) -> &str {
        DEFAULT_HOST
    }

    #[tracing::instrument(skip(self))]
    async fn release_assets(&self, repo: &RepoId, version: Option<String>) -> Result<Vec<Asset>> {
        let url = self.release_url(repo, version.as_deref());
        debug!("Fetching release from {}...", url);

        let release: api::Release = self
            .http_client
            .get_json(&url)
            .await
            .with_context(|| match &version {
                Some(v) => format!("Failed to fetch release {} of {}", v, repo),
                None => format!("Failed to fetch the latest release of {}", repo),
            })?;

        debug!(
            "Release {} of {} has {} assets",
            release.tag_name,
            repo,
            release.assets.len()
        );

        let tag = release.tag_name;
        Ok(release
            .assets
            .into_iter()
            .map(|a| into_asset(a, self.host(), repo, &tag))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn list_releases(&self, repo: &RepoId) -> Result<Vec<Release>> {
        let url = self.releases_url(repo);
        debug!("Fetching releases from {}...", url);

        let releases: Vec<api::Release> = self
            .http_client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to list releases of {}", repo))?;
        debug!("{} has {} releases", repo, releases.len());

        Ok(releases
            .into_iter()
            .map(|r| Release {
                host: self.host().to_string(),
                org: repo.owner.clone(),
                repo: repo.repo.clone(),
                version: r.tag_name,
                author: r.author.map(|u| u.login).unwrap_or_default(),
                prerelease: r.prerelease,
                created_at: r.created_at,
            })
            .collect())
    }
}

fn into_asset(a: api::Asset, host: &str, repo: &RepoId, tag: &str) -> Asset {
    Asset {
        host: host.to_string(),
        org: repo.owner.clone(),
        repo: repo.repo.clone(),
        version: tag.to_string(),
        name: a.name,
        download_url: a.browser_download_url,
        author: a.uploader.map(|u| u.login).unwrap_or_default(),
        size: a.size,
        label: a.label.unwrap_or_default(),
        created_at: a.created_at,
        updated_at: a.updated_at,
        ..Default::default()
    }
}
