//! Builds the clients commands depend on from a [`Config`].

use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::{http::HttpClient, source::GitHubSource};

use super::config::Config;

const USER_AGENT: &str = concat!("ghdrop/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client with an optional bearer token and a transfer timeout.
pub fn build_http_client(token: Option<&str>, timeout: Duration) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    if let Some(token) = token {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("HTTP client configured with authentication");
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()?;

    Ok(HttpClient::new(client))
}

pub struct Services {
    pub http_client: HttpClient,
    pub source: GitHubSource,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = build_http_client(config.token.as_deref(), config.timeout)?;
        let source = GitHubSource::new(http_client.clone(), &config.api_url);
        Ok(Self {
            http_client,
            source,
        })
    }
}
