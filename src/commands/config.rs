use anyhow::{Result, bail};
use log::debug;
use std::time::Duration;

use crate::runtime::Runtime;
use crate::source::DEFAULT_API_URL;

/// Seconds a transfer may take before it is abandoned.
pub const DEFAULT_TIMEOUT_SECS: u64 = 900;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn load<R: Runtime>(runtime: &R, api_url: Option<String>, timeout_secs: u64) -> Result<Self> {
        if timeout_secs == 0 {
            bail!("timeout must be greater than zero");
        }

        let token = runtime.env_var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        if token.is_some() {
            debug!("Using {} for authentication", TOKEN_ENV);
        }

        Ok(Self {
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
