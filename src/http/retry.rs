//! Which failed requests are worth repeating.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of attempts for one request.
pub const MAX_RETRIES: usize = 3;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Responses that will not change on a second attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NonRetryableError {
    #[error("rate limit exceeded fetching {0}, try again later or set GITHUB_TOKEN")]
    RateLimitExceeded(String),

    #[error("authentication failed fetching {0}, check your GITHUB_TOKEN")]
    AuthenticationFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("access to {0} is forbidden, you may need authentication")]
    Forbidden(String),

    #[error("HTTP {status} fetching {url}")]
    ClientError { status: u16, url: String },
}

/// Maps an error status to its non-retryable kind. Server errors and
/// anything that is not a 4xx return `None`.
pub fn classify_status(status: StatusCode, url: &str) -> Option<NonRetryableError> {
    let url = url.to_string();
    match status {
        StatusCode::UNAUTHORIZED => Some(NonRetryableError::AuthenticationFailed(url)),
        StatusCode::TOO_MANY_REQUESTS => Some(NonRetryableError::RateLimitExceeded(url)),
        StatusCode::NOT_FOUND => Some(NonRetryableError::NotFound(url)),
        StatusCode::FORBIDDEN => Some(NonRetryableError::Forbidden(url)),
        s if s.is_client_error() => Some(NonRetryableError::ClientError {
            status: s.as_u16(),
            url,
        }),
        _ => None,
    }
}

/// Converts an error from `error_for_status()`, tagging responses that
/// should not be retried.
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    let url = error
        .url()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "<unknown url>".to_string());
    match error.status().and_then(|s| classify_status(s, &url)) {
        Some(non_retryable) => anyhow::Error::from(non_retryable),
        None => anyhow::Error::from(error),
    }
}

pub(crate) fn is_retryable(error: &anyhow::Error) -> bool {
    error.downcast_ref::<NonRetryableError>().is_none()
}
