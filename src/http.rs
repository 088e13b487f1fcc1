//! Shared HTTP client for provider and model requests.

use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::AppError;

/// Default User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("jobmatch/", env!("CARGO_PKG_VERSION"));

/// Build the [`reqwest::Client`] shared by every provider and the model client.
///
/// The client has:
/// - Timeout from config
/// - The configured User-Agent, or [`DEFAULT_USER_AGENT`]
/// - At most 10 redirects
///
/// # Errors
///
/// Returns [`AppError::Http`] if the client cannot be constructed.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, AppError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| AppError::Http(format!("failed to build HTTP client: {e}")))
}

/// Longest body excerpt carried into an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Why a response could not be turned into a body.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ResponseError {
    #[error("failed to read response body: {0}")]
    Body(#[from] reqwest::Error),

    /// Non-success status with the start of the body.
    #[error("HTTP {status}: {excerpt}")]
    Status { status: u16, excerpt: String },
}

impl ResponseError {
    fn status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Status {
            status: status.as_u16(),
            excerpt: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }
}

/// Read a response body, rejecting non-success statuses.
pub(crate) async fn read_success_body(
    response: reqwest::Response,
) -> Result<String, ResponseError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ResponseError::status(status, &body));
    }
    Ok(body)
}
