//! Shared HTTP client construction for the upstream weather API.
//!
//! Every request must carry an identifying `User-Agent` (application
//! name plus a contact address); the upstream rejects anonymous clients.

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

/// Default base URL for the weather data API.
pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default overall request timeout (covers reading the body).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors building an HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    /// The user agent contains characters not allowed in a header
    #[error("invalid user agent header: {0:?}")]
    InvalidUserAgent(String),

    /// reqwest failed to build the client
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Identifying `User-Agent` value: `"<app>/<version> (<contact>)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent(String);

impl UserAgent {
    pub fn new(app: &str, contact: &str) -> Self {
        Self(format!("{app} ({contact})"))
    }

    /// User agent naming this crate and its version.
    pub fn for_contact(contact: &str) -> Self {
        let app = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
        Self::new(app, contact)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build a client that sends the identifying headers on every request.
pub fn build_client(
    user_agent: &UserAgent,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<reqwest::Client, HttpSetupError> {
    let mut headers = HeaderMap::new();

    let ua = HeaderValue::from_str(user_agent.as_str())
        .map_err(|_| HttpSetupError::InvalidUserAgent(user_agent.to_string()))?;
    headers.insert(USER_AGENT, ua);
    headers.insert(ACCEPT, HeaderValue::from_static("application/geo+json"));

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .build()?;

    Ok(client)
}

/// Truncate a response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(500).collect()
}
