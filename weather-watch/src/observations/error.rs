//! Observation fetch error types.

use crate::http::HttpSetupError;

/// Errors from fetching one station's latest observation.
///
/// These never fail a decision cycle; the engine logs them and drops
/// the station for that cycle.
#[derive(Debug, thiserror::Error)]
pub enum ObservationError {
    /// HTTP request failed (network error, connection refused, etc.)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request exceeded its connect or read timeout
    #[error("request timed out")]
    Timeout,

    /// Client could not be constructed
    #[error(transparent)]
    Setup(#[from] HttpSetupError),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The body was not a valid observation
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

impl From<reqwest::Error> for ObservationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ObservationError::Timeout
        } else {
            ObservationError::Http(err)
        }
    }
}
