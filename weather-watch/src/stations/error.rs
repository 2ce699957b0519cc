//! Station catalog error types.

use crate::http::HttpSetupError;

/// Errors that can occur when fetching or ranking the station catalog.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client could not be constructed
    #[error(transparent)]
    Setup(#[from] HttpSetupError),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the catalog envelope
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The catalog was fetched but contained no usable stations
    #[error("no stations found")]
    NoStations,
}
