//! Error types for the SurePetcare adapter.

use thiserror::Error;

/// Errors that can occur when talking to the SurePetcare cloud API.
///
/// All of these are fatal to an export run: the tool either produces a
/// complete file or no file. Messy *data* (as opposed to failed transport)
/// never surfaces here; the normalizers absorb it locally.
#[derive(Debug, Error)]
pub enum SurehubError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse a response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed or no session is established.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a response.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SurehubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SurehubError::Timeout
        } else if err.is_connect() {
            SurehubError::Connection(err.to_string())
        } else {
            SurehubError::Http(err.to_string())
        }
    }
}
