//! Station directory error types.

/// Errors that can occur when loading or querying the station directory.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The station list payload could not be decoded
    #[error("malformed station list: {message}")]
    Format { message: String },

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },

    /// No station with this name, code or romanization
    #[error("station not found: {0}")]
    NotFound(String),
}
