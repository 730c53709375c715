//! Station directory error types.

/// Errors that can occur when fetching the station directory.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No usable subscription key
    #[error("station directory not configured: {0}")]
    Configuration(String),

    /// Authentication failed
    #[error("unauthorized: check NS_API_KEY")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
