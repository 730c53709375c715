//! Upstream client error types.

/// Errors from the upstream HTTP client.
///
/// A 404 on the composition, journey-details and disruptions endpoints is
/// not an error: those calls return an empty result instead.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The client has no usable credentials. Raised before any request.
    #[error("upstream client is not configured: {0}")]
    Configuration(String),

    /// Upstream answered with a non-success status.
    #[error("upstream unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    /// The response body did not have the expected shape.
    ///
    /// `body` holds the start of the raw response for diagnosis; it is
    /// not part of the display message.
    #[error("malformed upstream response: {message}")]
    Malformed {
        message: String,
        body: Option<String>,
    },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl UpstreamError {
    /// Whether this error comes from missing credentials.
    pub fn is_configuration(&self) -> bool {
        matches!(self, UpstreamError::Configuration(_))
    }

    /// The HTTP status upstream returned, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Unavailable { status, .. } => Some(*status),
            UpstreamError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UpstreamError::Configuration("NS_API_KEY is not set".into());
        assert_eq!(
            err.to_string(),
            "upstream client is not configured: NS_API_KEY is not set"
        );
        assert!(err.is_configuration());

        let err = UpstreamError::Unavailable {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "upstream unavailable (500): Internal Server Error"
        );
        assert_eq!(err.status(), Some(500));

        let err = UpstreamError::Malformed {
            message: "missing field `payload`".into(),
            body: Some("{\"secret\": true}".into()),
        };
        assert!(err.to_string().contains("missing field `payload`"));
        assert!(!err.to_string().contains("secret"));
        assert!(!err.is_configuration());
    }
}
