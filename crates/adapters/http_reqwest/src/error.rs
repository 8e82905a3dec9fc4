//! HTTP adapter error types.

use palette_domain::error::ConsoleError;

/// Errors specific to the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The base URL is empty or not an absolute `http(s)` URL.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    /// The reqwest client could not be built.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The request failed before a response was received.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },

    /// The response body is not a valid monitor payload.
    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<HttpError> for ConsoleError {
    fn from(err: HttpError) -> Self {
        Self::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_status_error() {
        let err = HttpError::Status {
            url: "http://palette/rest/monitor".to_string(),
            status: 502,
        };
        assert_eq!(err.to_string(), "http://palette/rest/monitor answered 502");
    }

    #[test]
    fn should_convert_into_transport_error() {
        let err: ConsoleError = HttpError::InvalidUrl(String::new()).into();
        assert!(matches!(err, ConsoleError::Transport(_)));
    }
}
