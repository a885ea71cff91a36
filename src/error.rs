//! Error handling

use std::time::Duration;

/// Everything that can go wrong during a staging run.
#[derive(Debug)]
pub enum StageError {
    /// Missing or invalid configuration
    Config(String),
    /// Connection failures, request timeouts and the like
    Network(reqwest::Error),
    /// The server answered with a non-success status
    Status {
        /// The URL requested
        url: String,
        /// What came back
        status: reqwest::StatusCode,
    },
    /// A response body that isn't the JSON we expected
    Json(serde_json::Error),
    /// Flickr decoded fine but reported a failure, eg a bad API key
    Api {
        /// The `stat` field, usually "fail"
        stat: String,
        /// Flickr's error message, if it sent one
        message: String,
    },
    /// Image bytes we couldn't decode or encode
    Decode(image::ImageError),
    /// Filesystem failures
    Io(std::io::Error),
    /// The searches came back without any photos
    EmptyResults,
    /// A phase ran past its deadline
    Timeout {
        /// Which phase, "search" or "download"
        phase: &'static str,
        /// The deadline it missed
        after: Duration,
    },
    /// A worker task panicked or was cancelled
    Task(String),
}

impl StageError {
    /// Whether trying the same request again could plausibly work.
    pub fn is_transient(&self) -> bool {
        match self {
            // a body cut off mid-read surfaces as a body or decode error
            Self::Network(err) => {
                err.is_timeout()
                    || err.is_connect()
                    || err.is_request()
                    || err.is_body()
                    || err.is_decode()
            }
            Self::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            Self::Timeout { .. } => true,
            Self::Config(_)
            | Self::Json(_)
            | Self::Api { .. }
            | Self::Decode(_)
            | Self::Io(_)
            | Self::EmptyResults
            | Self::Task(_) => false,
        }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Network(err) => write!(f, "Network error: {err}"),
            Self::Status { url, status } => write!(f, "{url} responded with {status}"),
            Self::Json(err) => write!(f, "Failed to parse search response: {err}"),
            Self::Api { stat, message } => {
                write!(f, "Flickr returned stat={stat}: {message}")
            }
            Self::Decode(err) => write!(f, "Image error: {err}"),
            Self::Io(err) => write!(f, "Filesystem error: {err}"),
            Self::EmptyResults => write!(f, "Photo list is empty"),
            Self::Timeout { phase, after } => {
                write!(f, "The {phase} phase timed out after {after:?}")
            }
            Self::Task(msg) => write!(f, "Worker task failed: {msg}"),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StageError {
    fn from(err: reqwest::Error) -> Self {
        StageError::Network(err)
    }
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        StageError::Json(err)
    }
}

impl From<image::ImageError> for StageError {
    fn from(err: image::ImageError) -> Self {
        StageError::Decode(err)
    }
}

impl From<std::io::Error> for StageError {
    fn from(err: std::io::Error) -> Self {
        StageError::Io(err)
    }
}

impl From<url::ParseError> for StageError {
    fn from(err: url::ParseError) -> Self {
        StageError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StageError {
    fn from(err: tokio::task::JoinError) -> Self {
        StageError::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        let err = StageError::Status {
            url: "http://example.org/".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert!(err.is_transient());
        let err = StageError::Status {
            url: "http://example.org/".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(!err.is_transient());
        assert!(!StageError::EmptyResults.is_transient());
        assert!(
            StageError::Timeout {
                phase: "download",
                after: Duration::from_secs(5),
            }
            .is_transient()
        );
    }

    #[tokio::test]
    async fn test_refused_connection_is_transient() {
        // nothing listens on port 9 locally
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .map_err(StageError::from)
            .expect_err("connection should be refused");
        assert!(matches!(err, StageError::Network(_)));
        assert!(err.is_transient());
    }
}
