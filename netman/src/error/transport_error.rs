//! Transport-level failures.

use thiserror::Error;

/// Errors reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client failed (DNS, TLS, connect, read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to reach the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The transport let go of the request without ever completing it.
    #[error("transport dropped the request without completing it")]
    Dropped,

    /// No async runtime was available to drive the request.
    #[error("no async runtime available: {0}")]
    Runtime(String),
}

impl TransportError {
    /// Returns the HTTP status code if the underlying client captured one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_has_no_status() {
        let err = TransportError::Connection("connection refused".to_string());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "Connection failed: connection refused");
    }

    #[test]
    fn test_dropped_message() {
        assert_eq!(TransportError::Dropped.status_code(), None);
        assert_eq!(
            TransportError::Dropped.to_string(),
            "transport dropped the request without completing it"
        );
    }
}
