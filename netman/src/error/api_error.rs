//! Top-level API error type.

use super::{DecodeError, EndpointError, TransportError};
use std::fmt;
use thiserror::Error;

/// Why a response was rejected before any decoding took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadResponse {
    /// The transport reported neither an error nor a response head.
    MissingResponse,
    /// The response head arrived but no body bytes came with it.
    MissingBody {
        /// Status code of the bodiless response.
        status: u16,
    },
    /// The status code fell outside `200..400`.
    Status {
        /// The rejected status code.
        status: u16,
    },
}

impl BadResponse {
    /// Returns the status code carried by the rejected response, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::MissingResponse => None,
            Self::MissingBody { status } | Self::Status { status } => Some(*status),
        }
    }
}

impl fmt::Display for BadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingResponse => write!(f, "no response received"),
            Self::MissingBody { status } => write!(f, "HTTP {status} without a body"),
            Self::Status { status } => write!(f, "unexpected HTTP status {status}"),
        }
    }
}

/// Top-level error type for every request shape (raw, decoded, mapped).
///
/// The set of variants is closed: the first stage that fails terminates the
/// pipeline and reports one of these. Nothing is retried internally.
///
/// ## Examples
///
/// ```rust,ignore
/// use netman::ApiError;
///
/// fn handle_error(err: ApiError) {
///     match err {
///         ApiError::InvalidEndpoint(e) => eprintln!("Cannot build request: {e}"),
///         ApiError::BadServerResponse(e) => eprintln!("Rejected response: {e}"),
///         ApiError::Network(e) => eprintln!("Network error: {e}"),
///         ApiError::Parsing(e) => eprintln!("Invalid payload: {}", e.detail()),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// No resolvable host, or some other part of the endpoint could not be
    /// turned into a request.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] EndpointError),

    /// Missing response/body, or a status code outside `200..400`.
    #[error("Bad server response: {0}")]
    BadServerResponse(BadResponse),

    /// Transport-level failure (connectivity, TLS, dropped request).
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// The response body could not be deserialized into the target type.
    #[error("Parsing failed: {0}")]
    Parsing(#[from] DecodeError),
}

impl ApiError {
    /// Returns the HTTP status code associated with this error, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadServerResponse(reason) => reason.status_code(),
            Self::Network(e) => e.status_code(),
            _ => None,
        }
    }

    /// Returns `true` if the request never left the client.
    pub fn is_invalid_endpoint(&self) -> bool {
        matches!(self, Self::InvalidEndpoint(_))
    }

    /// Returns `true` if the server's reply was rejected before decoding.
    pub fn is_bad_server_response(&self) -> bool {
        matches!(self, Self::BadServerResponse(_))
    }

    /// Returns `true` if the transport failed.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` if the body failed to decode.
    pub fn is_parsing(&self) -> bool {
        matches!(self, Self::Parsing(_))
    }
}

impl From<BadResponse> for ApiError {
    fn from(reason: BadResponse) -> Self {
        Self::BadServerResponse(reason)
    }
}
