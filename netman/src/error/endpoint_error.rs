//! Request construction errors.

use thiserror::Error;

/// Failure to serialize an endpoint's body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// JSON serialization failed.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A caller-supplied encoder failed for its own reasons.
    #[error("{0}")]
    Custom(String),
}

/// Errors raised while turning an endpoint into a transport request.
///
/// Every variant surfaces to callers as [`ApiError::InvalidEndpoint`](super::ApiError::InvalidEndpoint).
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Neither the endpoint nor the client configuration yields a host.
    #[error("no host could be resolved from the endpoint or the configuration")]
    MissingHost,

    /// URL parsing or assembly failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name is not a valid HTTP token.
    #[error("invalid header name `{0}`")]
    InvalidHeaderName(String),

    /// A header value contains characters HTTP does not allow.
    #[error("invalid value for header `{0}`")]
    InvalidHeaderValue(String),

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Body(#[from] BodyError),
}
