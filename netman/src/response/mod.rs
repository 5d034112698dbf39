//! Response validation and decoding.
//!
//! [`validate`] decides from status and transport error alone whether a reply
//! counts as a success; only then is the body handed to a
//! [`ResponseDecoder`].

mod decoder;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, BadResponse, DecodeError};
use crate::transport::TransportOutcome;

pub use decoder::{JsonDecoder, ResponseDecoder, XmlDecoder, YamlDecoder};

/// Status codes accepted as success; redirects that reach the client count.
const SUCCESS_STATUS: std::ops::Range<u16> = 200..400;

/// A successful reply: the body bytes and the status code they came with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Response body.
    pub data: Bytes,
    /// HTTP status code, always in `200..400`.
    pub status_code: u16,
}

impl ApiResponse {
    /// Decodes the body into `T` with `decoder`.
    ///
    /// ## Errors
    ///
    /// Returns the decoder's structured error if the body does not match `T`.
    pub fn decode_with<T, D>(&self, decoder: &D) -> Result<T, DecodeError>
    where
        T: DeserializeOwned,
        D: ResponseDecoder + ?Sized,
    {
        decoder.decode(&self.data)
    }
}

/// Validates a transport outcome before any decoding happens.
///
/// Checks, in order: a transport error, a missing response head, a status
/// outside `200..400`, a missing body. A body received with a failing status
/// is still a failure.
///
/// ## Errors
///
/// - [`ApiError::Network`] when the transport reported an error.
/// - [`ApiError::BadServerResponse`] for every other rejection.
pub fn validate(outcome: TransportOutcome) -> Result<ApiResponse, ApiError> {
    if let Some(error) = outcome.error {
        return Err(ApiError::Network(error));
    }

    let Some(head) = outcome.response else {
        return Err(BadResponse::MissingResponse.into());
    };

    if !SUCCESS_STATUS.contains(&head.status) {
        return Err(BadResponse::Status {
            status: head.status,
        }
        .into());
    }

    let Some(data) = outcome.data else {
        return Err(BadResponse::MissingBody {
            status: head.status,
        }
        .into());
    };

    Ok(ApiResponse {
        data,
        status_code: head.status,
    })
}
