//! Layered error types for the request pipeline.
//!
//! Each stage of the pipeline owns one error type, and every one of them
//! folds into [`ApiError`], the closed taxonomy surfaced to callers:
//! - [`EndpointError`] - the request could not be built (`InvalidEndpoint`)
//! - [`BadResponse`] - the server's reply failed validation (`BadServerResponse`)
//! - [`TransportError`] - the transport itself failed (`Network`)
//! - [`DecodeError`] - the body did not match the target schema (`Parsing`)

mod api_error;
mod decode_error;
mod endpoint_error;
mod transport_error;

pub use api_error::{ApiError, BadResponse};
pub use decode_error::{DecodeError, DecodeErrorKind, FormatError, Location};
pub use endpoint_error::{BodyError, EndpointError};
pub use transport_error::TransportError;
