//! Request body variants and encoders.
//!
//! A [`RequestBody`] is a tagged description of what should be sent; it is
//! only turned into bytes when the request is built. Encoding failures are
//! reported as errors instead of silently sending an empty body.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::BodyError;

/// Serialization options for [`RequestBody::Json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    /// Emit indented, multi-line JSON instead of the compact form.
    pub pretty: bool,
}

impl JsonOptions {
    /// Options producing indented JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Strategy for serializing an arbitrary `Serialize` value into bytes.
///
/// ## Examples
///
/// ```rust,ignore
/// use netman::body::{BodyEncoder, JsonEncoder};
///
/// let bytes = JsonEncoder::default().encode(&vec![1, 2, 3])?;
/// assert_eq!(bytes, b"[1,2,3]");
/// ```
pub trait BodyEncoder: Send + Sync {
    /// Serializes `value`.
    ///
    /// ## Errors
    ///
    /// Returns a [`BodyError`] if the value cannot be represented in the format.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, BodyError>;
}

/// JSON encoder backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    /// Same meaning as [`JsonOptions::pretty`].
    pub pretty: bool,
}

impl BodyEncoder for JsonEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, BodyError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }
}

/// YAML encoder backed by `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlEncoder;

impl BodyEncoder for YamlEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, BodyError> {
        Ok(serde_yaml::to_string(value)?.into_bytes())
    }
}

/// Object-safe view of a value bundled with the encoder that serializes it.
pub trait EncodeBody: fmt::Debug + Send + Sync {
    /// Produces the body bytes.
    ///
    /// ## Errors
    ///
    /// Propagates the encoder's failure.
    fn encode_body(&self) -> Result<Bytes, BodyError>;
}

struct Encodable<T, E> {
    object: T,
    encoder: E,
}

impl<T, E> EncodeBody for Encodable<T, E>
where
    T: Serialize + Send + Sync,
    E: BodyEncoder,
{
    fn encode_body(&self) -> Result<Bytes, BodyError> {
        self.encoder.encode(&self.object).map(Bytes::from)
    }
}

impl<T, E> fmt::Debug for Encodable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encodable")
            .field("object", &std::any::type_name::<T>())
            .field("encoder", &std::any::type_name::<E>())
            .finish()
    }
}

/// The body of an endpoint.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// Bytes sent exactly as given.
    Raw(Bytes),
    /// A keyed JSON object serialized with the given options.
    Json(Map<String, Value>, JsonOptions),
    /// A value serialized by a caller-supplied encoder.
    Encodable(Arc<dyn EncodeBody>),
}

impl RequestBody {
    /// Creates a raw body.
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Self::Raw(bytes.into())
    }

    /// Creates a compact JSON body from a keyed map.
    pub fn json(map: Map<String, Value>) -> Self {
        Self::Json(map, JsonOptions::default())
    }

    /// Creates a JSON body from a keyed map with explicit options.
    pub fn json_with(map: Map<String, Value>, options: JsonOptions) -> Self {
        Self::Json(map, options)
    }

    /// Creates a body that serializes `object` with `encoder` at build time.
    pub fn encodable<T, E>(object: T, encoder: E) -> Self
    where
        T: Serialize + Send + Sync + 'static,
        E: BodyEncoder + 'static,
    {
        Self::Encodable(Arc::new(Encodable { object, encoder }))
    }

    /// Returns `true` if there is nothing to send.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Serializes the body.
    ///
    /// ## Errors
    ///
    /// Returns a [`BodyError`] if the JSON map or the encodable object fails
    /// to serialize.
    pub fn encode(&self) -> Result<Option<Bytes>, BodyError> {
        match self {
            Self::None => Ok(None),
            Self::Raw(bytes) => Ok(Some(bytes.clone())),
            Self::Json(map, options) => {
                let encoder = JsonEncoder {
                    pretty: options.pretty,
                };
                encoder.encode(map).map(|bytes| Some(Bytes::from(bytes)))
            }
            Self::Encodable(body) => body.encode_body().map(Some),
        }
    }
}
