//! Pluggable body deserializers.
//!
//! A [`ResponseDecoder`] turns validated body bytes into any
//! `DeserializeOwned` type, reporting failures as a structured
//! [`DecodeError`]. [`JsonDecoder`] is the client's default.

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Strategy for deserializing a response body.
///
/// ## Examples
///
/// ```rust
/// use netman::response::{JsonDecoder, ResponseDecoder};
///
/// let ids: Vec<u32> = JsonDecoder.decode(b"[1,2]").unwrap();
/// assert_eq!(ids, vec![1, 2]);
/// ```
pub trait ResponseDecoder: Send + Sync {
    /// Decodes `body` into `T`.
    ///
    /// ## Errors
    ///
    /// Returns a [`DecodeError`] describing where and why decoding failed.
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError>;

    /// Returns the media type this decoder understands.
    ///
    /// The client sends it as `accept` when no `accept` header is configured.
    fn content_type(&self) -> &'static str;
}

/// JSON decoder backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(body).map_err(DecodeError::from)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// YAML decoder backed by `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl ResponseDecoder for YamlDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        serde_yaml::from_slice(body).map_err(DecodeError::from)
    }

    fn content_type(&self) -> &'static str {
        "application/yaml"
    }
}

/// XML decoder backed by `quick-xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl ResponseDecoder for XmlDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        quick_xml::de::from_reader(body).map_err(DecodeError::from)
    }

    fn content_type(&self) -> &'static str {
        "application/xml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeErrorKind, FormatError};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Movie {
        id: u64,
        title: String,
    }

    #[test]
    fn test_json_decode() {
        let movie: Movie = JsonDecoder.decode(br#"{"id":1,"title":"X"}"#).unwrap();
        assert_eq!(
            movie,
            Movie {
                id: 1,
                title: "X".to_string()
            }
        );
    }

    #[test]
    fn test_json_schema_mismatch() {
        let err = JsonDecoder.decode::<Movie>(br#"{"id":1}"#).unwrap_err();
        assert!(matches!(err.kind(), DecodeErrorKind::KeyNotFound { key } if key == "title"));
        assert!(matches!(err.format_error(), FormatError::Json(_)));
    }

    #[test]
    fn test_yaml_decode() {
        let movie: Movie = YamlDecoder.decode(b"id: 7\ntitle: Heat\n").unwrap();
        assert_eq!(movie.id, 7);
        assert_eq!(movie.title, "Heat");
    }

    #[test]
    fn test_yaml_type_mismatch() {
        let err = YamlDecoder.decode::<Movie>(b"id: seven\ntitle: Heat\n").unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::TypeMismatch);
    }

    #[test]
    fn test_xml_decode() {
        let movie: Movie = XmlDecoder
            .decode(b"<movie><id>3</id><title>Alien</title></movie>")
            .unwrap();
        assert_eq!(movie.id, 3);
        assert_eq!(movie.title, "Alien");
    }

    #[test]
    fn test_xml_missing_key() {
        let err = XmlDecoder
            .decode::<Movie>(b"<movie><id>3</id></movie>")
            .unwrap_err();
        assert!(matches!(err.kind(), DecodeErrorKind::KeyNotFound { key } if key == "title"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(JsonDecoder.content_type(), "application/json");
        assert_eq!(YamlDecoder.content_type(), "application/yaml");
        assert_eq!(XmlDecoder.content_type(), "application/xml");
    }
}
