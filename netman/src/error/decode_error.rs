//! Structured deserialization failures.

use std::fmt;
use thiserror::Error;

/// The format-specific error that caused a decode failure.
#[derive(Debug, Error)]
pub enum FormatError {
    /// JSON deserialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML deserialization failed.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// XML deserialization failed.
    #[error(transparent)]
    Xml(#[from] quick_xml::DeError),
}

/// What went wrong while decoding, independent of the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A value was present but had the wrong type or shape.
    TypeMismatch,
    /// A required value was null or empty.
    ValueNotFound,
    /// A required key was absent.
    KeyNotFound {
        /// The missing key.
        key: String,
    },
    /// The payload is not well-formed for the format at all.
    DataCorrupted,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::ValueNotFound => write!(f, "value not found"),
            Self::KeyNotFound { key } => write!(f, "key `{key}` not found"),
            Self::DataCorrupted => write!(f, "data corrupted"),
        }
    }
}

/// Position in the payload where decoding stopped (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Line number.
    pub line: usize,
    /// Column number.
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A decode failure with enough structure to log a useful description.
///
/// ## Examples
///
/// ```rust,ignore
/// use netman::error::{DecodeError, DecodeErrorKind};
///
/// let err = serde_json::from_str::<u64>("\"x\"").unwrap_err();
/// let err = DecodeError::from(err);
/// assert_eq!(err.kind(), &DecodeErrorKind::TypeMismatch);
/// ```
#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    location: Option<Location>,
    #[source]
    source: FormatError,
}

impl DecodeError {
    /// Returns the format-independent failure category.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Returns where in the payload decoding failed, when the format reports it.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns the underlying format error.
    pub fn format_error(&self) -> &FormatError {
        &self.source
    }

    /// Human-readable description of the failure, including its location.
    ///
    /// This is the text written to the logger when decoding fails.
    pub fn detail(&self) -> String {
        let message = self.source.to_string();
        let message = strip_position(&message);
        let at = match self.location {
            Some(location) => format!(" at {location}"),
            None => String::new(),
        };

        match &self.kind {
            DecodeErrorKind::TypeMismatch => format!("Type mismatch{at}: {message}"),
            DecodeErrorKind::ValueNotFound => format!("Value not found{at}: {message}"),
            DecodeErrorKind::KeyNotFound { key } => format!("Key `{key}` not found{at}: {message}"),
            DecodeErrorKind::DataCorrupted => format!("Data corrupted{at}: {message}"),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let kind = match err.classify() {
            Category::Data => classify(&err.to_string()),
            Category::Syntax | Category::Eof | Category::Io => DecodeErrorKind::DataCorrupted,
        };
        let location = (err.line() > 0).then(|| Location {
            line: err.line(),
            column: err.column(),
        });

        Self {
            kind,
            location,
            source: FormatError::Json(err),
        }
    }
}

impl From<serde_yaml::Error> for DecodeError {
    fn from(err: serde_yaml::Error) -> Self {
        let kind = classify(&err.to_string());
        let location = err.location().map(|l| Location {
            line: l.line(),
            column: l.column(),
        });

        Self {
            kind,
            location,
            source: FormatError::Yaml(err),
        }
    }
}

impl From<quick_xml::DeError> for DecodeError {
    fn from(err: quick_xml::DeError) -> Self {
        Self {
            kind: classify(&err.to_string()),
            location: None,
            source: FormatError::Xml(err),
        }
    }
}

/// Maps serde's data-error messages onto a [`DecodeErrorKind`].
///
/// serde's `de::Error` helpers produce stable message prefixes, which is the
/// only format-independent signal available.
fn classify(message: &str) -> DecodeErrorKind {
    if let Some((_, rest)) = message.split_once("missing field `") {
        let key = rest.split('`').next().unwrap_or_default().to_string();
        return DecodeErrorKind::KeyNotFound { key };
    }
    if message.contains("invalid type: null") || message.contains("invalid type: unit value") {
        return DecodeErrorKind::ValueNotFound;
    }

    const MISMATCH: [&str; 4] = [
        "invalid type",
        "invalid value",
        "invalid length",
        "unknown variant",
    ];
    if MISMATCH.iter().any(|marker| message.contains(marker)) {
        DecodeErrorKind::TypeMismatch
    } else {
        DecodeErrorKind::DataCorrupted
    }
}

/// Drops the trailing " at line X column Y" the formats append to messages.
fn strip_position(message: &str) -> &str {
    match message.rsplit_once(" at line ") {
        Some((head, _)) => head,
        None => message,
    }
}
