//! Error types for TeaFile operations.

use thiserror::Error;

/// Errors that can occur when reading or writing TeaFiles.
#[derive(Debug, Error)]
pub enum TeaError {
    /// The first eight bytes match neither byte order of the magic value.
    #[error("not a tea file: unrecognized magic value {magic:#018x}")]
    NotATeaFile { magic: u64 },

    /// The stream ended inside a fixed-size value.
    #[error("stream truncated while reading {field}")]
    TruncatedStream { field: String },

    /// Structurally invalid data: bad padding, short item, inconsistent section.
    #[error("invalid tea file: {message}")]
    Format { message: String },

    /// A field or value has no primitive representation in an item record.
    #[error("unsupported type for field '{name}': {kind}")]
    UnsupportedType { name: String, kind: String },

    /// An encode-side schema marks no field as the event timestamp.
    #[error("record schema '{schema}' has no timestamp field")]
    MissingTimestampField { schema: String },

    /// An encode-side schema is internally inconsistent.
    #[error("invalid record schema: {message}")]
    InvalidSchema { message: String },

    /// I/O error other than a short read.
    #[error("I/O error on {field}: {source}")]
    Io {
        field: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for TeaFile operations.
pub type Result<T> = std::result::Result<T, TeaError>;

impl TeaError {
    /// Create a Format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a TruncatedStream error.
    pub fn truncated(field: impl Into<String>) -> Self {
        Self::TruncatedStream {
            field: field.into(),
        }
    }

    /// Create an InvalidSchema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Create an UnsupportedType error.
    pub fn unsupported_type(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedType {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Wrap a stream error with the name of the field being transferred.
    ///
    /// Short reads become [`TeaError::TruncatedStream`].
    pub fn io(field: impl Into<String>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::TruncatedStream {
                field: field.into(),
            }
        } else {
            Self::Io {
                field: field.into(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TeaError::format("padding is negative");
        assert_eq!(format!("{err}"), "invalid tea file: padding is negative");

        let err = TeaError::truncated("item start");
        assert_eq!(format!("{err}"), "stream truncated while reading item start");

        let err = TeaError::NotATeaFile { magic: 0x1234 };
        assert_eq!(
            format!("{err}"),
            "not a tea file: unrecognized magic value 0x0000000000001234"
        );
    }

    #[test]
    fn test_io_error_wrapping() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = TeaError::io("section count", eof);
        assert!(matches!(err, TeaError::TruncatedStream { ref field } if field == "section count"));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TeaError::io("item 3", denied);
        assert!(matches!(err, TeaError::Io { ref field, .. } if field == "item 3"));
        assert!(format!("{err}").contains("item 3"));
    }
}
