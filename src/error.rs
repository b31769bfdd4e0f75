//! Error model shared by every entry point.
//!
//! Each variant carries the offending values so callers can show the message
//! verbatim; [`ErrorKind`] groups variants for callers that branch on the
//! reason a conversion failed.

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required property '{0}'")]
    MissingField(&'static str),

    #[error("Property '{0}' is null or undefined")]
    NullField(&'static str),

    #[error("Property '{field}' must be {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Argument '{name}' must be {expected}")]
    InvalidArgument {
        name: &'static str,
        expected: &'static str,
    },

    #[error("Property '{field}' must be a positive number (got {value})")]
    NonPositiveDimension { field: &'static str, value: i64 },

    #[error("Image dimensions too large: {field} is {value} (max: {max})")]
    DimensionTooLarge {
        field: &'static str,
        value: i64,
        max: u32,
    },

    #[error("Unsupported dtype: {0}. Only 'uint8' is currently supported.")]
    UnsupportedDtype(String),

    #[error("Unsupported colorSpace: {0}. Supported values: GRAY, RGB, BGR, RGBA, BGRA")]
    UnsupportedColorSpace(String),

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(f64),

    #[error("Cannot determine default colorSpace for {0} channels")]
    UninferableChannels(usize),

    #[error(
        "Cannot infer channels: data.length ({len}) is not divisible by width*height ({pixels})"
    )]
    IndivisibleLength { len: usize, pixels: u64 },

    #[error(
        "Data length mismatch: expected {expected} bytes ({width}x{height}x{channels}), got {actual} bytes"
    )]
    SizeMismatch {
        expected: u64,
        actual: usize,
        width: u32,
        height: u32,
        channels: usize,
    },

    #[error("Image data too large: {bytes} bytes (max: {max} bytes)")]
    CapacityExceeded { bytes: u64, max: u64 },

    #[error("Failed to decode image buffer: {0}")]
    DecodeFailed(String),

    #[error("Expected grayscale image (1 channel), got {channels} channels")]
    NotGrayscale { channels: usize },

    #[error("Resize percentage must be between 0 and 100 (got {0})")]
    InvalidPercentage(f64),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingField,
    TypeMismatch,
    InvalidGeometry,
    UnsupportedFormat,
    SizeMismatch,
    CapacityExceeded,
    DecodeFailure,
    StructuralError,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MissingField => "MissingField",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::InvalidGeometry => "InvalidGeometry",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::SizeMismatch => "SizeMismatch",
            ErrorKind::CapacityExceeded => "CapacityExceeded",
            ErrorKind::DecodeFailure => "DecodeFailure",
            ErrorKind::StructuralError => "StructuralError",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingField(_) | Error::NullField(_) => ErrorKind::MissingField,
            Error::TypeMismatch { .. } | Error::InvalidInput(_) | Error::InvalidArgument { .. } => {
                ErrorKind::TypeMismatch
            }
            Error::NonPositiveDimension { .. } | Error::DimensionTooLarge { .. } => {
                ErrorKind::InvalidGeometry
            }
            Error::UnsupportedDtype(_)
            | Error::UnsupportedColorSpace(_)
            | Error::UnsupportedChannels(_)
            | Error::UninferableChannels(_) => ErrorKind::UnsupportedFormat,
            Error::SizeMismatch { .. } | Error::IndivisibleLength { .. } => {
                ErrorKind::SizeMismatch
            }
            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Error::DecodeFailed(_) => ErrorKind::DecodeFailure,
            Error::NotGrayscale { .. } | Error::InvalidPercentage(_) => ErrorKind::StructuralError,
            Error::Serialization(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_message_cites_both_lengths() {
        let err = Error::SizeMismatch {
            expected: 12,
            actual: 10,
            width: 2,
            height: 2,
            channels: 3,
        };
        assert_eq!(
            err.to_string(),
            "Data length mismatch: expected 12 bytes (2x2x3), got 10 bytes"
        );
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    }

    #[test]
    fn missing_and_null_share_a_kind() {
        assert_eq!(Error::MissingField("data").kind(), ErrorKind::MissingField);
        assert_eq!(Error::NullField("data").kind(), ErrorKind::MissingField);
        assert_ne!(
            Error::MissingField("data").to_string(),
            Error::NullField("data").to_string()
        );
    }

    #[test]
    fn channel_count_is_formatted_without_trailing_zeroes() {
        assert_eq!(
            Error::UnsupportedChannels(2.0).to_string(),
            "Unsupported channel count: 2"
        );
        assert_eq!(
            Error::UnsupportedChannels(3.5).to_string(),
            "Unsupported channel count: 3.5"
        );
    }
}
