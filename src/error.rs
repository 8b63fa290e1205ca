//! Error types for the benchmark harness
//!
//! This module provides a unified error handling system using `thiserror` for
//! all components of the harness: codecs, validation, dataset and schema
//! resources, and configuration.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the benchmark harness
#[derive(Error, Debug)]
pub enum Error {
    /// Codec construction, encoding or decoding errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Round-trip validation failures
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Missing or unreadable external resources (dataset, schema files)
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a configuration error from any message
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

/// Codec-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Malformed or missing schema at codec construction time
    #[error("{codec}: invalid schema: {reason}")]
    Schema {
        /// Codec name
        codec: String,
        /// Why the schema was rejected
        reason: String,
    },

    /// A value could not be encoded
    #[error("{codec}: encoding failed: {reason}")]
    Encode {
        /// Codec name
        codec: String,
        /// Underlying library message
        reason: String,
    },

    /// Malformed, truncated or type-mismatched input bytes
    #[error("{codec}: decoding failed: {reason}")]
    Decode {
        /// Codec name
        codec: String,
        /// Underlying library message
        reason: String,
    },
}

impl CodecError {
    /// Schema error for `codec`
    pub fn schema(codec: &str, reason: impl fmt::Display) -> Self {
        CodecError::Schema {
            codec: codec.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Encode error for `codec`
    pub fn encode(codec: &str, reason: impl fmt::Display) -> Self {
        CodecError::Encode {
            codec: codec.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Decode error for `codec`
    pub fn decode(codec: &str, reason: impl fmt::Display) -> Self {
        CodecError::Decode {
            codec: codec.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for decode failures
    pub fn is_decode(&self) -> bool {
        matches!(self, CodecError::Decode { .. })
    }
}

/// Round-trip validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Decoded sequence has a different length than the source
    #[error("{codec} ({shape}): expected {expected} records, decoded {actual}")]
    LengthMismatch {
        /// Codec name
        codec: String,
        /// Dataset shape under test
        shape: String,
        /// Source record count
        expected: usize,
        /// Decoded record count
        actual: usize,
    },

    /// A decoded record differs from the source record at the same position
    #[error("{codec} ({shape}): record {index} does not match the source")]
    RecordMismatch {
        /// Codec name
        codec: String,
        /// Dataset shape under test
        shape: String,
        /// Position of the first differing record
        index: usize,
    },

    /// The codec failed while encoding or decoding the dataset
    #[error("{codec} ({shape}): {source}")]
    Codec {
        /// Codec name
        codec: String,
        /// Dataset shape under test
        shape: String,
        /// Underlying codec failure
        #[source]
        source: CodecError,
    },
}

impl ValidationError {
    /// Name of the codec that failed
    pub fn codec(&self) -> &str {
        match self {
            ValidationError::LengthMismatch { codec, .. }
            | ValidationError::RecordMismatch { codec, .. }
            | ValidationError::Codec { codec, .. } => codec,
        }
    }

    /// Shape that failed
    pub fn shape(&self) -> &str {
        match self {
            ValidationError::LengthMismatch { shape, .. }
            | ValidationError::RecordMismatch { shape, .. }
            | ValidationError::Codec { shape, .. } => shape,
        }
    }
}

/// Missing or unreadable external resources
#[derive(Error, Debug)]
pub enum ResourceError {
    /// File does not exist
    #[error("Resource not found: {}", path.display())]
    NotFound {
        /// Missing path
        path: PathBuf,
    },

    /// File exists but could not be read
    #[error("Failed to read {}: {reason}", path.display())]
    Read {
        /// Path being read
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Dataset content is malformed
    #[error("Malformed dataset {} at line {line}: {reason}", path.display())]
    Dataset {
        /// Dataset path
        path: PathBuf,
        /// 1-based line number of the offending row
        line: u64,
        /// What is wrong with the row
        reason: String,
    },
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for Codec Results
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Convenience type alias for Validation Results
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Convenience type alias for Resource Results
pub type ResourceResult<T> = std::result::Result<T, ResourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let codec_error = CodecError::decode("bson", "unexpected end of file");
        let error = Error::Codec(codec_error);
        assert!(error.to_string().contains("Codec error"));
        assert!(error.to_string().contains("bson: decoding failed"));
    }

    #[test]
    fn test_validation_error_identifies_codec_and_shape() {
        let error = ValidationError::RecordMismatch {
            codec: "avro-fast".to_string(),
            shape: "separate".to_string(),
            index: 7,
        };
        assert_eq!(error.codec(), "avro-fast");
        assert_eq!(error.shape(), "separate");
        assert!(Error::from(error).to_string().contains("record 7"));
    }

    #[test]
    fn test_resource_error_display() {
        let error = ResourceError::Dataset {
            path: PathBuf::from("sales.csv"),
            line: 12,
            reason: "invalid UnitsSold".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed dataset sales.csv at line 12: invalid UnitsSold"
        );
    }
}
