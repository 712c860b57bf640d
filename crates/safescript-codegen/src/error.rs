//! Mapping error types.

use thiserror::Error;

/// Errors reading or writing position mappings.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A `mappings` string contained a character outside the base-64 alphabet.
    #[error("invalid base64 character '{0}' in mappings")]
    InvalidBase64(char),

    /// A VLQ value ended on a continuation digit.
    #[error("truncated VLQ value in segment '{0}'")]
    TruncatedVlq(String),

    /// A decoded value does not fit the coordinate range.
    #[error("VLQ value out of range in segment '{0}'")]
    Overflow(String),

    /// A segment had a field count other than 1, 4 or 5.
    #[error("segment has {0} fields, expected 1, 4 or 5")]
    SegmentLength(usize),

    /// Relative offsets summed to a negative coordinate.
    #[error("negative coordinate at generated line {line}")]
    NegativeCoordinate { line: usize },

    /// The map declared a version other than 3.
    #[error("unsupported source map version {0}")]
    UnsupportedVersion(u32),

    /// The map was not valid JSON.
    #[error("malformed source map JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Mapping result type alias.
pub type MappingResult<T> = Result<T, MappingError>;
