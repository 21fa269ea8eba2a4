//! Identifier codec error types
//!
//! Error codes:
//! - ATOM_ID_INVALID_SEGMENT
//! - ATOM_ID_INVALID_VERSION
//! - ATOM_ID_SEQUENCE_RANGE

use std::fmt;

/// Identifier codec error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdErrorCode {
    /// A key segment contains characters outside the key alphabet
    InvalidSegment,
    /// The version segment is not `v` followed by digits
    InvalidVersion,
    /// The sequence number does not fit in three decimal digits
    SequenceRange,
}

impl IdErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSegment => "ATOM_ID_INVALID_SEGMENT",
            Self::InvalidVersion => "ATOM_ID_INVALID_VERSION",
            Self::SequenceRange => "ATOM_ID_SEQUENCE_RANGE",
        }
    }
}

impl fmt::Display for IdErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Identifier codec error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdError {
    code: IdErrorCode,
    message: String,
}

impl IdError {
    /// Create a new codec error
    pub fn new(code: IdErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A key segment failed the `[a-z0-9-]+` alphabet check
    pub fn invalid_segment(name: &str, value: &str) -> Self {
        Self::new(
            IdErrorCode::InvalidSegment,
            format!("Invalid {} segment: '{}'", name, value),
        )
    }

    /// The version segment failed the `v<digits>` check
    pub fn invalid_version(value: &str) -> Self {
        Self::new(
            IdErrorCode::InvalidVersion,
            format!("Invalid version segment: '{}' (expected 'v' followed by digits)", value),
        )
    }

    /// The sequence number exceeds three decimal digits
    pub fn sequence_range(sequence: u32) -> Self {
        Self::new(
            IdErrorCode::SequenceRange,
            format!("Sequence {} out of range (0-999)", sequence),
        )
    }

    /// Get the error code
    pub fn code(&self) -> IdErrorCode {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for IdError {}

/// Result type for codec operations
pub type IdResult<T> = Result<T, IdError>;
