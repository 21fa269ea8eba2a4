//! Schema error types
//!
//! Error codes:
//! - ATOM_SCHEMA_PARSE_FAILED (REJECT)
//! - ATOM_SCHEMA_VALIDATION_FAILED (REJECT)
//!
//! Validation failures are always carried as a list of
//! [`ValidationError`] values so every problem in a record surfaces at
//! once; [`SchemaError`] wraps such a list when a caller needs a single
//! error object to propagate.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Record rejected, caller continues
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// A single field-level violation in an atom record.
///
/// One record can accumulate many of these; an empty list means the
/// record conforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Create a violation with a preformatted message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Required field absent
    pub fn missing_field(field: &str) -> Self {
        Self::new(format!("Missing required field: {}", field))
    }

    /// `atom_uid` failed the identifier grammar
    pub fn invalid_uid(value: &str) -> Self {
        Self::new(format!("Invalid atom_uid format: {}", value))
    }

    /// `atom_key` failed the key grammar
    pub fn invalid_key(value: &str) -> Self {
        Self::new(format!("Invalid atom_key format: {}", value))
    }

    /// A required string field is empty or not a string
    pub fn empty_string_field(field: &str) -> Self {
        Self::new(format!("Field '{}' must be a non-empty string", field))
    }

    /// A sequence-valued field is not a sequence
    pub fn not_a_list(field: &str) -> Self {
        Self::new(format!("Field '{}' must be a list", field))
    }

    /// A dependency identifier failed the identifier grammar
    pub fn invalid_dep_uid(index: usize, value: &str) -> Self {
        Self::new(format!("Invalid dependency ULID at index {}: {}", index, value))
    }

    /// A dependency element is neither a string nor an entry with a uid
    pub fn invalid_dep_shape(index: usize) -> Self {
        Self::new(format!("Invalid dependency format at index {}", index))
    }

    /// An inputs/outputs element is not a string
    pub fn invalid_list_item(field: &str, index: usize) -> Self {
        Self::new(format!("Invalid {} item at index {}: must be a string", field, index))
    }

    /// The file could not be parsed at all
    pub fn parse_failed(reason: impl fmt::Display) -> Self {
        Self::new(format!("Failed to parse atom file: {}", reason))
    }

    /// The parsed document is not a map
    pub fn not_a_map() -> Self {
        Self::new("File does not contain a valid map")
    }

    /// Get the violation message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Schema error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Atom file could not be parsed
    ParseFailed,
    /// Atom record violates the schema
    ValidationFailed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::ParseFailed => "ATOM_SCHEMA_PARSE_FAILED",
            SchemaErrorCode::ValidationFailed => "ATOM_SCHEMA_VALIDATION_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Aggregate schema error carrying the full violation list
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    violations: Vec<ValidationError>,
}

impl SchemaError {
    /// A record failed validation; `subject` names the file or record
    pub fn validation_failed(subject: impl fmt::Display, violations: Vec<ValidationError>) -> Self {
        let joined: Vec<String> = violations.iter().map(|v| v.message().to_string()).collect();
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: format!("Validation failed for {}: [{}]", subject, joined.join("; ")),
            violations,
        }
    }

    /// A file could not be parsed into a record
    pub fn parse_failed(subject: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self {
            code: SchemaErrorCode::ParseFailed,
            message: format!("Failed to parse {}: {}", subject, reason),
            violations: Vec::new(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the individual violations
    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
