//! CLI-specific error types
//!
//! Every CLI failure maps to a nonzero process exit; the code string
//! tells scripted callers which stage failed.

use std::fmt;
use std::io;

use crate::convert::ConvertError;
use crate::registry::RegistryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Invalid argument combination
    ArgsError,
    /// Source document or directory missing
    DocNotFound,
    /// Conversion or generation failed
    ConvertFailed,
    /// Strict validation found violations
    ValidationFailed,
    /// Registry has no entry for the key
    KeyNotFound,
    /// I/O error (stdout/file)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArgsError => "ATOM_CLI_ARGS_ERROR",
            Self::DocNotFound => "ATOM_CLI_DOC_NOT_FOUND",
            Self::ConvertFailed => "ATOM_CLI_CONVERT_FAILED",
            Self::ValidationFailed => "ATOM_CLI_VALIDATION_FAILED",
            Self::KeyNotFound => "ATOM_CLI_KEY_NOT_FOUND",
            Self::IoError => "ATOM_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid argument combination
    pub fn args_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ArgsError, msg)
    }

    /// Source document or directory missing
    pub fn doc_not_found(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DocNotFound, msg)
    }

    /// Conversion or generation failed
    pub fn convert_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConvertFailed, msg)
    }

    /// Strict validation found violations
    pub fn validation_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ValidationFailed, msg)
    }

    /// Registry has no entry for the key
    pub fn key_not_found(key: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::KeyNotFound,
            format!("No registry entry for key: {}", key),
        )
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConvertError> for CliError {
    fn from(e: ConvertError) -> Self {
        Self::convert_failed(e.to_string())
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        Self::io_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
