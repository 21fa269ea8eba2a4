//! Registry error types.
//!
//! Error codes:
//! - ATOM_REGISTRY_READ_FAILED (ERROR severity)
//! - ATOM_REGISTRY_APPEND_FAILED (ERROR severity)
//! - ATOM_REGISTRY_SYNC_FAILED (FATAL severity)
//! - ATOM_REGISTRY_SERIALIZE_FAILED (ERROR severity)

use std::fmt;
use std::io;

/// Severity levels for registry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller may retry or continue
    Error,
    /// Durability of the registry file is in doubt
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Registry-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryErrorCode {
    /// Reading or scanning the registry file failed
    ReadFailed,
    /// Appending entries to the registry file failed
    AppendFailed,
    /// Flushing appended entries to disk failed
    SyncFailed,
    /// An entry could not be serialized to a line
    SerializeFailed,
}

impl RegistryErrorCode {
    /// Returns the stable string code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            RegistryErrorCode::ReadFailed => "ATOM_REGISTRY_READ_FAILED",
            RegistryErrorCode::AppendFailed => "ATOM_REGISTRY_APPEND_FAILED",
            RegistryErrorCode::SyncFailed => "ATOM_REGISTRY_SYNC_FAILED",
            RegistryErrorCode::SerializeFailed => "ATOM_REGISTRY_SERIALIZE_FAILED",
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> Severity {
        match self {
            RegistryErrorCode::ReadFailed => Severity::Error,
            RegistryErrorCode::AppendFailed => Severity::Error,
            RegistryErrorCode::SyncFailed => Severity::Fatal,
            RegistryErrorCode::SerializeFailed => Severity::Error,
        }
    }
}

impl fmt::Display for RegistryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Registry error with code, message, and underlying I/O cause.
#[derive(Debug)]
pub struct RegistryError {
    code: RegistryErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl RegistryError {
    /// Create a read failure error.
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: RegistryErrorCode::ReadFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an append failure error.
    pub fn append_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: RegistryErrorCode::AppendFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a sync failure error.
    pub fn sync_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: RegistryErrorCode::SyncFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a serialization failure error.
    pub fn serialize_failed(message: impl Into<String>) -> Self {
        Self {
            code: RegistryErrorCode::SerializeFailed,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> RegistryErrorCode {
        self.code
    }

    /// Returns the severity level.
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether durability of the registry file is in doubt.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            RegistryErrorCode::ReadFailed.code(),
            "ATOM_REGISTRY_READ_FAILED"
        );
        assert_eq!(
            RegistryErrorCode::AppendFailed.code(),
            "ATOM_REGISTRY_APPEND_FAILED"
        );
        assert_eq!(
            RegistryErrorCode::SyncFailed.code(),
            "ATOM_REGISTRY_SYNC_FAILED"
        );
        assert_eq!(
            RegistryErrorCode::SerializeFailed.code(),
            "ATOM_REGISTRY_SERIALIZE_FAILED"
        );
    }

    #[test]
    fn test_sync_failed_is_fatal() {
        let err = RegistryError::sync_failed(
            "fsync failed",
            io::Error::new(io::ErrorKind::Other, "disk error"),
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_append_failed_is_not_fatal() {
        let err = RegistryError::append_failed(
            "write failed",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_display_contains_required_fields() {
        let err = RegistryError::read_failed(
            "cannot scan registry at atoms.registry.jsonl",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = format!("{}", err);
        assert!(display.contains("ATOM_REGISTRY_READ_FAILED"));
        assert!(display.contains("ERROR"));
        assert!(display.contains("atoms.registry.jsonl"));
    }
}
