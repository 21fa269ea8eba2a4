//! # Converter Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::id::IdError;
use crate::registry::RegistryError;
use crate::schema::SchemaError;

/// Result type for converter operations
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Converter errors
#[derive(Debug, Error)]
pub enum ConvertError {
    // Source document errors
    #[error("Failed to read source document {}: {source}", .path.display())]
    DocRead { path: PathBuf, source: io::Error },

    #[error("Markdown file must have a # Title heading: {0}")]
    MissingTitle(String),

    // Generation errors
    #[error("Invalid atom_key generated: {0}")]
    InvalidKey(String),

    #[error("Invalid ULID generated/read: {0}")]
    InvalidUid(String),

    #[error("Failed to serialize atom record for {key}: {reason}")]
    RecordSerialize { key: String, reason: String },

    #[error("Failed to write atom file {}: {source}", .path.display())]
    AtomWrite { path: PathBuf, source: io::Error },

    // Propagated subsystem errors
    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_read_shows_path() {
        let err = ConvertError::DocRead {
            path: PathBuf::from("docs/sample.md"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let display = format!("{}", err);
        assert!(display.contains("docs/sample.md"));
        assert!(display.contains("no such file"));
    }

    #[test]
    fn test_id_error_passes_through() {
        let err: ConvertError = IdError::invalid_version("1").into();
        assert!(format!("{}", err).contains("ATOM_ID_INVALID_VERSION"));
    }
}
