//! Structured error types for symindex
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! Every variant describes a per-object failure. None of them abort an
//! index rebuild; `update()` logs them and moves on to the next object,
//! so the worst outcome of a malformed input is a less complete index.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to canonicalize object path {path}: {source}")]
    CanonicalizeFailed { path: PathBuf, source: std::io::Error },

    #[error("Failed to read object file {path}: {source}")]
    ObjectReadFailed { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse object file {path}: {reason}")]
    ObjectParseFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = IndexError::ObjectParseFailed {
            path: PathBuf::from("/tmp/not-an-elf"),
            reason: "Invalid ELF header".to_string(),
        };
        assert!(err.to_string().contains("/tmp/not-an-elf"));
        assert!(err.to_string().contains("Invalid ELF header"));
    }

    #[test]
    fn test_read_error_display() {
        let err = IndexError::ObjectReadFailed {
            path: PathBuf::from("/missing/lib.so"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/missing/lib.so"));
    }
}
