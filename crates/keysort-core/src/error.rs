//! Error types for dictionary-sorting operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for keysort operations
///
/// Unsupported dictionary shapes (non-string keys, formatted-string keys,
/// unpacking entries) are never errors; they are a silent skip decided by
/// the eligibility filter.
#[derive(Debug, Error)]
pub enum KeysortError {
    /// Input text is not syntactically valid Python
    #[error("parse error in {}: {message} at line {line}, column {col}", path.display())]
    Parse {
        path: PathBuf,
        message: String,
        line: u32,
        col: u32,
    },

    /// File system I/O errors
    #[error("IO error for path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors (unknown sort mode)
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Io,
    Config,
}

impl KeysortError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeysortError::Parse { .. } => ErrorKind::Parse,
            KeysortError::Io { .. } => ErrorKind::Io,
            KeysortError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Whether processing of other files can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Io)
    }

    /// Create a parse error attributed to a file
    pub fn parse(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: u32,
        col: u32,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line,
            col,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
