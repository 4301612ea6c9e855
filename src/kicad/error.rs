//! Error types for KiCad file operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for KiCad operations.
pub type KicadResult<T> = Result<T, KicadError>;

/// Errors that can occur during KiCad file operations.
#[derive(Debug, Error)]
pub enum KicadError {
    /// Failed to open or read the file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to tokenize or parse S-expression text.
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where the error occurred.
        offset: usize,
        /// Description of what's wrong.
        message: String,
    },

    /// The S-expression tree is well-formed but not a valid document of the
    /// expected kind (wrong root token, missing required child, bad value).
    #[error("Malformed {context}: {message}")]
    Malformed {
        /// Which construct was being read (e.g., "module", "pad").
        context: String,
        /// Description of what's wrong.
        message: String,
    },

    /// Unknown layer name in a layer list.
    #[error("Unknown layer: {name}")]
    UnknownLayer {
        /// Layer name that was not recognised.
        name: String,
    },
}

impl KicadError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse_error(offset: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Creates a malformed document error.
    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown layer error.
    pub fn unknown_layer(name: impl Into<String>) -> Self {
        Self::UnknownLayer { name: name.into() }
    }
}
