//! Error types for the engine binding
//!
//! Failures reported by the native library carry the library's own message;
//! failures detected by the wrapper itself are reported as
//! [`Error::ProtocolViolation`] or [`Error::InvalidArgument`] and never reach
//! native code.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Creating an engine from a directory or byte buffer failed
    #[error("Failed to load model: {message}")]
    Load {
        /// Message reported by the native library
        message: String,
    },

    /// A native operation failed; the engine stays usable
    #[error("Operation '{operation}' failed: {message}")]
    Operation {
        /// Name of the failed operation
        operation: &'static str,
        /// Message reported by the native library
        message: String,
    },

    /// The wrapper detected misuse of the native protocol
    #[error("Protocol violation: {message}")]
    ProtocolViolation {
        /// Description of the violation
        message: String,
    },

    /// A caller-supplied value cannot be passed across the ABI
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected value
        message: String,
    },

    /// The shared library or one of its symbols could not be loaded
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Failure to load the engine shared library
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to load engine library {}: {reason}", path.display())]
pub struct LibraryError {
    /// Path or file name that was passed to the loader
    pub path: PathBuf,
    /// Loader message
    pub reason: String,
}

/// Which error to raise when a native status reports failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Engine creation
    Load,
    /// Any other native operation
    Operation(&'static str),
}

impl Error {
    /// Create a protocol violation error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build the error for a failed native call from its retrieved message
    pub fn from_native(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Load => Self::Load { message },
            ErrorKind::Operation(operation) => Self::Operation { operation, message },
        }
    }

    /// True when the error came from the native library rather than the wrapper
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Operation { .. })
    }

    /// Message without the category prefix
    pub fn message(&self) -> String {
        match self {
            Self::Load { message }
            | Self::Operation { message, .. }
            | Self::ProtocolViolation { message }
            | Self::InvalidArgument { message } => message.clone(),
            Self::Library(e) => e.reason.clone(),
        }
    }
}
