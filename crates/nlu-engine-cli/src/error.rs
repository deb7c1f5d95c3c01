//! Error types and handling for the CLI
//!
//! Every failure maps to a distinct process exit code.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the engine binding
    #[error("{0}")]
    Engine(#[from] nlu_engine::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Engine(nlu_engine::Error::Library(_)) => 2,
            Self::Engine(nlu_engine::Error::Load { .. }) => 3,
            Self::Engine(_) => 4,
            Self::FileNotFound { .. } => 5,
            Self::Config(_) => 6,
            Self::InvalidArgs(_) => 7,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_engine_error() {
        let library = Error::from(nlu_engine::Error::Library(nlu_engine::LibraryError {
            path: PathBuf::from("libnlu_engine.so"),
            reason: "not found".to_string(),
        }));
        assert_eq!(library.exit_code(), 2);

        let load = Error::from(nlu_engine::Error::Load {
            message: "bad archive".to_string(),
        });
        assert_eq!(load.exit_code(), 3);
        assert_eq!(load.to_string(), "Failed to load model: bad archive");

        let closed = Error::from(nlu_engine::Error::protocol("engine has been closed"));
        assert_eq!(closed.exit_code(), 4);
    }

    #[test]
    fn test_format_error_without_color() {
        let err = Error::invalid_args("no model given");
        assert!(err.should_show_help());
        assert_eq!(format_error(&err, false), "Error: Invalid arguments: no model given");
    }
}
