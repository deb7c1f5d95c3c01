//! Library location configuration

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the engine library location
pub const LIBRARY_PATH_ENV: &str = "NLU_ENGINE_LIBRARY";

/// Base name of the engine library, without platform prefix or suffix
pub const DEFAULT_LIBRARY_NAME: &str = "nlu_engine";

/// Where to load the engine shared library from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Path or bare file name handed to the system loader
    pub path: PathBuf,
}

impl LibraryConfig {
    /// Use an explicit library path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform file name of the default library (`libnlu_engine.so`, ...),
    /// resolved through the loader's search path
    pub fn default_name() -> Self {
        Self::new(libloading::library_filename(DEFAULT_LIBRARY_NAME))
    }

    /// Read [`LIBRARY_PATH_ENV`], falling back to [`LibraryConfig::default_name`]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(LIBRARY_PATH_ENV))
    }

    fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default_name(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::default_name()
    }
}
