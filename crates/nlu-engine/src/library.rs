//! Loading the engine shared library
//!
//! The library is opened once per process and kept alive until exit; the
//! resolved entry points are cached in a [`NativeApi`] table next to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::{Arc, OnceLock};

use nlu_engine_sys::{symbols, NativeApi};
use tracing::{debug, instrument};

use crate::config::LibraryConfig;
use crate::error::{Error, ErrorKind, LibraryError, Result};
use crate::memory::NativeString;

/// Process-wide library, opened on first use
static GLOBAL: OnceLock<std::result::Result<Arc<NativeLibrary>, LibraryError>> = OnceLock::new();

/// A loaded engine library and its entry points
pub struct NativeLibrary {
    api: NativeApi,
    origin: Origin,
}

enum Origin {
    Dynamic {
        path: PathBuf,
        // Keeps the code behind `api` mapped; never dropped before `api`.
        _library: libloading::Library,
    },
    Linked,
}

impl NativeLibrary {
    /// The process-wide library, located through [`LibraryConfig::from_env`]
    ///
    /// The first call loads it; later calls return the same instance, or the
    /// same error if loading failed.
    pub fn global() -> Result<Arc<Self>> {
        GLOBAL
            .get_or_init(|| Self::open(&LibraryConfig::from_env()).map(Arc::new))
            .clone()
            .map_err(Error::from)
    }

    /// Open the library at `config.path` and resolve every entry point
    pub fn load(config: &LibraryConfig) -> Result<Self> {
        Self::open(config).map_err(Error::from)
    }

    /// Wrap entry points that are already linked into this binary
    ///
    /// # Safety
    /// Every function in `api` must implement the engine ABI contract:
    /// matching signatures, status codes, ownership of out-pointers and
    /// error message retrieval.
    pub unsafe fn from_api(api: NativeApi) -> Self {
        Self {
            api,
            origin: Origin::Linked,
        }
    }

    /// The resolved entry points
    pub fn api(&self) -> &NativeApi {
        &self.api
    }

    /// Path the library was loaded from, `None` for linked entry points
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::Dynamic { path, .. } => Some(path),
            Origin::Linked => None,
        }
    }

    /// Version of the model format understood by the engine
    #[instrument(level = "debug", skip(self))]
    pub fn model_version(&self) -> Result<String> {
        let mut raw = ptr::null_mut();
        let status = unsafe { (self.api.get_model_version)(&mut raw) };
        self.check(status, ErrorKind::Operation("get_model_version"))?;

        let version = unsafe { NativeString::from_raw(self, raw) }.ok_or_else(|| {
            Error::protocol("get_model_version reported success but returned a null string")
        })?;
        version.to_string("model version")
    }

    fn open(config: &LibraryConfig) -> std::result::Result<Self, LibraryError> {
        let path = config.path.clone();
        debug!(path = %path.display(), "loading engine library");

        let library = unsafe { libloading::Library::new(&path) }.map_err(|e| LibraryError {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let api = unsafe { resolve(&library, &path)? };
        debug!(path = %path.display(), "engine library loaded");

        Ok(Self {
            api,
            origin: Origin::Dynamic {
                path,
                _library: library,
            },
        })
    }
}

impl fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

/// Look up every entry point of the ABI in `library`
///
/// # Safety
/// The symbols must have the signatures declared in `nlu_engine_sys::api`.
unsafe fn resolve(
    library: &libloading::Library,
    path: &Path,
) -> std::result::Result<NativeApi, LibraryError> {
    Ok(NativeApi {
        get_model_version: symbol(library, path, symbols::GET_MODEL_VERSION)?,
        create_from_dir: symbol(library, path, symbols::CREATE_FROM_DIR)?,
        create_from_binary: symbol(library, path, symbols::CREATE_FROM_BINARY)?,
        run_parse: symbol(library, path, symbols::RUN_PARSE)?,
        run_tag: symbol(library, path, symbols::RUN_TAG)?,
        get_last_error: symbol(library, path, symbols::GET_LAST_ERROR)?,
        destroy_client: symbol(library, path, symbols::DESTROY_CLIENT)?,
        destroy_result: symbol(library, path, symbols::DESTROY_RESULT)?,
        destroy_tagged_entity_list: symbol(library, path, symbols::DESTROY_TAGGED_ENTITY_LIST)?,
        destroy_string: symbol(library, path, symbols::DESTROY_STRING)?,
    })
}

unsafe fn symbol<T: Copy>(
    library: &libloading::Library,
    path: &Path,
    name: &[u8],
) -> std::result::Result<T, LibraryError> {
    library.get::<T>(name).map(|s| *s).map_err(|e| LibraryError {
        path: path.to_path_buf(),
        reason: format!(
            "missing symbol {}: {}",
            String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name)),
            e
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_library() {
        let config = LibraryConfig::new("/nonexistent/dir/libnlu_engine_missing.so");
        let err = NativeLibrary::load(&config).unwrap_err();
        match err {
            Error::Library(LibraryError { path, reason }) => {
                assert_eq!(path, config.path);
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_linked_library_has_no_path() {
        let library = unsafe { NativeLibrary::from_api(nlu_engine_mock::native_api()) };
        assert!(library.path().is_none());
        assert!(format!("{:?}", library).contains("NativeLibrary"));
    }

    #[test]
    fn test_model_version_releases_string() {
        nlu_engine_mock::stats::reset();
        let library = unsafe { NativeLibrary::from_api(nlu_engine_mock::native_api()) };

        let version = library.model_version().unwrap();
        assert_eq!(version, nlu_engine_mock::MODEL_VERSION);

        let stats = nlu_engine_mock::stats::snapshot();
        assert_eq!(stats.strings_allocated, 1);
        assert_eq!(stats.strings_destroyed, 1);
    }
}
