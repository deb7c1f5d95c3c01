//! Engine handle lifecycle and the public parse/tag API

use std::fmt;
use std::os::raw::c_int;
use std::path::Path;
use std::ptr::{self, NonNull};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nlu_engine_sys::{CClient, NativeApi, StatusCode};
use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::library::NativeLibrary;
use crate::marshal;
use crate::memory::{to_c_string, NativeResult};
use crate::model::{IntentParserResult, TaggedEntity};

/// Opaque pointer to a native engine client
struct ClientHandle(NonNull<CClient>);

// SAFETY: the handle is only dereferenced by the engine library, and every
// use goes through the owning engine's mutex.
unsafe impl Send for ClientHandle {}

impl ClientHandle {
    fn as_ptr(&self) -> *mut CClient {
        self.0.as_ptr()
    }
}

enum HandleState {
    Created(ClientHandle),
    Destroyed,
}

/// An intent parser backed by a native engine client
///
/// The client is created by one of the constructors and destroyed exactly
/// once, either by [`NluEngine::close`] or when the engine is dropped.
/// Calls on one engine are serialized; the engine can be shared between
/// threads.
pub struct NluEngine {
    library: Arc<NativeLibrary>,
    state: Mutex<HandleState>,
}

impl NluEngine {
    /// Load the model stored in directory `path`, using the process-wide library
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_dir_with(NativeLibrary::global()?, path)
    }

    /// Load the model stored in directory `path` through `library`
    #[instrument(level = "debug", skip(library, path), fields(path = %path.as_ref().display()))]
    pub fn from_dir_with(library: Arc<NativeLibrary>, path: impl AsRef<Path>) -> Result<Self> {
        let path = std::path::absolute(path.as_ref()).map_err(|e| Error::Load {
            message: format!("cannot resolve {}: {}", path.as_ref().display(), e),
        })?;
        let path = path
            .to_str()
            .ok_or_else(|| Error::invalid_argument("model directory path is not valid UTF-8"))?;
        let root_dir = to_c_string(path, "model directory path")?;

        Self::create(library, "create_from_dir", |api, client| unsafe {
            (api.create_from_dir)(root_dir.as_ptr(), client)
        })
    }

    /// Load a model from an in-memory archive, using the process-wide library
    pub fn from_binary(data: &[u8]) -> Result<Self> {
        Self::from_binary_with(NativeLibrary::global()?, data)
    }

    /// Load a model from an in-memory archive through `library`
    #[instrument(level = "debug", skip(library, data), fields(len = data.len()))]
    pub fn from_binary_with(library: Arc<NativeLibrary>, data: &[u8]) -> Result<Self> {
        let size = c_int::try_from(data.len()).map_err(|_| {
            Error::invalid_argument(format!(
                "model archive of {} bytes exceeds the native size limit",
                data.len()
            ))
        })?;

        Self::create(library, "create_from_binary", |api, client| unsafe {
            (api.create_from_binary)(data.as_ptr(), size, client)
        })
    }

    fn create(
        library: Arc<NativeLibrary>,
        operation: &'static str,
        call: impl FnOnce(&NativeApi, *mut *mut CClient) -> StatusCode,
    ) -> Result<Self> {
        let mut raw = ptr::null_mut();
        let status = call(library.api(), &mut raw);
        library.check(status, ErrorKind::Load)?;

        let client = NonNull::new(raw).ok_or_else(|| {
            Error::protocol(format!(
                "{} reported success but returned a null client",
                operation
            ))
        })?;
        debug!(operation, "engine client created");

        Ok(Self {
            library,
            state: Mutex::new(HandleState::Created(ClientHandle(client))),
        })
    }

    /// Classify `input` and extract the slots of the recognized intent
    #[instrument(level = "debug", skip(self, input), fields(input_len = input.len()))]
    pub fn parse(&self, input: &str) -> Result<IntentParserResult> {
        let input = to_c_string(input, "input")?;
        let state = self.lock();
        let client = Self::client(&state)?;
        let api = self.library.api();

        let mut raw = ptr::null_mut();
        let status = unsafe { (api.run_parse)(client.as_ptr(), input.as_ptr(), &mut raw) };
        self.library.check(status, ErrorKind::Operation("parse"))?;

        let result = unsafe {
            NativeResult::from_raw(&self.library, raw, api.destroy_result, "destroy_result")
        }
        .ok_or_else(|| Error::protocol("run_parse reported success but returned a null result"))?;

        unsafe { marshal::decode_parser_result(result.record()) }
    }

    /// Extract the entities of `input` for the given intent
    #[instrument(level = "debug", skip(self, input), fields(input_len = input.len()))]
    pub fn tag(&self, input: &str, intent_name: &str) -> Result<Vec<TaggedEntity>> {
        let input = to_c_string(input, "input")?;
        let intent = to_c_string(intent_name, "intent name")?;
        let state = self.lock();
        let client = Self::client(&state)?;
        let api = self.library.api();

        let mut raw = ptr::null_mut();
        let status = unsafe {
            (api.run_tag)(client.as_ptr(), input.as_ptr(), intent.as_ptr(), &mut raw)
        };
        self.library.check(status, ErrorKind::Operation("tag"))?;

        let result = unsafe {
            NativeResult::from_raw(
                &self.library,
                raw,
                api.destroy_tagged_entity_list,
                "destroy_tagged_entity_list",
            )
        }
        .ok_or_else(|| Error::protocol("run_tag reported success but returned a null result"))?;

        unsafe { marshal::decode_tagged_entity_list(result.record()) }
    }

    /// Destroy the native client now
    ///
    /// Waits for an in-flight call to finish. Every later call, including a
    /// second `close`, fails with [`Error::ProtocolViolation`].
    pub fn close(&self) -> Result<()> {
        let mut state = self.lock();
        match std::mem::replace(&mut *state, HandleState::Destroyed) {
            HandleState::Created(client) => self.destroy(client),
            HandleState::Destroyed => Err(Error::protocol("engine is already closed")),
        }
    }

    /// True once the native client has been destroyed
    pub fn is_closed(&self) -> bool {
        matches!(*self.lock(), HandleState::Destroyed)
    }

    /// Library this engine calls into
    pub fn library(&self) -> &Arc<NativeLibrary> {
        &self.library
    }

    fn destroy(&self, client: ClientHandle) -> Result<()> {
        let status = unsafe { (self.library.api().destroy_client)(client.as_ptr()) };
        debug!(status, "engine client destroyed");
        self.library
            .check(status, ErrorKind::Operation("destroy_client"))
    }

    fn lock(&self) -> MutexGuard<'_, HandleState> {
        // A panic while decoding leaves the handle itself untouched
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn client<'s>(state: &'s MutexGuard<'_, HandleState>) -> Result<&'s ClientHandle> {
        match &**state {
            HandleState::Created(client) => Ok(client),
            HandleState::Destroyed => Err(Error::protocol("engine has been closed")),
        }
    }
}

impl Drop for NluEngine {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let HandleState::Created(client) = std::mem::replace(state, HandleState::Destroyed) {
            if let Err(e) = self.destroy(client) {
                warn!(error = %e, "failed to destroy engine client on drop");
            }
        }
    }
}

impl fmt::Debug for NluEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("NluEngine");
        s.field("library", &self.library);
        // try_lock: formatting may happen while a call holds the lock
        if let Ok(state) = self.state.try_lock() {
            s.field("closed", &matches!(*state, HandleState::Destroyed));
        }
        s.finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_and_sync() {
        assert_send_sync::<NluEngine>();
    }
}
