//! Status code checking and error message retrieval

use std::ptr;

use nlu_engine_sys::{is_ok, StatusCode};
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::library::NativeLibrary;
use crate::memory::NativeString;

impl NativeLibrary {
    /// Turn a native status into a `Result`
    ///
    /// On failure the pending error message is fetched once, copied and
    /// released before the error is returned.
    pub(crate) fn check(&self, status: StatusCode, kind: ErrorKind) -> Result<()> {
        if is_ok(status) {
            return Ok(());
        }

        let message = self
            .take_last_error()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("unknown native error (status {})", status));

        debug!(status, ?kind, %message, "native call failed");
        Err(Error::from_native(kind, message))
    }

    /// Fetch and release the pending error message, if the engine has one
    pub(crate) fn take_last_error(&self) -> Option<String> {
        let mut raw = ptr::null_mut();
        let status = unsafe { (self.api().get_last_error)(&mut raw) };

        // Guard before inspecting the status so a written buffer is always released
        let message = unsafe { NativeString::from_raw(self, raw) };
        if !is_ok(status) {
            debug!(status, "nlu_engine_get_last_error reported a failure");
            return None;
        }

        message.map(|m| m.to_string_lossy())
    }
}
