//! Ownership guards for native memory
//!
//! Every pointer the engine library hands over is wrapped in a guard as soon
//! as it is known to be valid. The guard runs the matching destroy function
//! exactly once when it goes out of scope, on success and error paths alike.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr::NonNull;

use nlu_engine_sys::{is_ok, StatusCode};
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::library::NativeLibrary;

/// A standalone string allocated by the engine (model version, error message)
///
/// Released with `nlu_engine_destroy_string` on drop. Strings nested inside
/// result records must never be wrapped in this type.
pub(crate) struct NativeString<'a> {
    library: &'a NativeLibrary,
    ptr: NonNull<c_char>,
}

impl<'a> NativeString<'a> {
    /// Take ownership of `ptr`; returns `None` for a null pointer
    ///
    /// # Safety
    /// `ptr` must be null or a NUL-terminated string allocated by `library`
    /// that nobody else will release.
    pub(crate) unsafe fn from_raw(library: &'a NativeLibrary, ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { library, ptr })
    }

    /// Copy the contents, failing on invalid UTF-8
    pub(crate) fn to_string(&self, what: &str) -> Result<String> {
        // SAFETY: non-null and owned by self until drop
        unsafe { copy_c_str(self.ptr.as_ptr(), what) }
    }

    /// Copy the contents, replacing invalid UTF-8 sequences
    pub(crate) fn to_string_lossy(&self) -> String {
        // SAFETY: non-null and owned by self until drop
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for NativeString<'_> {
    fn drop(&mut self) {
        let status = unsafe { (self.library.api().destroy_string)(self.ptr.as_ptr()) };
        trace!(status, "destroy_string");
        if !is_ok(status) {
            // Not chasing the error message here: fetching it allocates
            // another string that would need this same call to release.
            warn!(status, "nlu_engine_destroy_string reported a failure");
        }
    }
}

/// A result record graph allocated by the engine
///
/// Released with its own destroy function on drop, which also frees every
/// nested array and string.
pub(crate) struct NativeResult<'a, T> {
    library: &'a NativeLibrary,
    ptr: NonNull<T>,
    destroy: unsafe extern "C" fn(*mut T) -> StatusCode,
    destroy_name: &'static str,
}

impl<'a, T> NativeResult<'a, T> {
    /// Take ownership of `ptr`; returns `None` for a null pointer
    ///
    /// # Safety
    /// `ptr` must be null or a record produced by `library` that is released
    /// by `destroy` and by nothing else.
    pub(crate) unsafe fn from_raw(
        library: &'a NativeLibrary,
        ptr: *mut T,
        destroy: unsafe extern "C" fn(*mut T) -> StatusCode,
        destroy_name: &'static str,
    ) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            library,
            ptr,
            destroy,
            destroy_name,
        })
    }

    /// Borrow the top-level record
    pub(crate) fn record(&self) -> &T {
        // SAFETY: valid until drop, which needs `&mut self`
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> Drop for NativeResult<'_, T> {
    fn drop(&mut self) {
        let status = unsafe { (self.destroy)(self.ptr.as_ptr()) };
        trace!(status, destroy = self.destroy_name, "destroyed native result");
        if !is_ok(status) {
            let message = self.library.take_last_error();
            warn!(
                status,
                destroy = self.destroy_name,
                message = message.as_deref().unwrap_or("<none>"),
                "failed to release native result"
            );
        }
    }
}

/// Copy a NUL-terminated UTF-8 string into an owned `String`
///
/// A null pointer or invalid UTF-8 is a protocol violation: `what` names the
/// field in the resulting message.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated buffer that stays valid
/// for the duration of the call.
pub(crate) unsafe fn copy_c_str(ptr: *const c_char, what: &str) -> Result<String> {
    if ptr.is_null() {
        return Err(Error::protocol(format!("{} is null", what)));
    }

    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_owned)
        .map_err(|e| Error::protocol(format!("{} is not valid UTF-8: {}", what, e)))
}

/// Convert a caller string into a C string for the engine
pub(crate) fn to_c_string(value: &str, what: &str) -> Result<CString> {
    CString::new(value).map_err(|e| {
        Error::invalid_argument(format!(
            "{} contains a NUL byte at position {}",
            what,
            e.nul_position()
        ))
    })
}
