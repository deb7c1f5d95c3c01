//! Error handling for the ABI boundary
//!
//! Errors and panics never cross into the caller: they are turned into a
//! failure status plus a message stored for `nlu_engine_get_last_error`.

use std::any::Any;
use std::ffi::NulError;
use std::os::raw::c_int;
use std::panic::{self, UnwindSafe};
use std::path::PathBuf;
use std::str::Utf8Error;

use nlu_engine_sys::{StatusCode, STATUS_KO, STATUS_OK};
use thiserror::Error;

use crate::memory::set_last_error;

/// Failures of the reference engine
#[derive(Error, Debug)]
pub enum MockError {
    /// A required pointer argument was null
    #[error("{0} is null")]
    NullPointer(&'static str),

    /// A string argument was not valid UTF-8
    #[error("{what} is not valid UTF-8: {source}")]
    Utf8 {
        what: &'static str,
        #[source]
        source: Utf8Error,
    },

    /// The model file could not be read
    #[error("Could not read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model bytes are not a valid assistant
    #[error("Invalid model archive: {0}")]
    InvalidModel(#[from] serde_json::Error),

    /// The requested intent is not part of the model
    #[error("Unknown intent '{0}'")]
    UnknownIntent(String),

    /// A buffer size argument was negative
    #[error("Invalid data size {0}")]
    InvalidSize(c_int),

    /// A character offset does not fit the wire format
    #[error("Input is too long: offset {0} does not fit in a C int")]
    OffsetOverflow(usize),

    /// A model string cannot be represented as a C string
    #[error("Model string contains a NUL byte: {0}")]
    NulByte(#[from] NulError),
}

/// Run `f`, mapping errors and panics to a failure status
pub fn catch_panic<F>(f: F) -> StatusCode
where
    F: FnOnce() -> Result<(), MockError> + UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(Ok(())) => STATUS_OK,
        Ok(Err(e)) => {
            set_last_error(e.to_string());
            STATUS_KO
        }
        Err(panic_info) => {
            let msg = get_panic_message(&panic_info);
            set_last_error(format!("Panic occurred: {}", msg));
            STATUS_KO
        }
    }
}

/// Extract a message from panic info
fn get_panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Macro for exported functions: the body evaluates to `Result<(), MockError>`
#[macro_export]
macro_rules! ffi_boundary {
    ($body:expr) => {{
        $crate::error::catch_panic(::std::panic::AssertUnwindSafe(
            || -> ::std::result::Result<(), $crate::error::MockError> { $body },
        ))
    }};
}

/// Validate that a pointer argument is not null
pub fn validate_ptr<T>(ptr: *const T, name: &'static str) -> Result<(), MockError> {
    if ptr.is_null() {
        Err(MockError::NullPointer(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::take_last_error;

    #[test]
    fn test_panic_catching() {
        let status = catch_panic(|| {
            panic!("Test panic");
            #[allow(unreachable_code)]
            Ok(())
        });

        assert_eq!(status, STATUS_KO);
        assert_eq!(take_last_error().as_deref(), Some("Panic occurred: Test panic"));
    }

    #[test]
    fn test_error_sets_message() {
        let status = catch_panic(|| Err(MockError::UnknownIntent("Order".to_string())));
        assert_eq!(status, STATUS_KO);
        assert_eq!(take_last_error().as_deref(), Some("Unknown intent 'Order'"));
        assert_eq!(take_last_error(), None);
    }

    #[test]
    fn test_ptr_validation() {
        let value = 42;
        assert!(validate_ptr(&value as *const i32, "value").is_ok());
        let err = validate_ptr(std::ptr::null::<i32>(), "client").unwrap_err();
        assert_eq!(err.to_string(), "client is null");
    }
}
