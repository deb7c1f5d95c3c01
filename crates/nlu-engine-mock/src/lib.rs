//! Reference NLU engine exposing the `nlu_engine_*` C ABI
//!
//! Intents are recognized by keyword overlap and slots by whole-word matches
//! against per-slot value lists. The crate builds as a `cdylib` that the
//! bindings can load dynamically, and as an `rlib` whose [`native_api`]
//! table lets tests call the same functions without going through the
//! dynamic loader. `build.rs` writes the matching C header to
//! `include/nlu_engine.h`.
//!
//! # Safety
//!
//! Callers must follow the ownership rules of the ABI: every result and
//! string handed out is released exactly once with its destroy function,
//! and a client is not used after `nlu_engine_destroy_client`.

#[macro_use]
mod error;
mod api;
pub mod assistant;
mod memory;
pub mod stats;

pub use api::*;
pub use error::MockError;

use nlu_engine_sys::NativeApi;

/// Model format version reported by `nlu_engine_get_model_version`
pub const MODEL_VERSION: &str = "0.20.1";

/// Function table pointing at this crate's exports
pub fn native_api() -> NativeApi {
    NativeApi {
        get_model_version: nlu_engine_get_model_version,
        create_from_dir: nlu_engine_create_from_dir,
        create_from_binary: nlu_engine_create_from_binary,
        run_parse: nlu_engine_run_parse,
        run_tag: nlu_engine_run_tag,
        get_last_error: nlu_engine_get_last_error,
        destroy_client: nlu_engine_destroy_client,
        destroy_result: nlu_engine_destroy_result,
        destroy_tagged_entity_list: nlu_engine_destroy_tagged_entity_list,
        destroy_string: nlu_engine_destroy_string,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    #[test]
    fn test_version() {
        unsafe {
            let mut version = ptr::null_mut();
            assert_eq!(nlu_engine_get_model_version(&mut version), nlu_engine_sys::STATUS_OK);
            assert_eq!(CStr::from_ptr(version).to_str().unwrap(), MODEL_VERSION);
            assert_eq!(nlu_engine_destroy_string(version), nlu_engine_sys::STATUS_OK);
        }
    }
}
