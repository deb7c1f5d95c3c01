//! Entry point signatures of the engine library
//!
//! Every function returns a [`StatusCode`]; output values are written through
//! the trailing out-pointer and ownership of the pointee moves to the caller
//! until the matching destroy function is called.

use std::os::raw::{c_char, c_int, c_uchar};

use crate::types::{CClient, CIntentParserResult, CTaggedEntityList, StatusCode};

/// `nlu_engine_get_model_version`
pub type GetModelVersionFn = unsafe extern "C" fn(version: *mut *mut c_char) -> StatusCode;

/// `nlu_engine_create_from_dir`
pub type CreateFromDirFn =
    unsafe extern "C" fn(root_dir: *const c_char, client: *mut *mut CClient) -> StatusCode;

/// `nlu_engine_create_from_binary`
pub type CreateFromBinaryFn = unsafe extern "C" fn(
    data: *const c_uchar,
    data_size: c_int,
    client: *mut *mut CClient,
) -> StatusCode;

/// `nlu_engine_run_parse`
pub type RunParseFn = unsafe extern "C" fn(
    client: *mut CClient,
    input: *const c_char,
    result: *mut *mut CIntentParserResult,
) -> StatusCode;

/// `nlu_engine_run_tag`
pub type RunTagFn = unsafe extern "C" fn(
    client: *mut CClient,
    input: *const c_char,
    intent: *const c_char,
    result: *mut *mut CTaggedEntityList,
) -> StatusCode;

/// `nlu_engine_get_last_error`
pub type GetLastErrorFn = unsafe extern "C" fn(error: *mut *mut c_char) -> StatusCode;

/// `nlu_engine_destroy_client`
pub type DestroyClientFn = unsafe extern "C" fn(client: *mut CClient) -> StatusCode;

/// `nlu_engine_destroy_result`
pub type DestroyResultFn = unsafe extern "C" fn(result: *mut CIntentParserResult) -> StatusCode;

/// `nlu_engine_destroy_tagged_entity_list`
pub type DestroyTaggedEntityListFn =
    unsafe extern "C" fn(result: *mut CTaggedEntityList) -> StatusCode;

/// `nlu_engine_destroy_string`
pub type DestroyStringFn = unsafe extern "C" fn(string: *mut c_char) -> StatusCode;

/// Exported symbol names, NUL-terminated for dynamic lookup
#[allow(missing_docs)]
pub mod symbols {
    pub const GET_MODEL_VERSION: &[u8] = b"nlu_engine_get_model_version\0";
    pub const CREATE_FROM_DIR: &[u8] = b"nlu_engine_create_from_dir\0";
    pub const CREATE_FROM_BINARY: &[u8] = b"nlu_engine_create_from_binary\0";
    pub const RUN_PARSE: &[u8] = b"nlu_engine_run_parse\0";
    pub const RUN_TAG: &[u8] = b"nlu_engine_run_tag\0";
    pub const GET_LAST_ERROR: &[u8] = b"nlu_engine_get_last_error\0";
    pub const DESTROY_CLIENT: &[u8] = b"nlu_engine_destroy_client\0";
    pub const DESTROY_RESULT: &[u8] = b"nlu_engine_destroy_result\0";
    pub const DESTROY_TAGGED_ENTITY_LIST: &[u8] = b"nlu_engine_destroy_tagged_entity_list\0";
    pub const DESTROY_STRING: &[u8] = b"nlu_engine_destroy_string\0";
}

/// Resolved entry points of one engine library
///
/// The table is plain data: it can be filled from a dynamically loaded
/// library or from functions linked into the current binary.
#[derive(Clone, Copy, Debug)]
#[allow(missing_docs)]
pub struct NativeApi {
    pub get_model_version: GetModelVersionFn,
    pub create_from_dir: CreateFromDirFn,
    pub create_from_binary: CreateFromBinaryFn,
    pub run_parse: RunParseFn,
    pub run_tag: RunTagFn,
    pub get_last_error: GetLastErrorFn,
    pub destroy_client: DestroyClientFn,
    pub destroy_result: DestroyResultFn,
    pub destroy_tagged_entity_list: DestroyTaggedEntityListFn,
    pub destroy_string: DestroyStringFn,
}

#[cfg(test)]
mod tests {
    use super::symbols;

    #[test]
    fn test_symbols_are_nul_terminated() {
        let all = [
            symbols::GET_MODEL_VERSION,
            symbols::CREATE_FROM_DIR,
            symbols::CREATE_FROM_BINARY,
            symbols::RUN_PARSE,
            symbols::RUN_TAG,
            symbols::GET_LAST_ERROR,
            symbols::DESTROY_CLIENT,
            symbols::DESTROY_RESULT,
            symbols::DESTROY_TAGGED_ENTITY_LIST,
            symbols::DESTROY_STRING,
        ];
        for name in all {
            assert_eq!(name.last(), Some(&0));
            assert!(name.starts_with(b"nlu_engine_"));
            assert_eq!(name.iter().filter(|b| **b == 0).count(), 1);
        }
    }
}
