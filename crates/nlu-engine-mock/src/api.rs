//! Exported engine entry points
//!
//! Every function returns `STATUS_OK` on success. On failure it returns
//! `STATUS_KO` and stores a message that `nlu_engine_get_last_error` hands
//! out once.

use std::os::raw::{c_char, c_int, c_uchar};
use std::path::Path;
use std::slice;

use nlu_engine_sys::{
    CClient, CIntentParserResult, CTaggedEntityList, StatusCode, STATUS_KO, STATUS_OK,
};

use crate::assistant::Assistant;
use crate::error::{validate_ptr, MockError};
use crate::memory::{
    allocate_entity_list, allocate_parser_result, allocate_string, c_str_to_string, free_entity_list,
    free_parser_result, free_string, take_last_error,
};
use crate::stats;
use crate::MODEL_VERSION;

/// State behind an opaque client pointer
struct MockClient {
    assistant: Assistant,
}

fn into_client(assistant: Assistant) -> *mut CClient {
    stats::record(|s| s.clients_created += 1);
    Box::into_raw(Box::new(MockClient { assistant })) as *mut CClient
}

unsafe fn client_ref<'a>(client: *mut CClient) -> Result<&'a MockClient, MockError> {
    validate_ptr(client, "client")?;
    Ok(&*(client as *const MockClient))
}

/// Write the supported model version to `version`
///
/// # Safety
/// `version` must be valid for writes. The string must be released with
/// `nlu_engine_destroy_string`.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_get_model_version(version: *mut *mut c_char) -> StatusCode {
    ffi_boundary!({
        validate_ptr(version, "version")?;
        *version = allocate_string(MODEL_VERSION)?;
        Ok(())
    })
}

/// Create a client from the model stored in directory `root_dir`
///
/// # Safety
/// `root_dir` must be a NUL-terminated string and `client` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_create_from_dir(
    root_dir: *const c_char,
    client: *mut *mut CClient,
) -> StatusCode {
    ffi_boundary!({
        validate_ptr(client, "client")?;
        let root_dir = c_str_to_string(root_dir, "root_dir")?;
        let assistant = Assistant::from_dir(Path::new(&root_dir))?;
        *client = into_client(assistant);
        Ok(())
    })
}

/// Create a client from a model archive of `size` bytes at `data`
///
/// # Safety
/// `data` must point to `size` readable bytes and `client` be valid for
/// writes.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_create_from_binary(
    data: *const c_uchar,
    size: c_int,
    client: *mut *mut CClient,
) -> StatusCode {
    ffi_boundary!({
        validate_ptr(client, "client")?;
        if size < 0 {
            return Err(MockError::InvalidSize(size));
        }
        let bytes = if size == 0 {
            &[][..]
        } else {
            validate_ptr(data, "data")?;
            slice::from_raw_parts(data, size as usize)
        };
        let assistant = Assistant::from_bytes(bytes)?;
        *client = into_client(assistant);
        Ok(())
    })
}

/// Parse `input` into an intent parser result
///
/// # Safety
/// `client` must come from a create function, `input` must be a
/// NUL-terminated string and `result` valid for writes. The result must be
/// released with `nlu_engine_destroy_result`.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_run_parse(
    client: *mut CClient,
    input: *const c_char,
    result: *mut *mut CIntentParserResult,
) -> StatusCode {
    ffi_boundary!({
        validate_ptr(result, "result")?;
        let client = client_ref(client)?;
        let input = c_str_to_string(input, "input")?;
        *result = allocate_parser_result(client.assistant.parse(&input))?;
        Ok(())
    })
}

/// Tag the entities of `input` for `intent`
///
/// # Safety
/// Same as `nlu_engine_run_parse`. The list must be released with
/// `nlu_engine_destroy_tagged_entity_list`.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_run_tag(
    client: *mut CClient,
    input: *const c_char,
    intent: *const c_char,
    result: *mut *mut CTaggedEntityList,
) -> StatusCode {
    ffi_boundary!({
        validate_ptr(result, "result")?;
        let client = client_ref(client)?;
        let input = c_str_to_string(input, "input")?;
        let intent = c_str_to_string(intent, "intent")?;
        let entities = client.assistant.tag(&input, &intent)?;
        *result = allocate_entity_list(&entities)?;
        Ok(())
    })
}

/// Move the pending error message of this thread into `error`
///
/// Fails without touching `error` when no message is pending.
///
/// # Safety
/// `error` must be valid for writes. The string must be released with
/// `nlu_engine_destroy_string`.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_get_last_error(error: *mut *mut c_char) -> StatusCode {
    if error.is_null() {
        return STATUS_KO;
    }
    let Some(message) = take_last_error() else {
        return STATUS_KO;
    };
    match allocate_string(&message) {
        Ok(raw) => {
            stats::record(|s| s.errors_retrieved += 1);
            *error = raw;
            STATUS_OK
        }
        Err(_) => STATUS_KO,
    }
}

/// Destroy a client
///
/// # Safety
/// `client` must come from a create function and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_destroy_client(client: *mut CClient) -> StatusCode {
    ffi_boundary!({
        validate_ptr(client, "client")?;
        drop(Box::from_raw(client as *mut MockClient));
        stats::record(|s| s.clients_destroyed += 1);
        Ok(())
    })
}

/// Destroy a result from `nlu_engine_run_parse`
///
/// # Safety
/// `result` must come from `nlu_engine_run_parse` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_destroy_result(result: *mut CIntentParserResult) -> StatusCode {
    ffi_boundary!({
        validate_ptr(result, "result")?;
        free_parser_result(result);
        Ok(())
    })
}

/// Destroy a list from `nlu_engine_run_tag`
///
/// # Safety
/// `result` must come from `nlu_engine_run_tag` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_destroy_tagged_entity_list(
    result: *mut CTaggedEntityList,
) -> StatusCode {
    ffi_boundary!({
        validate_ptr(result, "result")?;
        free_entity_list(result);
        Ok(())
    })
}

/// Destroy a string returned by this library
///
/// # Safety
/// `string` must come from this library and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn nlu_engine_destroy_string(string: *mut c_char) -> StatusCode {
    ffi_boundary!({
        validate_ptr(string, "string")?;
        free_string(string);
        Ok(())
    })
}

