//! ABI boundary tests
//!
//! These drive the exported functions directly, the way a foreign caller
//! would, and check status codes, error retrieval and memory release.

use std::ffi::{CStr, CString};
use std::fs;
use std::os::raw::c_char;
use std::ptr;

use nlu_engine_mock::*;
use nlu_engine_sys::{CClient, NO_RANGE, STATUS_KO, STATUS_OK};

const MODEL: &str = r#"{
    "language": "en",
    "intents": [{
        "name": "ActivateLightColor",
        "keywords": ["set", "color", "lights"],
        "slots": [{ "name": "objectColor", "entity": "color", "values": ["blue"] }]
    }]
}"#;

fn to_c_string(s: &str) -> CString {
    CString::new(s).unwrap()
}

unsafe fn from_c_string(s: *const c_char) -> String {
    CStr::from_ptr(s).to_string_lossy().into_owned()
}

unsafe fn last_error() -> Option<String> {
    let mut error = ptr::null_mut();
    if nlu_engine_get_last_error(&mut error) != STATUS_OK {
        return None;
    }
    let message = from_c_string(error);
    assert_eq!(nlu_engine_destroy_string(error), STATUS_OK);
    Some(message)
}

unsafe fn client_from_model() -> *mut CClient {
    let mut client = ptr::null_mut();
    let status = nlu_engine_create_from_binary(MODEL.as_ptr(), MODEL.len() as i32, &mut client);
    assert_eq!(status, STATUS_OK);
    client
}

#[test]
fn test_parse_and_release() {
    stats::reset();
    unsafe {
        let client = client_from_model();
        let input = to_c_string("set the lights to blue");
        let mut result = ptr::null_mut();
        assert_eq!(nlu_engine_run_parse(client, input.as_ptr(), &mut result), STATUS_OK);

        let record = &*result;
        assert_eq!(from_c_string(record.input), "set the lights to blue");
        let intent = &*record.intent;
        assert_eq!(from_c_string(intent.intent_name), "ActivateLightColor");
        assert!((intent.probability - 2.0 / 3.0).abs() < 1e-6);
        let slots = &*record.slots;
        assert_eq!(slots.size, 1);
        let slot = &*slots.slots;
        assert_eq!(from_c_string(slot.value), "blue");
        assert_eq!((slot.range_start, slot.range_end), (18, 22));

        assert_eq!(nlu_engine_destroy_result(result), STATUS_OK);
        assert_eq!(nlu_engine_destroy_client(client), STATUS_OK);
    }
    assert!(stats::snapshot().is_balanced());
}

#[test]
fn test_unrecognized_input_has_no_intent() {
    unsafe {
        let client = client_from_model();
        let input = to_c_string("what's the weather");
        let mut result = ptr::null_mut();
        assert_eq!(nlu_engine_run_parse(client, input.as_ptr(), &mut result), STATUS_OK);
        assert!((*result).intent.is_null());
        assert!((*result).slots.is_null());
        nlu_engine_destroy_result(result);
        nlu_engine_destroy_client(client);
    }
}

#[test]
fn test_tag_unknown_intent_sets_error() {
    stats::reset();
    unsafe {
        let client = client_from_model();
        let input = to_c_string("blue");
        let intent = to_c_string("OrderCoffee");
        let mut result = ptr::null_mut();
        let status = nlu_engine_run_tag(client, input.as_ptr(), intent.as_ptr(), &mut result);

        assert_eq!(status, STATUS_KO);
        assert!(result.is_null());
        assert_eq!(last_error().as_deref(), Some("Unknown intent 'OrderCoffee'"));
        // The message is handed out once
        assert_eq!(last_error(), None);
        nlu_engine_destroy_client(client);
    }
    let stats = stats::snapshot();
    assert_eq!((stats.errors_raised, stats.errors_retrieved), (1, 1));
    assert!(stats.is_balanced());
}

#[test]
fn test_tagged_default_has_no_range() {
    let model = r#"{"intents": [{"name": "Lights", "keywords": ["lights"],
        "slots": [{"name": "room", "entity": "room", "values": [], "default": "hall"}]}]}"#;
    unsafe {
        let mut client = ptr::null_mut();
        assert_eq!(
            nlu_engine_create_from_binary(model.as_ptr(), model.len() as i32, &mut client),
            STATUS_OK
        );
        let input = to_c_string("lights on");
        let intent = to_c_string("Lights");
        let mut list = ptr::null_mut();
        assert_eq!(
            nlu_engine_run_tag(client, input.as_ptr(), intent.as_ptr(), &mut list),
            STATUS_OK
        );
        let entity = &*(*list).entities;
        assert_eq!(from_c_string(entity.value), "hall");
        assert_eq!(entity.range_start, NO_RANGE);
        nlu_engine_destroy_tagged_entity_list(list);
        nlu_engine_destroy_client(client);
    }
}

#[test]
fn test_create_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(assistant::MODEL_FILE), MODEL).unwrap();
    let root = to_c_string(dir.path().to_str().unwrap());

    unsafe {
        let mut client = ptr::null_mut();
        assert_eq!(nlu_engine_create_from_dir(root.as_ptr(), &mut client), STATUS_OK);
        assert!(!client.is_null());
        assert_eq!(nlu_engine_destroy_client(client), STATUS_OK);
    }
}

#[test]
fn test_create_from_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let root = to_c_string(dir.path().join("missing").to_str().unwrap());

    unsafe {
        let mut client = ptr::null_mut();
        assert_eq!(nlu_engine_create_from_dir(root.as_ptr(), &mut client), STATUS_KO);
        assert!(client.is_null());
        let message = last_error().unwrap();
        assert!(message.starts_with("Could not read model file"), "{}", message);
    }
}

#[test]
fn test_corrupt_archive() {
    let garbage = [0x50u8, 0x4b, 0x03, 0x04, 0xff, 0x00];
    unsafe {
        let mut client = ptr::null_mut();
        let status = nlu_engine_create_from_binary(garbage.as_ptr(), garbage.len() as i32, &mut client);
        assert_eq!(status, STATUS_KO);
        assert!(last_error().unwrap().starts_with("Invalid model archive"));
    }
}

#[test]
fn test_negative_size() {
    unsafe {
        let mut client = ptr::null_mut();
        assert_eq!(nlu_engine_create_from_binary(ptr::null(), -4, &mut client), STATUS_KO);
        assert_eq!(last_error().as_deref(), Some("Invalid data size -4"));
    }
}

#[test]
fn test_null_pointer_handling() {
    unsafe {
        let mut result = ptr::null_mut();
        let input = to_c_string("blue");
        assert_eq!(
            nlu_engine_run_parse(ptr::null_mut(), input.as_ptr(), &mut result),
            STATUS_KO
        );
        assert_eq!(last_error().as_deref(), Some("client is null"));

        assert_eq!(nlu_engine_destroy_string(ptr::null_mut()), STATUS_KO);
        assert_eq!(last_error().as_deref(), Some("string is null"));

        assert_eq!(nlu_engine_get_last_error(ptr::null_mut()), STATUS_KO);
    }
}

#[test]
fn test_errors_are_per_thread() {
    unsafe {
        assert_eq!(nlu_engine_destroy_client(ptr::null_mut()), STATUS_KO);
    }
    let other = std::thread::spawn(|| unsafe { last_error() }).join().unwrap();
    assert_eq!(other, None);
    assert_eq!(unsafe { last_error() }.as_deref(), Some("client is null"));
}

#[test]
fn test_native_api_table() {
    let api = native_api();
    unsafe {
        let mut version = ptr::null_mut();
        assert_eq!((api.get_model_version)(&mut version), STATUS_OK);
        assert_eq!(from_c_string(version), MODEL_VERSION);
        assert_eq!((api.destroy_string)(version), STATUS_OK);
    }
}
