//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use nlu_engine::NativeLibrary;

pub const LIGHTS_INPUT: &str = "Set the color of the lights to blue";

/// Engine entry points linked into the test binary
pub fn linked_library() -> Arc<NativeLibrary> {
    Arc::new(unsafe { NativeLibrary::from_api(nlu_engine_mock::native_api()) })
}

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/lights")
}

pub fn fixture_bytes() -> Vec<u8> {
    fs::read(fixture_dir().join(nlu_engine_mock::assistant::MODEL_FILE)).unwrap()
}

/// The mock engine built as a shared library next to the test binary, if any
pub fn built_mock_library() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?;
    let file_name = libloading::library_filename("nlu_engine_mock");

    [deps.to_path_buf(), deps.parent()?.to_path_buf()]
        .into_iter()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file())
}
