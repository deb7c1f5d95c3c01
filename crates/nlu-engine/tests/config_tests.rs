//! Library location from the environment

use std::env;

use nlu_engine::{Error, LibraryConfig, NativeLibrary, LIBRARY_PATH_ENV};
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    env::set_var(LIBRARY_PATH_ENV, "/opt/nlu/libcustom_engine.so");
    let config = LibraryConfig::from_env();
    env::remove_var(LIBRARY_PATH_ENV);

    assert_eq!(config.path.to_str(), Some("/opt/nlu/libcustom_engine.so"));
}

#[test]
#[serial]
fn test_unset_env_uses_platform_name() {
    env::remove_var(LIBRARY_PATH_ENV);
    assert_eq!(LibraryConfig::from_env(), LibraryConfig::default_name());
}

#[test]
#[serial]
fn test_missing_library_reports_path() {
    let config = LibraryConfig::new("/nonexistent/libnlu_engine.so");
    match NativeLibrary::load(&config) {
        Err(Error::Library(e)) => {
            assert!(e.to_string().contains("/nonexistent/libnlu_engine.so"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
