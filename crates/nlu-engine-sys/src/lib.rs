//! Raw bindings to the NLU engine C ABI
//!
//! This crate only declares layouts and signatures. It performs no calls and
//! makes no ownership decisions; see the `nlu-engine` crate for the safe
//! wrapper.
//!
//! # Conventions
//!
//! - Every function returns `1` on success and any other value on failure.
//! - After a failure, exactly one message can be fetched with
//!   `nlu_engine_get_last_error` and must be released with
//!   `nlu_engine_destroy_string`.
//! - Strings nested in a result record are owned by that record and are
//!   released by the record's destroy function, never individually.

#![warn(missing_docs)]

pub mod api;
pub mod types;

pub use api::*;
pub use types::*;
