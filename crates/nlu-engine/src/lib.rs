//! NLU Engine - safe bindings to the intent parsing engine library
//!
//! The engine is a shared library exposing a C ABI (see `nlu-engine-sys`).
//! This crate loads it, owns the native client handle, checks every status
//! code and decodes native results into plain Rust values, releasing native
//! memory before returning.
//!
//! # Example
//!
//! ```no_run
//! use nlu_engine::NluEngine;
//!
//! fn main() -> nlu_engine::Result<()> {
//!     println!("model version {}", nlu_engine::model_version()?);
//!
//!     let engine = NluEngine::from_dir("/opt/assistant")?;
//!     let result = engine.parse("Set the color of the lights to blue")?;
//!     println!("{:?}", result.intent);
//!     for slot in &result.slots {
//!         println!("{} = {}", slot.slot_name, slot.value);
//!     }
//!
//!     let entities = engine.tag("Set the color of the lights to blue", "ActivateLightColor")?;
//!     println!("{} entities", entities.len());
//!     Ok(())
//! }
//! ```
//!
//! Set `NLU_ENGINE_LIBRARY` to load the engine from a specific path.

#![warn(missing_docs)]

pub mod config;
mod engine;
pub mod error;
mod library;
mod marshal;
mod memory;
pub mod model;
mod status;

pub use config::{LibraryConfig, LIBRARY_PATH_ENV};
pub use engine::NluEngine;
pub use error::{Error, LibraryError, Result};
pub use library::NativeLibrary;
pub use model::{IntentClassifierResult, IntentParserResult, Range, Slot, TaggedEntity};

/// Version of the model format understood by the process-wide engine library
pub fn model_version() -> Result<String> {
    NativeLibrary::global()?.model_version()
}
