//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod config;
mod engine;

pub use config::handle_config;
pub use engine::{handle_parse, handle_tag, handle_version};

use crate::config::Config;
use crate::error::Result;
use nlu_engine::NativeLibrary;
use std::path::Path;
use std::sync::Arc;

/// Load the engine library named by the command line, config file or environment
pub fn load_library(config: &Config, flag: Option<&Path>) -> Result<Arc<NativeLibrary>> {
    let library_config = config.library_config(flag);
    tracing::info!(path = %library_config.path.display(), "Loading engine library");
    Ok(Arc::new(NativeLibrary::load(&library_config)?))
}
