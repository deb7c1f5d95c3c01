//! Version, parse and tag command handlers

use crate::cli::{ModelArgs, OutputFormat, ParseArgs, TagArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use nlu_engine::{NativeLibrary, NluEngine};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct VersionInfo {
    cli_version: &'static str,
    model_version: String,
    library: Option<PathBuf>,
}

/// Handle the version command
pub fn handle_version(library: Arc<NativeLibrary>, output: &mut OutputWriter) -> Result<()> {
    let info = VersionInfo {
        cli_version: clap::crate_version!(),
        model_version: library.model_version()?,
        library: library.path().map(PathBuf::from),
    };

    if output.format() == OutputFormat::Human {
        output.writeln(&format!("Model version: {}", info.model_version))?;
        if let Some(path) = &info.library {
            output.info(&format!("Engine library: {}", path.display()))?;
        }
        Ok(())
    } else {
        output.data(&info)
    }
}

/// Handle the parse command
pub fn handle_parse(
    args: ParseArgs,
    config: &Config,
    library: Arc<NativeLibrary>,
    output: &mut OutputWriter,
) -> Result<()> {
    let engine = open_engine(&args.model, config, library)?;
    let result = engine.parse(&args.input)?;
    engine.close()?;

    if result.intent.is_none() {
        output.warning("No intent recognized")?;
    }
    output.parse_result(&result)
}

/// Handle the tag command
pub fn handle_tag(
    args: TagArgs,
    config: &Config,
    library: Arc<NativeLibrary>,
    output: &mut OutputWriter,
) -> Result<()> {
    let engine = open_engine(&args.model, config, library)?;
    let entities = engine.tag(&args.input, &args.intent)?;
    engine.close()?;

    output.entities(&entities)
}

/// Create an engine from `--model-file`, `--model-dir` or the configured directory
fn open_engine(model: &ModelArgs, config: &Config, library: Arc<NativeLibrary>) -> Result<NluEngine> {
    if let Some(file) = &model.model_file {
        if !file.exists() {
            return Err(Error::FileNotFound { path: file.clone() });
        }
        let data = fs::read(file)?;
        tracing::info!(path = %file.display(), bytes = data.len(), "Loading assistant from memory");
        return Ok(NluEngine::from_binary_with(library, &data)?);
    }

    let dir = model
        .model_dir
        .as_ref()
        .or(config.model_dir.as_ref())
        .ok_or_else(|| {
            Error::invalid_args(
                "no model given: pass --model-dir or --model-file, or set model_dir in the configuration",
            )
        })?;
    if !dir.is_dir() {
        return Err(Error::FileNotFound { path: dir.clone() });
    }

    tracing::info!(path = %dir.display(), "Loading assistant directory");
    Ok(NluEngine::from_dir_with(library, dir)?)
}
