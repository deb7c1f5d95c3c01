//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// NLU engine CLI - intent parsing and slot tagging from the terminal
///
/// Loads the engine shared library, creates an engine from a trained
/// assistant and prints what it understood.
#[derive(Parser, Debug)]
#[command(
    name = "nlu-engine",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "NLU_ENGINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the engine shared library
    #[arg(long, global = true, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the model version supported by the engine library
    Version,

    /// Detect the intent of a sentence and extract its slots
    Parse(ParseArgs),

    /// Extract the slots of a sentence for a given intent
    Tag(TagArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),
}

/// Where to load the assistant from
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Directory containing the trained assistant
    #[arg(long, value_name = "DIR", conflicts_with = "model_file")]
    pub model_dir: Option<PathBuf>,

    /// Serialized assistant, loaded from memory
    #[arg(long, value_name = "FILE")]
    pub model_file: Option<PathBuf>,
}

/// Arguments for the parse command
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Sentence to parse
    #[arg(value_name = "INPUT")]
    pub input: String,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the tag command
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Sentence to tag
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Intent whose slots should be extracted
    #[arg(short, long)]
    pub intent: String,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Output format options
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}
