//! Output formatting and writing utilities
//!
//! Results are written in the selected format (JSON, YAML or
//! human-readable). Status messages only appear in the human format.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use nlu_engine::{IntentParserResult, Range, TaggedEntity};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Formatting of values and engine results
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a parse result
    fn format_parse_result(&self, result: &IntentParserResult) -> Result<String>;

    /// Format the entities returned by a tag call
    fn format_entities(&self, entities: &[TaggedEntity]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_parse_result(&self, result: &IntentParserResult) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_parse_result_human(result)),
            _ => self.format(result),
        }
    }

    fn format_entities(&self, entities: &[TaggedEntity]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_entities_human(entities)),
            _ => self.format(&entities),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a parse result
    pub fn parse_result(&mut self, result: &IntentParserResult) -> Result<()> {
        let formatted = self.format.format_parse_result(result)?;
        self.writeln(formatted.trim_end())
    }

    /// Write tagged entities
    pub fn entities(&mut self, entities: &[TaggedEntity]) -> Result<()> {
        let formatted = self.format.format_entities(entities)?;
        self.writeln(formatted.trim_end())
    }
}

fn format_range(range: Option<Range>) -> String {
    match range {
        Some(range) => format!("{}..{}", range.start, range.end),
        None => "-".to_string(),
    }
}

/// Format a parse result for human reading
fn format_parse_result_human(result: &IntentParserResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Input:  {}", result.input);

    match &result.intent {
        Some(intent) => {
            let _ = writeln!(
                output,
                "Intent: {} ({:.2})",
                intent.intent_name, intent.probability
            );
        }
        None => output.push_str("Intent: none\n"),
    }

    if result.slots.is_empty() {
        output.push_str("Slots:  none\n");
    } else {
        output.push_str("Slots:\n");
        for slot in &result.slots {
            let _ = writeln!(
                output,
                "  {} = {:?} [{}] {}",
                slot.slot_name,
                slot.value,
                slot.entity,
                format_range(slot.range)
            );
        }
    }

    output
}

/// Format tagged entities for human reading
fn format_entities_human(entities: &[TaggedEntity]) -> String {
    if entities.is_empty() {
        return "No entities found\n".to_string();
    }

    let mut output = String::new();
    for entity in entities {
        let _ = writeln!(
            output,
            "{} = {:?} [{}] {}",
            entity.slot_name,
            entity.value,
            entity.entity,
            format_range(entity.range)
        );
    }
    output
}

#[cfg(test)]
mod tests {
    include!("output/tests.rs");
}
