//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use rxclaims_core::GroundedPrompt;

/// Format retrieved candidates, optionally followed by the prompt
pub fn format_inspection(
    grounded: &GroundedPrompt<'_>,
    show_prompt: bool,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => json::format_inspection(grounded, show_prompt),
        OutputFormat::Cli => terminal::format_inspection(grounded, show_prompt),
    }
}
