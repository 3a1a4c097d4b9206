//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rxclaims")]
#[command(
    author,
    version,
    about = "Answer questions about pharmacy claims, grounded in the claims on file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Claims JSON/JSONL file or directory
    #[arg(long, global = true, env = "RXCLAIMS_CLAIMS")]
    pub claims: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer one question
    Ask(AskArgs),

    /// Interactive question loop on stdin
    Chat,

    /// Show retrieved claims and the prompt without generating
    Inspect(InspectArgs),

    /// Show claims corpus status
    Status,
}

#[derive(Args)]
pub struct AskArgs {
    /// Question text
    pub query: Vec<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Question text
    pub query: Vec<String>,

    /// Print the full grounding prompt
    #[arg(long)]
    pub prompt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
