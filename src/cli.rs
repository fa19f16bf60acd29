use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "epscript",
    version,
    about = "Local television transcript extraction and statistics tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Parse(ParseArgs),
    Batch(BatchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Plain-text transcript extracted from a script document.
    #[arg(long)]
    pub input: PathBuf,

    /// Destination for the parsed JSON; defaults to the input path with a
    /// .json extension.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the parsed document to stdout as pretty JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Defaults to writing each JSON next to its transcript.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value = "txt")]
    pub extension: String,
}
