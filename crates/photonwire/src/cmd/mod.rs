use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod layout;
pub mod size;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON pipeline result into packet bytes.
    Encode(EncodeArgs),
    /// Decode packet bytes and print the pipeline result.
    Decode(DecodeArgs),
    /// Print the exact packet size for a target count.
    Size(SizeArgs),
    /// Print the packet wire layout.
    Layout(LayoutArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Size(args) => size::run(args, format),
        Command::Layout(args) => layout::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Pipeline result as an inline JSON document.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the JSON document from a file ("-" for stdin).
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Write packet bytes to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Packet file to decode ("-" for stdin).
    pub path: PathBuf,
    /// Receive timestamp to stamp on the decoded result, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timestamp: Option<f64>,
}

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Number of targets in the result.
    #[arg(long, short = 't', default_value = "0")]
    pub targets: usize,
}

#[derive(Args, Debug, Default)]
pub struct LayoutArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
