//! Command line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "order-audit")]
#[command(author, version, about = "Audit exported order records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate records and write the HTML dashboard
    Validate(ValidateArgs),

    /// Convert records to CSV without validating them
    Convert(ConvertArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// JSON input: an array of objects, concatenated objects, or both
    pub input: PathBuf,

    /// Also export every decoded record to CSV
    #[arg(long)]
    pub csv: bool,

    /// CSV destination (defaults to output.csv_export)
    #[arg(long, value_name = "PATH")]
    pub csv_path: Option<PathBuf>,

    /// HTML report destination (defaults to output.html_report)
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    pub input: PathBuf,

    /// CSV destination (defaults to output.converted_csv)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Command {
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Command::Validate(args) => args.config.as_ref(),
            Command::Convert(args) => args.config.as_ref(),
        }
    }
}
