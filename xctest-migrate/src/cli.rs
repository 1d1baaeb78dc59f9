use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "xctest-migrate")]
#[command(about = "Migrate XCTest suites to Swift Testing")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "folder"])))]
pub struct Cli {
    /// Swift file to migrate.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Migrate every `.swift` file below this folder.
    #[arg(long)]
    pub folder: Option<PathBuf>,
    /// Write the migrated file here instead of in place.
    #[arg(short, long, conflicts_with = "folder")]
    pub output: Option<PathBuf>,
    /// Keep a `<file>.backup` copy of every file overwritten in place.
    #[arg(long)]
    pub backup: bool,
    /// Show what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,
    #[arg(short, long)]
    pub verbose: bool,
    /// Folder summary format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// TOML file overriding framework names and naming rules.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
