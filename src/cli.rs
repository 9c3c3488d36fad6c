//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// A modal terminal text editor
#[derive(Parser, Debug)]
#[command(name = "kestrel", version, about = "A modal terminal text editor")]
pub struct CliArgs {
    /// File to open, or a directory to browse in the file tree
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// What to open at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMode {
    /// Start with an empty buffer
    Empty,
    /// Open a single file (which may not exist yet)
    File(PathBuf),
    /// Empty buffer with the file tree showing this directory
    Directory(PathBuf),
}

impl CliArgs {
    /// Convert parsed CLI args into a startup mode
    pub fn startup_mode(&self) -> StartupMode {
        match &self.path {
            None => StartupMode::Empty,
            Some(path) if path.is_dir() => StartupMode::Directory(path.clone()),
            Some(path) => StartupMode::File(path.clone()),
        }
    }
}
