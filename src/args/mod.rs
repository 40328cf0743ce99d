//! Command line arguments.
use std::path::PathBuf;

use clap::Parser;

use crate::consts;

/// Resets a rectangular region of a saved world by deleting its map files.
#[derive(Parser, Debug, Clone)]
#[command(name = "mapreset", version)]
pub struct Args {
    /// Path to the JSON configuration document. Defaults to `config.json` beside the executable.
    pub config: Option<PathBuf>,

    /// Index of the region to reset, skipping the interactive prompt.
    #[arg(long)]
    pub region: Option<String>,

    /// Report the files that would be removed without deleting anything.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print debug diagnostics.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// The configuration path to load, falling back to the one beside the executable.
    pub fn config_path(&self) -> PathBuf {
        match &self.config {
            Some(path) => path.clone(),
            None => default_config_path(),
        }
    }
}

/// Parses the process arguments, exiting with usage on error.
pub fn init() -> Args {
    Args::parse()
}

fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(consts::file_paths::CONFIG)))
        .unwrap_or_else(|| PathBuf::from(consts::file_paths::CONFIG))
}
