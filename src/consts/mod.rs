//! This module is where we store constants, like the save file naming scheme or the default
//! formatting of the action log.

/// Module where we store information relevant to the save directory layout.
pub mod save_format {
    /// Prefix of the files holding a 10x10 tile grid cell.
    pub const MAP_PREFIX: &str = "map";

    /// Prefixes of the per-chunk metadata files.
    pub const META_PREFIXES: [&str; 2] = ["chunkdata", "zpop"];

    /// Separator between the prefix and the coordinates, e.g. `map_12_-3.bin`.
    pub const SEPARATOR: char = '_';

    /// How many tiles are stored along each axis of a single map file.
    pub const TILES_PER_MAP_FILE: i64 = 10;
}

/// Module used to store file paths relative to the binary.
pub mod file_paths {
    /// Configuration document looked up beside the executable.
    pub const CONFIG: &str = "config.json";
    /// Default action log file, when the configuration does not name one.
    pub const ACTION_LOG: &str = "log.log";
}

/// Defaults for the action log output.
pub mod action_log {
    pub const CONSOLE_WIDTH: usize = 65;
    pub const TREE_INDENT: char = '>';
    pub const CLOCK_FORMAT: &str = "%H:%M:%S%.3f";
}

/// Console messages.
pub mod messages {

    use colored::*;
    use once_cell::sync::Lazy;

    pub static REGION_PROMPT: Lazy<String> =
        Lazy::new(|| "Which region would you like to reset?".bold().to_string());

    pub static RESET_DONE: Lazy<String> =
        Lazy::new(|| "[ RESET COMPLETE ]".bright_green().bold().to_string());

    pub static RESET_DONE_WITH_FAILURES: Lazy<String> = Lazy::new(|| {
        "[ RESET COMPLETE WITH FAILURES ]"
            .bright_yellow()
            .bold()
            .to_string()
    });

    pub static EXIT_ERROR: Lazy<String> =
        Lazy::new(|| "[ EXITED WITH ERROR ]".bright_red().bold().to_string());

    pub static EXIT_CTRL_C: Lazy<String> = Lazy::new(|| {
        "[ RESET INTERRUPTED WITH CTRL+C ]"
            .bright_red()
            .bold()
            .to_string()
    });

    /// Used when the user picked a region that cannot be reset.
    pub fn invalid_selection(reason: &str) -> String {
        format!("ERROR: {reason}").bright_red().bold().to_string()
    }
}
