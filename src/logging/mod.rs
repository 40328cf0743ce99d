//! Diagnostics go through the `log` facade; the user-facing record of a reset goes through an
//! [`ActionSink`].
mod action_log;

pub use action_log::{ActionLog, ActionSink};

#[cfg(test)]
pub use action_log::MemorySink;

use std::io::Write;

use colored::Colorize;
use log::{Level, LevelFilter};

/// Initializes the diagnostics logger. `RUST_LOG` takes precedence over `level`.
pub fn init(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "ERROR".bright_red().bold(),
                Level::Warn => "WARN".yellow().bold(),
                Level::Info => "INFO".green(),
                Level::Debug => "DEBUG".blue(),
                Level::Trace => "TRACE".dimmed(),
            };
            writeln!(
                buf,
                "[{} {}] {}",
                crate::time::get_formatted_time("%H:%M:%S"),
                level,
                record.args()
            )
        })
        .init();
}
