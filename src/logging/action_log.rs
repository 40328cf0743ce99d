use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::warn;

use crate::{consts, time};

/// Append-only record of what a reset did.
pub trait ActionSink {
    /// Appends a regular line.
    fn add_line(&mut self, message: &str);

    /// Appends a section header.
    fn add_header(&mut self, message: &str);

    /// Appends the current date and time between two rules.
    fn timestamp(&mut self);
}

/// Writes the action log to the console and, optionally, to a file.
///
/// Every line is prefixed with the wall-clock time: `[13:37:00.123] > Deleting map_1_2.bin`.
/// Headers are padded with dashes up to the console width.
pub struct ActionLog {
    console_width: usize,
    file: Option<File>,
    tree_indent: Option<char>,
    clock_format: String,
}

impl ActionLog {
    /// Creates a log printing to the console. When `save` is set, `path` is truncated and every
    /// line is also written to it. A log file that cannot be created is reported and skipped.
    pub fn new(console_width: usize, save: bool, path: &Path) -> Self {
        let file = if save {
            match File::create(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    warn!("Could not open the log file {}: {e}", path.display());
                    None
                }
            }
        } else {
            None
        };

        Self {
            console_width,
            file,
            tree_indent: None,
            clock_format: consts::action_log::CLOCK_FORMAT.to_string(),
        }
    }

    /// Turns the last `indentation` marker of each console line into a tree branch.
    pub fn enable_treeview(&mut self, indentation: char) {
        self.tree_indent = Some(indentation);
    }

    /// Replaces the `strftime` pattern used for the time prefix.
    pub fn use_custom_strftime(&mut self, pattern: &str) {
        self.clock_format = pattern.to_string();
    }

    /// Draws a console-width rule of `=`.
    pub fn linebreak(&mut self) {
        let rule = "=".repeat(self.console_width);
        self.emit(&rule);
    }

    pub fn add(&mut self, message: &str, header: bool) {
        let clock = time::get_formatted_time(&self.clock_format);
        let line = format_line(&clock, message, header, self.console_width);
        self.emit(&line);
    }

    fn emit(&mut self, line: &str) {
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{line}") {
                warn!("Could not write to the log file, disabling it: {e}");
                self.file = None;
            }
        }

        match self.tree_indent {
            Some(indent) => println!("{}", tree_view(line, indent)),
            None => println!("{line}"),
        }
    }
}

impl ActionSink for ActionLog {
    fn add_line(&mut self, message: &str) {
        self.add(message, false);
    }

    fn add_header(&mut self, message: &str) {
        self.add(message, true);
    }

    fn timestamp(&mut self) {
        self.linebreak();
        let now = time::get_iso8601_time();
        self.emit(&now);
        self.linebreak();
    }
}

/// `[clock] message`, followed for headers by a dash rule filling the console width.
fn format_line(clock: &str, message: &str, header: bool, console_width: usize) -> String {
    if header {
        let used = 1 + clock.chars().count() + 2 + message.chars().count() + 1;
        let dashes = "-".repeat(console_width.saturating_sub(used));
        format!("[{clock}] {message} {dashes}")
    } else {
        format!("[{clock}] {message}")
    }
}

/// Draws the last `indent` as a branch and every earlier one as four spaces:
/// `">> file"` becomes `"    └╴> file"`.
fn tree_view(line: &str, indent: char) -> String {
    match line.rfind(indent) {
        Some(pos) => {
            let head = line[..pos].replace(indent, "    ");
            let tail = &line[pos + indent.len_utf8()..];
            format!("{head}\u{2514}\u{2574}{indent}{tail}")
        }
        None => line.to_string(),
    }
}

/// Keeps every entry in memory.
#[cfg(test)]
#[derive(Default, Debug)]
pub struct MemorySink {
    pub lines: Vec<String>,
    pub headers: Vec<String>,
    pub timestamps: usize,
}

#[cfg(test)]
impl ActionSink for MemorySink {
    fn add_line(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn add_header(&mut self, message: &str) {
        self.headers.push(message.to_string());
    }

    fn timestamp(&mut self) {
        self.timestamps += 1;
    }
}
