//! Interactive console input.
mod command_line;

pub use command_line::{parse_selection, prompt_region, SelectionError};
