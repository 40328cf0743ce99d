use std::io::{self, BufRead, Write};

use log::debug;
use thiserror::Error;

use crate::config::Region;
use crate::consts::messages;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Incorrect region selection: {0:?}")]
    NotANumber(String),

    #[error("Region out of bounds: {index} (there are {count} regions)")]
    OutOfRange { index: i64, count: usize },

    #[error("Could not read the selection: {0}")]
    Io(#[from] io::Error),
}

impl SelectionError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SelectionError::NotANumber(_) | SelectionError::Io(_) => 1,
            SelectionError::OutOfRange { .. } => 2,
        }
    }
}

/// Parses a region index typed by the user, checking it against the number of regions.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    let trimmed = input.trim();
    let index: i64 = match trimmed.parse() {
        Ok(index) => index,
        // Still an integer, just past what any region list can hold.
        Err(_) if is_integer(trimmed) => {
            let index = if trimmed.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            };
            return Err(SelectionError::OutOfRange { index, count });
        }
        Err(_) => return Err(SelectionError::NotANumber(trimmed.to_string())),
    };

    match usize::try_from(index) {
        Ok(i) if i < count => Ok(i),
        _ => Err(SelectionError::OutOfRange { index, count }),
    }
}

/// An optional sign followed by ASCII digits only.
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Lists `regions` on `output` and reads the index of the one to reset from `input`.
pub fn prompt_region<R: BufRead, W: Write>(
    regions: &[Region],
    mut input: R,
    mut output: W,
) -> Result<usize, SelectionError> {
    writeln!(output, "{}", *messages::REGION_PROMPT)?;
    writeln!(output)?;
    for (i, region) in regions.iter().enumerate() {
        writeln!(output, "  {i}\t{}", region.name)?;
    }
    writeln!(output)?;
    write!(output, "Reset region #")?;
    output.flush()?;

    let mut buffer = String::new();
    input.read_line(&mut buffer)?;
    debug!("you entered: {}", buffer.trim_end());

    parse_selection(&buffer, regions.len())
}
