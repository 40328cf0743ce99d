//! The JSON configuration document: where the save lives, where to log and which regions
//! can be reset.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::consts;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Could not read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Improperly formatted configuration {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Directory holding the map files of the save.
    pub path: PathBuf,
    #[serde(default)]
    pub logs: LogSettings,
    pub regions: Vec<Region>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    #[serde(default)]
    pub save: bool,
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
    /// `strftime` pattern for the time prefix of each line.
    #[serde(default)]
    pub time_format: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            save: false,
            path: default_log_path(),
            time_format: None,
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from(consts::file_paths::ACTION_LOG)
}

/// A named rectangle of the world. `start` is the top-left corner, `stop` the bottom-right one.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub start: Corner,
    pub stop: Corner,
}

/// One corner of a region, given in the document as `[X, Y, ChunkX, ChunkY]`.
///
/// `x` and `y` are absolute tile coordinates, `chunk_x` and `chunk_y` are chunk (cell)
/// coordinates.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(from = "[i64; 4]")]
pub struct Corner {
    pub x: i64,
    pub y: i64,
    pub chunk_x: i64,
    pub chunk_y: i64,
}

impl From<[i64; 4]> for Corner {
    fn from([x, y, chunk_x, chunk_y]: [i64; 4]) -> Self {
        Self {
            x,
            y,
            chunk_x,
            chunk_y,
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {}  Chunk ({} x {})",
            self.x, self.y, self.chunk_x, self.chunk_y
        )
    }
}

impl Region {
    /// Whether `start` lies past `stop` on any axis. Such a region matches nothing.
    pub fn is_inverted(&self) -> bool {
        self.start.x > self.stop.x
            || self.start.y > self.stop.y
            || self.start.chunk_x > self.stop.chunk_x
            || self.start.chunk_y > self.stop.chunk_y
    }
}

impl Config {
    /// Loads the configuration document at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&content).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Loaded {} region(s) from {}",
            config.regions.len(),
            path.display()
        );
        config.warn_inverted_regions();

        Ok(config)
    }

    /// Parses a configuration document. A leading byte order mark is tolerated.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content.trim_start_matches('\u{feff}'))
    }

    fn warn_inverted_regions(&self) {
        for region in self.regions.iter().filter(|r| r.is_inverted()) {
            warn!(
                "Region '{}' starts past where it stops, it will not match any file",
                region.name
            );
        }
    }
}
