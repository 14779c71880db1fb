//! Bot source loading.
//!
//! A bots directory holds one file per bot. The bot is named after its file
//! with any `.txt` extension removed. Files are returned sorted by name so a
//! seeded match is reproducible regardless of directory order.
//!
//! ```text
//! bots/
//!   Rabbit.txt
//!   Wall.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use codebots_runtime::BotSource;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a bots directory.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The path doesn't exist or isn't a directory.
    #[error("'{}' is not a valid directory", .0.display())]
    InvalidDir(PathBuf),

    /// Failed to list the directory or read a file.
    #[error("error reading {}: {error}", .path.display())]
    ReadError {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying I/O error.
        error: std::io::Error,
    },

    /// The directory contains no bot files.
    #[error("no bot sources found in '{}'", .0.display())]
    Empty(PathBuf),
}

/// Bot name for a file path
pub fn bot_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.strip_suffix(".txt").unwrap_or(file_name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Read every regular file in `dir` as a bot source.
pub fn load_sources(dir: &Path) -> Result<Vec<BotSource>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::InvalidDir(dir.to_path_buf()));
    }

    let read_error = |path: &Path, error| SourceError::ReadError {
        path: path.to_path_buf(),
        error,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| read_error(dir, e))? {
        let path = entry.map_err(|e| read_error(dir, e))?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(name) = bot_name(&path) else {
            continue;
        };
        let source = fs::read_to_string(&path).map_err(|e| read_error(&path, e))?;
        debug!(bot = %name, path = %path.display(), "loaded bot source");
        sources.push(BotSource { name, source });
    }

    if sources.is_empty() {
        return Err(SourceError::Empty(dir.to_path_buf()));
    }
    Ok(sources)
}
