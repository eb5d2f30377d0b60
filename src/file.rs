//! Buffered file I/O helpers. `-` is handled by the caller (`cli.rs`), which
//! substitutes standard input/output instead of calling into this module.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

/// Opens `path` for buffered reading.
pub fn open_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Creates (or truncates) `path` for buffered writing, creating parent
/// directories as needed.
pub fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }

    let file = OpenOptions::new().write(true).create(true).truncate(true).open(path).with_context(|| format!("failed to create file: {}", path.display()))?;

    Ok(BufWriter::new(file))
}
