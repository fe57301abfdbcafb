//! Output file creation
//!
//! Files are written to a temporary file next to the destination and only
//! moved into place once fully written. An existing destination is never
//! replaced: the first writer wins.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, Result};

/// What happened to a requested output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The destination was already present and was left untouched
    AlreadyExists,
}

/// Create `path` with the bytes produced by `write`, unless it already exists.
///
/// Parent directories are created as needed. If `write` fails, or the
/// destination appears while writing, nothing is left at `path`.
pub fn write_new_file<F>(path: &Path, write: F) -> Result<WriteOutcome>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    if path.exists() {
        return Ok(WriteOutcome::AlreadyExists);
    }

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;

    let temp = NamedTempFile::new_in(dir).map_err(|e| ExportError::io(dir, e))?;
    let mut writer = BufWriter::new(temp);
    write(&mut writer).map_err(|e| ExportError::io(path, e))?;
    writer.flush().map_err(|e| ExportError::io(path, e))?;
    let temp = writer
        .into_inner()
        .map_err(|e| ExportError::io(path, e.into_error()))?;

    match temp.persist_noclobber(path) {
        Ok(_) => Ok(WriteOutcome::Written),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            Ok(WriteOutcome::AlreadyExists)
        }
        Err(e) => Err(ExportError::io(path, e.error)),
    }
}
