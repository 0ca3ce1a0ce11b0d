//! Filesystem helpers for writing artifacts.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{DeckError, Result};

/// Creates `dir` (and its parents) when it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| DeckError::io(dir, err))
}

/// Replaces the file at `path` with `contents`.
///
/// The bytes are written to a temporary file in the same directory and then
/// renamed over the destination, so readers see either the previous file or
/// the complete new one.  Any existing file is overwritten.
pub fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    let contents = contents.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|err| DeckError::io(path, err))?;
    file.write_all(contents)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|err| DeckError::io(path, err))?;
    file.persist(path)
        .map_err(|err| DeckError::io(path, err.error))?;

    debug!("wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.html");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("deck.html");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(err.is_io());
        assert!(!path.exists());
    }
}
