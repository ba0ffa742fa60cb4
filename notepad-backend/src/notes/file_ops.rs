//! File operations for notes system
//!
//! Handles reading, writing and removing note files. Missing files are not
//! errors: an absent note reads as `None` and deleting it is a no-op.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write a note file, truncating any previous content
pub fn write_note(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.flush()?;
    Ok(())
}

/// Read a note file, returning None if not found
pub fn read_note(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Remove a note file. Returns whether a file was actually removed.
pub fn delete_note(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Whether a regular note file exists at `path`
pub fn is_note_file(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_note() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc");

        write_note(&path, b"first version, longer").unwrap();
        write_note(&path, b"second").unwrap();
        assert_eq!(read_note(&path).unwrap().as_deref(), Some(&b"second"[..]));
        assert!(is_note_file(&path));
    }

    #[test]
    fn test_read_note_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent");
        assert!(read_note(&path).unwrap().is_none());
        assert!(!is_note_file(&path));
    }

    #[test]
    fn test_delete_note() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc");
        fs::write(&path, "content").unwrap();

        assert!(delete_note(&path).unwrap());
        assert!(!path.exists());
        assert!(!delete_note(&path).unwrap());
    }

    #[test]
    fn test_directory_is_not_a_note() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        assert!(!is_note_file(&dir.path().join("sub")));
    }
}
