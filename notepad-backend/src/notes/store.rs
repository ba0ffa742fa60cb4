//! NoteStore — filesystem-backed note storage
//!
//! One file per note under a canonical storage root. Writes and deletes for a
//! given name run under an exclusive per-name lock so a concurrent delete and
//! write can never interleave. Reads take no lock.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{file_ops, path, NoteError, NoteName};

/// Largest accepted note body (100 KiB)
pub const MAX_NOTE_BYTES: usize = 100 * 1024;

/// What a save did to the stored note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content was written, creating or replacing the file
    Written,
    /// Empty content removed an existing file
    Deleted,
    /// Empty content for a note that did not exist
    Unchanged,
}

/// Flat-directory note store
pub struct NoteStore {
    root: PathBuf,
    /// Per-name write locks. Entries live only while a writer holds them.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl NoteStore {
    /// Open (creating if needed) the storage root and canonicalize it
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, NoteError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;

        if !root.is_dir() {
            return Err(NoteError::Storage(std::io::Error::other(format!(
                "storage root is not a directory: {}",
                root.display()
            ))));
        }

        log::info!("[NOTES] Storage root: {}", root.display());

        Ok(Self {
            root,
            locks: DashMap::new(),
        })
    }

    /// Canonical storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path backing `name`
    pub fn path_for(&self, name: &NoteName) -> Result<PathBuf, NoteError> {
        path::resolve(&self.root, name.as_str())
    }

    pub fn exists(&self, name: &NoteName) -> Result<bool, NoteError> {
        Ok(file_ops::is_note_file(&self.path_for(name)?))
    }

    /// Read a note's bytes; `None` when the note does not exist
    pub fn read(&self, name: &NoteName) -> Result<Option<Vec<u8>>, NoteError> {
        let path = self.path_for(name)?;
        if !file_ops::is_note_file(&path) {
            return Ok(None);
        }
        file_ops::read_note(&path).map_err(|e| {
            log::error!("[NOTES] Failed to read note {}: {}", name, e);
            NoteError::Storage(e)
        })
    }

    /// Read a note's bytes, treating absence as `NotFound`
    pub fn read_existing(&self, name: &NoteName) -> Result<Vec<u8>, NoteError> {
        self.read(name)?.ok_or(NoteError::NotFound)
    }

    /// Store `content` under `name`.
    ///
    /// Oversized content is rejected before anything touches the disk.
    /// Non-empty content overwrites; empty content deletes the note.
    pub fn save(&self, name: &NoteName, content: &[u8]) -> Result<SaveOutcome, NoteError> {
        if content.len() > MAX_NOTE_BYTES {
            return Err(NoteError::ContentTooLarge {
                size: content.len(),
                limit: MAX_NOTE_BYTES,
            });
        }

        let path = self.path_for(name)?;

        self.with_note_lock(name, || {
            if !content.is_empty() {
                file_ops::write_note(&path, content).map_err(|e| {
                    log::error!("[NOTES] Failed to save note to path {}: {}", path.display(), e);
                    NoteError::Storage(e)
                })?;
                return Ok(SaveOutcome::Written);
            }

            if !file_ops::is_note_file(&path) {
                return Ok(SaveOutcome::Unchanged);
            }

            match file_ops::delete_note(&path) {
                Ok(true) => Ok(SaveOutcome::Deleted),
                Ok(false) => Ok(SaveOutcome::Unchanged),
                Err(e) => {
                    log::error!("[NOTES] Failed to delete the note at path {}: {}", path.display(), e);
                    Err(NoteError::Storage(e))
                }
            }
        })
    }

    /// Run `f` while holding the exclusive lock for `name`.
    ///
    /// The guard is dropped on every exit path, including unwinding.
    fn with_note_lock<T>(&self, name: &NoteName, f: impl FnOnce() -> T) -> T {
        let lock = self
            .locks
            .entry(name.as_str().to_string())
            .or_default()
            .value()
            .clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        drop(lock);
        self.locks
            .remove_if(name.as_str(), |_, l| Arc::strong_count(l) == 1);

        result
    }

    /// Number of names with a live lock entry
    #[cfg(test)]
    fn live_locks(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::tempdir;

    fn name(s: &str) -> NoteName {
        NoteName::parse(s).unwrap()
    }

    #[test]
    fn test_open_creates_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("notes");

        let store = NoteStore::open(&root).expect("Failed to open store");
        assert!(root.is_dir());
        assert_eq!(store.root(), root.canonicalize().unwrap());
    }

    #[test]
    fn test_save_and_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(dir.path()).unwrap();
        let abc = name("abc");

        let content = "line one\nline two\t\u{1F600}\r\n".as_bytes();
        assert_eq!(store.save(&abc, content).unwrap(), SaveOutcome::Written);
        assert_eq!(store.read(&abc).unwrap().as_deref(), Some(content));
        assert_eq!(fs::read(dir.path().join("abc")).unwrap(), content);
    }

    #[test]
    fn test_save_at_limit_is_accepted() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(dir.path()).unwrap();
        let big = name("big");

        let content = vec![b'x'; MAX_NOTE_BYTES];
        store.save(&big, &content).unwrap();
        assert_eq!(store.read_existing(&big).unwrap().len(), MAX_NOTE_BYTES);
    }

    #[test]
    fn test_oversized_save_touches_nothing() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(dir.path()).unwrap();
        let abc = name("abc");

        let too_big = vec![b'x'; MAX_NOTE_BYTES + 1];
        let err = store.save(&abc, &too_big).unwrap_err();
        assert!(matches!(err, NoteError::ContentTooLarge { size, .. } if size == MAX_NOTE_BYTES + 1));
        assert!(!store.exists(&abc).unwrap());

        store.save(&abc, b"keep me").unwrap();
        assert!(store.save(&abc, &too_big).is_err());
        assert_eq!(store.read_existing(&abc).unwrap(), b"keep me");
    }

    #[test]
    fn test_empty_save_deletes() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(dir.path()).unwrap();
        let abc = name("abc");

        store.save(&abc, b"world").unwrap();
        assert_eq!(store.save(&abc, b"").unwrap(), SaveOutcome::Deleted);
        assert!(!dir.path().join("abc").exists());
        assert!(matches!(store.read_existing(&abc), Err(NoteError::NotFound)));

        // deleting again is fine
        assert_eq!(store.save(&abc, b"").unwrap(), SaveOutcome::Unchanged);
    }

    #[test]
    fn test_write_failure_surfaces_storage_error() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(dir.path()).unwrap();
        let abc = name("abc");
        fs::create_dir(dir.path().join("abc")).unwrap();

        assert!(matches!(store.save(&abc, b"content"), Err(NoteError::Storage(_))));
        assert!(dir.path().join("abc").is_dir());
        assert_eq!(store.live_locks(), 0);
    }

    #[test]
    fn test_repeated_save_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(dir.path()).unwrap();
        let abc = name("abc");

        store.save(&abc, b"same").unwrap();
        let once = fs::read(dir.path().join("abc")).unwrap();
        store.save(&abc, b"same").unwrap();
        let twice = fs::read(dir.path().join("abc")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_concurrent_writers_do_not_interleave() {
        let dir = tempdir().unwrap();
        let store = Arc::new(NoteStore::open(dir.path()).unwrap());
        let a = vec![b'A'; MAX_NOTE_BYTES];
        let b = vec![b'B'; MAX_NOTE_BYTES / 2];

        for _ in 0..20 {
            let handles: Vec<_> = [a.clone(), b.clone()]
                .into_iter()
                .map(|content| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || store.save(&name("race"), &content).unwrap())
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }

            let stored = store.read_existing(&name("race")).unwrap();
            assert!(stored == a || stored == b, "interleaved write of {} bytes", stored.len());
        }

        assert_eq!(store.live_locks(), 0);
    }

    #[test]
    fn test_concurrent_write_and_delete() {
        let dir = tempdir().unwrap();
        let store = Arc::new(NoteStore::open(dir.path()).unwrap());

        for _ in 0..20 {
            let writer = {
                let store = Arc::clone(&store);
                thread::spawn(move || store.save(&name("flip"), b"content").unwrap())
            };
            let deleter = {
                let store = Arc::clone(&store);
                thread::spawn(move || store.save(&name("flip"), b"").unwrap())
            };
            writer.join().unwrap();
            deleter.join().unwrap();

            if let Some(bytes) = store.read(&name("flip")).unwrap() {
                assert_eq!(bytes, b"content");
            }
        }
    }

    #[test]
    fn test_lock_released_after_panic() {
        let dir = tempdir().unwrap();
        let store = Arc::new(NoteStore::open(dir.path()).unwrap());

        let panicking = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.with_note_lock::<()>(&name("abc"), || panic!("boom")))
        };
        assert!(panicking.join().is_err());

        // a later writer must still get the lock
        store.save(&name("abc"), b"after").unwrap();
        assert_eq!(store.read_existing(&name("abc")).unwrap(), b"after");
    }
}
