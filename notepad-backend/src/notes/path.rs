//! Map note names to files under the storage root

use std::path::{Path, PathBuf};

use super::name::sanitize;
use super::NoteError;

/// Resolve `name` to a file that is a direct child of `storage_root`.
///
/// `storage_root` must already be canonical (see `NoteStore::open`). The name
/// is reduced to its final segment first; anything that still lands outside
/// the root, or on the root itself, is a `PathEscape`.
pub fn resolve(storage_root: &Path, name: &str) -> Result<PathBuf, NoteError> {
    let file_name = sanitize(name);
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(NoteError::PathEscape);
    }

    let path = storage_root.join(file_name);

    if !path.starts_with(storage_root) || path.parent() != Some(storage_root) {
        log::warn!("[NOTES] Rejected path outside storage root: {:?}", path);
        return Err(NoteError::PathEscape);
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_stays_in_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();

        for name in ["abc", "a-b_c", "../abc", "/tmp/abc", "x/y/abc"] {
            let path = resolve(&root, name).unwrap();
            assert_eq!(path.parent(), Some(root.as_path()), "name {name:?}");
        }
        assert_eq!(resolve(&root, "../../abc").unwrap(), root.join("abc"));
    }

    #[test]
    fn test_resolve_rejects_degenerate_names() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();

        for name in ["", ".", "..", "/", "abc/.."] {
            assert!(
                matches!(resolve(&root, name), Err(NoteError::PathEscape)),
                "name {name:?}"
            );
        }
    }
}
