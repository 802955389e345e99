//! Single-call path classification.
//! Every check is one `stat` (symlinks followed); any error is reported as `false`/0.

use std::fs;
use std::path::Path;
use tracing::warn;

use crate::platform::{mode_is_readable, mode_is_writable};

/// Path exists (following symlinks).
pub fn exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref()).is_ok()
}

/// Path exists and is a directory.
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref()).map(|m| m.is_dir()).unwrap_or(false)
}

/// Path exists and is a regular file.
pub fn is_file(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref()).map(|m| m.is_file()).unwrap_or(false)
}

/// Owner-readable according to the mode bits (not an access(2) probe).
pub fn is_readable(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref())
        .map(|m| mode_is_readable(&m))
        .unwrap_or(false)
}

/// Owner-writable according to the mode bits.
pub fn is_writable(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref())
        .map(|m| mode_is_writable(&m))
        .unwrap_or(false)
}

pub fn is_readable_and_writable(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref())
        .map(|m| mode_is_readable(&m) && mode_is_writable(&m))
        .unwrap_or(false)
}

/// Byte length of a regular file; 0 (with a diagnostic) for anything else.
pub fn get_file_size(path: impl AsRef<Path>) -> u64 {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => {
            warn!(path = %path.display(), "Path is not a file");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn classifies_file_dir_and_missing() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let f = tmp.child("a.txt");
        f.write_str("hello").unwrap();
        let d = tmp.child("sub");
        d.create_dir_all().unwrap();
        let missing = tmp.child("nope");

        assert!(exists(f.path()) && exists(d.path()));
        assert!(!exists(missing.path()));

        assert!(is_file(f.path()));
        assert!(!is_directory(f.path()));
        assert!(is_directory(d.path()));
        assert!(!is_file(d.path()));
        assert!(!is_file(missing.path()));
        assert!(!is_directory(missing.path()));
    }

    #[test]
    fn file_size_only_for_regular_files() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let f = tmp.child("data.bin");
        f.write_binary(&[0u8; 42]).unwrap();
        assert_eq!(get_file_size(f.path()), 42);
        assert_eq!(get_file_size(tmp.path()), 0);
        assert_eq!(get_file_size(tmp.child("missing").path()), 0);
    }

    #[test]
    fn permission_checks_on_fresh_file() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let f = tmp.child("rw.txt");
        f.touch().unwrap();
        assert!(is_readable(f.path()));
        assert!(is_writable(f.path()));
        assert!(is_readable_and_writable(f.path()));
        assert!(!is_readable(tmp.child("missing").path()));
        assert!(!is_readable_and_writable(tmp.child("missing").path()));
    }

    #[cfg(unix)]
    #[test]
    fn read_only_file_is_not_writable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = assert_fs::TempDir::new().unwrap();
        let f = tmp.child("ro.txt");
        f.touch().unwrap();
        fs::set_permissions(f.path(), fs::Permissions::from_mode(0o444)).unwrap();
        assert!(is_readable(f.path()));
        assert!(!is_writable(f.path()));
        assert!(!is_readable_and_writable(f.path()));
    }
}
