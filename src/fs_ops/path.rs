//! Path building helpers: joining, native separators, `~` expansion, cwd.
//!
//! `join_path` is plain concatenation with the platform delimiter; it does not
//! normalise `..`, collapse doubled separators or treat an absolute right-hand side
//! specially (unlike `Path::join`). The `*_in` variants charge the resulting string
//! to an [`Allocator`] and hand back an [`OwnedPath`] that releases it on drop.

use std::ffi::{OsStr, OsString};
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::alloc::{Allocator, Lease};
use crate::platform::PATH_DELIMITER;

/// A path whose storage is accounted against an allocator.
pub struct OwnedPath<'a, A: Allocator + ?Sized> {
    path: PathBuf,
    _lease: Lease<'a, A>,
}

impl<A: Allocator + ?Sized> OwnedPath<'_, A> {
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl<A: Allocator + ?Sized> std::fmt::Debug for OwnedPath<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OwnedPath").field(&self.path).finish()
    }
}

impl<A: Allocator + ?Sized> Deref for OwnedPath<'_, A> {
    type Target = Path;
    fn deref(&self) -> &Path {
        &self.path
    }
}

impl<A: Allocator + ?Sized> AsRef<Path> for OwnedPath<'_, A> {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// `left` + delimiter + `right`.
pub fn join_path(left: impl AsRef<OsStr>, right: impl AsRef<OsStr>) -> PathBuf {
    let (left, right) = (left.as_ref(), right.as_ref());
    let mut s = OsString::with_capacity(left.len() + 1 + right.len());
    s.push(left);
    s.push(PATH_DELIMITER.encode_utf8(&mut [0u8; 4]));
    s.push(right);
    PathBuf::from(s)
}

/// Allocator-backed `join_path`. `None` when the allocator refuses.
pub fn join_path_in<'a, A: Allocator + ?Sized>(
    left: impl AsRef<OsStr>,
    right: impl AsRef<OsStr>,
    alloc: &'a A,
) -> Option<OwnedPath<'a, A>> {
    let path = join_path(left, right);
    lease_for(path, alloc)
}

/// Allocator-backed copy of `path`. `None` when the allocator refuses.
pub fn duplicate_path_in<'a, A: Allocator + ?Sized>(
    path: impl AsRef<Path>,
    alloc: &'a A,
) -> Option<OwnedPath<'a, A>> {
    lease_for(path.as_ref().to_path_buf(), alloc)
}

fn lease_for<A: Allocator + ?Sized>(path: PathBuf, alloc: &A) -> Option<OwnedPath<'_, A>> {
    // +1 for the terminator a C-style string would carry.
    let size = path.as_os_str().len() + 1;
    match Lease::acquire(alloc, size) {
        Ok(lease) => Some(OwnedPath {
            path,
            _lease: lease,
        }),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Path string allocation refused");
            None
        }
    }
}

/// Replace every `/` with the platform delimiter.
pub fn to_native_path(path: &str) -> String {
    if PATH_DELIMITER == '/' {
        return path.to_owned();
    }
    path.replace('/', PATH_DELIMITER.encode_utf8(&mut [0u8; 4]))
}

/// Expand a leading `~` to the user's home directory.
///
/// Only the first character is replaced, so `~/docs` becomes `<home>/docs`.
/// Paths without a leading `~` are returned unchanged. `None` if the home
/// directory cannot be determined.
pub fn expand_user(path: &str) -> Option<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Some(PathBuf::from(path));
    };
    let home = dirs::home_dir()?;
    let mut s = home.into_os_string();
    s.push(rest);
    Some(PathBuf::from(s))
}

/// Current working directory.
pub fn get_cwd() -> io::Result<PathBuf> {
    std::env::current_dir()
}
