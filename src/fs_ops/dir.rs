//! Directory creation.

use std::io;
use std::path::Path;
use tracing::debug;

use super::classify::is_directory;
use crate::platform::create_dir_0775;

/// Create a single directory (mode 0775 on Unix).
///
/// - Empty paths are rejected.
/// - On Unix the path must be absolute.
/// - An already existing directory counts as success; an existing non-directory does not.
pub fn mkdir(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty path"));
    }
    #[cfg(unix)]
    {
        if !path.is_absolute() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path must be absolute: {}", path.display()),
            ));
        }
    }

    match create_dir_0775(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Created directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && is_directory(path) => Ok(()),
        Err(e) => Err(e),
    }
}
