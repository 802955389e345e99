//! Default path helpers and symlink checks.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

/// Config file location: `$FSUTILS_CONFIG` if set, else the OS config dir.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(p));
    }
    if let Some(base) = config_dir() {
        return Some(base.join("fsutils").join("config.xml"));
    }
    dirs::home_dir().map(|h| h.join(".config").join("fsutils").join("config.xml"))
}

/// OS-appropriate log file location (data dir).
pub fn default_log_path() -> Option<PathBuf> {
    if let Some(base) = data_dir() {
        return Some(base.join("fsutils").join("fsutils.log"));
    }
    dirs::home_dir().map(|h| h.join(".local").join("share").join("fsutils").join("fsutils.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() && fs::symlink_metadata(anc)?.file_type().is_symlink() {
            return Ok(true);
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn env_override_wins() {
        let td = tempdir().unwrap();
        let cfg = td.path().join("custom.xml");
        unsafe {
            env::set_var(CONFIG_ENV, &cfg);
        }
        assert_eq!(default_config_path(), Some(cfg));
        unsafe {
            env::remove_var(CONFIG_ENV);
        }
        let p = default_config_path();
        if let Some(p) = p {
            assert!(p.ends_with("fsutils/config.xml"));
        }
    }

    #[test]
    fn log_path_is_named_after_crate() {
        if let Some(p) = default_log_path() {
            assert_eq!(p.file_name().unwrap(), "fsutils.log");
        }
    }

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_ancestor() {
        let td = tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir_all(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("x.log")).unwrap());
        assert!(!path_has_symlink_ancestor(&real.join("x.log")).unwrap());
    }
}
