//! Platform-specific helpers.
//! Hides the Unix/Windows differences in permission bits, directory creation and
//! secure file writes behind one API so the rest of the crate stays platform-agnostic.

mod temp;

#[cfg(unix)]
mod common_unix;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    create_dir_0775, mode_is_readable, mode_is_writable, open_log_file_secure_append,
    set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600,
};

#[cfg(not(unix))]
pub use windows::{
    create_dir_0775, mode_is_readable, mode_is_writable, open_log_file_secure_append,
    set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600,
};

/// Separator placed between path segments by `join_path`.
#[cfg(windows)]
pub const PATH_DELIMITER: char = '\\';
#[cfg(not(windows))]
pub const PATH_DELIMITER: char = '/';
