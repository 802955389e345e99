//! Core library for `fsutils`.
//!
//! A small portability layer over the host filesystem:
//! - single-call checks (existence, type, permission bits, file size)
//! - path helpers (join, native separators, `~` expansion, cwd) and `mkdir`
//! - a bounded, non-recursive directory-size walker with pluggable allocation accounting
//!
//! The CLI, config loading and logging setup live alongside for the `fsutils` binary.

pub mod alloc;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;

pub use alloc::{AllocError, Allocator, CountingAllocator, Lease, SystemAllocator};
pub use config::{default_config_path, default_log_path, path_has_symlink_ancestor, Config, LogLevel};
pub use errors::FsUtilError;
pub use fs_ops::{
    calculate_directory_size, calculate_directory_size_with_recursion, duplicate_path_in, exists,
    expand_user, get_cwd, get_file_size, is_directory, is_file, is_readable,
    is_readable_and_writable, is_writable, join_path, join_path_in, mkdir, to_native_path,
    walk_directory_size, OwnedPath, SizeReport, TraversalOrder,
};
pub use platform::PATH_DELIMITER;
