//! Filesystem operations: classification, path helpers, mkdir, and the size walker.

mod classify;
mod dir;
mod path;
mod walker;

pub use classify::{
    exists, get_file_size, is_directory, is_file, is_readable, is_readable_and_writable,
    is_writable,
};
pub use dir::mkdir;
pub use path::{
    duplicate_path_in, expand_user, get_cwd, join_path, join_path_in, to_native_path, OwnedPath,
};
pub use walker::{
    calculate_directory_size, calculate_directory_size_with_recursion, walk_directory_size,
    SizeReport, TraversalOrder,
};
