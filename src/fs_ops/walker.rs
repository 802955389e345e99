//! Bounded directory-size walker.
//!
//! Sums the sizes of every non-directory entry at or below a root directory,
//! optionally limited to `max_depth` levels (root = 1, 0 = unlimited).
//!
//! The walk never recurses on the call stack: pending directories live in an
//! explicit worklist. Each worklist node owns its path and an allocator lease, so
//! dropping the worklist releases everything still pending. That is the single
//! cleanup path for every failure.
//!
//! Failures (allocation, open, path build) are not fatal: the walk stops, emits one
//! diagnostic, and returns what it had accumulated. [`walk_directory_size`] also
//! reports whether the walk completed and why it stopped.
//!
//! Ordering: by default the worklist is a stack (LIFO), so the most recently
//! discovered directory is scanned next. [`TraversalOrder::Fifo`] gives a true
//! breadth-first walk. Totals do not depend on the order.

use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::mem;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, error, trace, warn};

use super::classify::{get_file_size, is_directory};
use super::path::{duplicate_path_in, join_path_in, OwnedPath};
use crate::alloc::{Allocator, Lease};
use crate::errors::FsUtilError;

/// Order in which pending directories are taken from the worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Newest discovery first.
    #[default]
    Lifo,
    /// Oldest discovery first (breadth-first).
    Fifo,
}

impl TraversalOrder {
    /// Case-insensitive parse of common names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lifo" | "stack" | "depth" => Some(TraversalOrder::Lifo),
            "fifo" | "queue" | "breadth" => Some(TraversalOrder::Fifo),
            _ => None,
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalOrder::Lifo => "lifo",
            TraversalOrder::Fifo => "fifo",
        })
    }
}

impl FromStr for TraversalOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid traversal order: '{s}'"))
    }
}

/// Outcome of a walk.
#[derive(Debug, Default)]
pub struct SizeReport {
    /// Sum in bytes of every regular file counted.
    pub total: u64,
    /// Non-directory entries that were sized (special files contribute 0).
    pub files: u64,
    /// Directories fully scanned.
    pub directories: u64,
    /// False when the walk was truncated by an error.
    pub completed: bool,
    /// Why the walk stopped early, if it did.
    pub error: Option<FsUtilError>,
}

/// One directory waiting to be scanned.
struct WorklistNode<'a, A: Allocator + ?Sized> {
    path: OwnedPath<'a, A>,
    depth: u32,
    _node: Lease<'a, A>,
}

fn node_size<A: Allocator + ?Sized>() -> usize {
    mem::size_of::<WorklistNode<'_, A>>()
}

struct Worklist<'a, A: Allocator + ?Sized> {
    nodes: VecDeque<WorklistNode<'a, A>>,
    order: TraversalOrder,
}

impl<'a, A: Allocator + ?Sized> Worklist<'a, A> {
    fn new(order: TraversalOrder) -> Self {
        Self {
            nodes: VecDeque::new(),
            order,
        }
    }

    fn push(&mut self, node: WorklistNode<'a, A>) -> Result<(), FsUtilError> {
        debug_assert!(node.depth >= 1);
        if self.nodes.try_reserve(1).is_err() {
            return Err(FsUtilError::AllocationFailure(node.path.to_path_buf()));
        }
        self.nodes.push_back(node);
        Ok(())
    }

    fn next(&mut self) -> Option<WorklistNode<'a, A>> {
        match self.order {
            TraversalOrder::Lifo => self.nodes.pop_back(),
            TraversalOrder::Fifo => self.nodes.pop_front(),
        }
    }

    /// Drop every pending node; returns how many were released.
    fn release_all(&mut self) -> usize {
        let n = self.nodes.len();
        self.nodes.clear();
        n
    }
}

/// Size of the regular files directly inside `path`; subdirectories are not entered.
///
/// Returns 0 (with a diagnostic) when `path` is not a directory.
pub fn calculate_directory_size<A: Allocator + ?Sized>(path: impl AsRef<Path>, alloc: &A) -> u64 {
    calculate_directory_size_with_recursion(path, 1, alloc)
}

/// Size of everything under `path` down to `max_depth` levels (root = 1, 0 = unlimited).
///
/// Returns the partial total if the walk is truncated by an error.
pub fn calculate_directory_size_with_recursion<A: Allocator + ?Sized>(
    path: impl AsRef<Path>,
    max_depth: u32,
    alloc: &A,
) -> u64 {
    walk_directory_size(path, max_depth, TraversalOrder::default(), alloc).total
}

/// Walk `root` and report the total plus whether the walk completed.
pub fn walk_directory_size<A: Allocator + ?Sized>(
    root: impl AsRef<Path>,
    max_depth: u32,
    order: TraversalOrder,
    alloc: &A,
) -> SizeReport {
    let root = root.as_ref();
    let mut report = SizeReport::default();

    if !is_directory(root) {
        warn!(path = %root.display(), "Path is not a directory");
        report.error = Some(FsUtilError::NotADirectory(root.to_path_buf()));
        return report;
    }

    let mut worklist = Worklist::new(order);

    let node = match Lease::acquire(alloc, node_size::<A>()) {
        Ok(l) => l,
        Err(_) => return truncate(report, FsUtilError::AllocationFailure(root.to_path_buf()), 0),
    };
    let Some(path) = duplicate_path_in(root, alloc) else {
        return truncate(report, FsUtilError::AllocationFailure(root.to_path_buf()), 0);
    };
    if let Err(e) = worklist.push(WorklistNode {
        path,
        depth: 1,
        _node: node,
    }) {
        return truncate(report, e, 0);
    }

    while let Some(dir) = worklist.next() {
        if let Err(e) = scan_directory(&dir, max_depth, alloc, &mut worklist, &mut report) {
            drop(dir);
            let pending = worklist.release_all();
            return truncate(report, e, pending);
        }
        report.directories += 1;
        trace!(path = %dir.path.display(), depth = dir.depth, "Scanned directory");
    }

    report.completed = true;
    debug!(
        path = %root.display(),
        max_depth,
        %order,
        total = report.total,
        files = report.files,
        directories = report.directories,
        "Computed directory size"
    );
    report
}

/// List one directory: push subdirectories within the depth bound, size everything else.
fn scan_directory<'a, A: Allocator + ?Sized>(
    dir: &WorklistNode<'a, A>,
    max_depth: u32,
    alloc: &'a A,
    worklist: &mut Worklist<'a, A>,
    report: &mut SizeReport,
) -> Result<(), FsUtilError> {
    let open_failure = |source: std::io::Error| FsUtilError::OpenFailure {
        path: dir.path.to_path_buf(),
        source,
    };
    let entries = fs::read_dir(dir.path.as_path()).map_err(open_failure)?;

    for entry in entries {
        let name = entry.map_err(open_failure)?.file_name();
        if name == "." || name == ".." {
            continue;
        }

        let Some(entry_path) = join_path_in(dir.path.as_path(), &name, alloc) else {
            return Err(FsUtilError::PathBuildFailure {
                parent: dir.path.to_path_buf(),
                name: name.to_string_lossy().into_owned(),
            });
        };

        if is_directory(&entry_path) {
            let depth = dir.depth + 1;
            if max_depth != 0 && depth > max_depth {
                trace!(path = %entry_path.display(), depth, max_depth, "Skipping directory beyond depth limit");
                continue;
            }
            let node = Lease::acquire(alloc, node_size::<A>())
                .map_err(|_| FsUtilError::AllocationFailure(entry_path.to_path_buf()))?;
            worklist.push(WorklistNode {
                path: entry_path,
                depth,
                _node: node,
            })?;
        } else {
            report.total = report.total.saturating_add(get_file_size(&entry_path));
            report.files += 1;
        }
    }
    Ok(())
}

fn truncate(mut report: SizeReport, err: FsUtilError, pending: usize) -> SizeReport {
    error!(
        code = err.code(),
        kind = err.kind(),
        pending,
        partial_total = report.total,
        "{err}"
    );
    report.completed = false;
    report.error = Some(err);
    report
}
