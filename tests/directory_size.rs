//! End-to-end behaviour of the bounded directory-size walker.

use assert_fs::prelude::*;
use fsutils::{
    calculate_directory_size, calculate_directory_size_with_recursion, walk_directory_size,
    AllocError, Allocator, CountingAllocator, FsUtilError, SystemAllocator, TraversalOrder,
};
use std::cell::Cell;
use std::path::PathBuf;
use walkdir::WalkDir;

/// root/a.txt (100), root/b/c.txt (50), root/b/d/e.txt (25)
fn scenario() -> assert_fs::TempDir {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("a.txt").write_binary(&[b'a'; 100]).unwrap();
    tmp.child("b/c.txt").write_binary(&[b'c'; 50]).unwrap();
    tmp.child("b/d/e.txt").write_binary(&[b'e'; 25]).unwrap();
    tmp
}

#[test]
fn scenario_unbounded_and_bounded() {
    let tmp = scenario();
    let alloc = SystemAllocator;
    assert_eq!(calculate_directory_size_with_recursion(tmp.path(), 0, &alloc), 175);
    assert_eq!(calculate_directory_size_with_recursion(tmp.path(), 2, &alloc), 150);
    assert_eq!(calculate_directory_size_with_recursion(tmp.path(), 1, &alloc), 100);
}

#[test]
fn convenience_size_stays_in_root() {
    let tmp = scenario();
    assert_eq!(calculate_directory_size(tmp.path(), &SystemAllocator), 100);

    let r = walk_directory_size(tmp.path(), 1, TraversalOrder::Lifo, &SystemAllocator);
    assert_eq!(r.files, 1);
    assert_eq!(r.directories, 1);
}

#[test]
fn flat_directory_sums_files() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let sizes = [0usize, 1, 17, 4096, 9000];
    for (i, s) in sizes.iter().enumerate() {
        tmp.child(format!("f{i}.bin")).write_binary(&vec![0u8; *s]).unwrap();
    }
    let expected: u64 = sizes.iter().map(|s| *s as u64).sum();
    assert_eq!(calculate_directory_size(tmp.path(), &SystemAllocator), expected);
}

#[test]
fn depth_limit_is_exact() {
    // One 10-byte file at each level 1..=6.
    let tmp = assert_fs::TempDir::new().unwrap();
    let mut rel = String::new();
    for level in 1..=6 {
        tmp.child(format!("{rel}f{level}.txt")).write_binary(&[0u8; 10]).unwrap();
        rel.push_str(&format!("l{level}/"));
    }
    for k in 1..=6u32 {
        let total = calculate_directory_size_with_recursion(tmp.path(), k, &SystemAllocator);
        assert_eq!(total, 10 * k as u64, "max_depth {k}");
    }
    assert_eq!(calculate_directory_size_with_recursion(tmp.path(), 7, &SystemAllocator), 60);
    assert_eq!(calculate_directory_size_with_recursion(tmp.path(), 0, &SystemAllocator), 60);
    assert_eq!(calculate_directory_size(tmp.path(), &SystemAllocator), 10);
}

#[test]
fn matches_independent_walk() {
    let tmp = assert_fs::TempDir::new().unwrap();
    for d in 0..4 {
        for f in 0..5 {
            let len = (d * 31 + f * 7) % 50 + 1;
            tmp.child(format!("d{d}/sub{f}/file{f}.dat")).write_binary(&vec![1u8; len]).unwrap();
            tmp.child(format!("d{d}/top{f}.dat")).write_binary(&vec![2u8; len * 2]).unwrap();
        }
    }
    tmp.child("empty_dir").create_dir_all().unwrap();

    let expected: u64 = WalkDir::new(tmp.path())
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().unwrap().len())
        .sum();

    for order in [TraversalOrder::Lifo, TraversalOrder::Fifo] {
        let r = walk_directory_size(tmp.path(), 0, order, &SystemAllocator);
        assert!(r.completed);
        assert_eq!(r.total, expected, "order {order}");
    }
}

#[test]
fn repeated_calls_are_stable() {
    let tmp = scenario();
    let first = calculate_directory_size_with_recursion(tmp.path(), 0, &SystemAllocator);
    assert_eq!(first, 175);
    for _ in 0..5 {
        assert_eq!(calculate_directory_size_with_recursion(tmp.path(), 0, &SystemAllocator), first);
        assert_eq!(calculate_directory_size(tmp.path(), &SystemAllocator), 100);
    }
}

#[test]
fn empty_directory_and_file_root() {
    let tmp = assert_fs::TempDir::new().unwrap();
    assert_eq!(calculate_directory_size(tmp.path(), &SystemAllocator), 0);

    let f = tmp.child("plain.txt");
    f.write_str("not a dir").unwrap();
    let alloc = CountingAllocator::new();
    assert_eq!(calculate_directory_size(f.path(), &alloc), 0);
    assert_eq!(calculate_directory_size_with_recursion(f.path(), 3, &alloc), 0);
    assert_eq!(alloc.granted(), 0, "no worklist node for a non-directory root");
}

#[test]
fn injected_allocation_failures_never_leak() {
    let tmp = scenario();
    let full = CountingAllocator::new();
    assert_eq!(calculate_directory_size_with_recursion(tmp.path(), 0, &full), 175);
    let needed = full.granted();

    for limit in 0..needed {
        let alloc = CountingAllocator::failing_after(limit);
        let r = walk_directory_size(tmp.path(), 0, TraversalOrder::Lifo, &alloc);
        assert!(!r.completed);
        assert!(r.total < 175);
        assert_eq!(alloc.outstanding(), 0, "leaked leases at limit {limit}");
        assert_eq!(alloc.outstanding_bytes(), 0, "leaked bytes at limit {limit}");
    }
}

/// Counts like `CountingAllocator`, and removes `target` from disk on the
/// allocation that follows the one for `target`'s own path string. For a
/// directory entry that is the worklist node lease, so the directory is gone
/// by the time the walker opens it.
struct RemoveOnceQueued {
    inner: CountingAllocator,
    target: PathBuf,
    calls: Cell<usize>,
    armed: Cell<bool>,
    fired: Cell<bool>,
}

impl RemoveOnceQueued {
    fn new(target: PathBuf) -> Self {
        Self {
            inner: CountingAllocator::new(),
            target,
            calls: Cell::new(0),
            armed: Cell::new(false),
            fired: Cell::new(false),
        }
    }
}

impl Allocator for RemoveOnceQueued {
    fn allocate(&self, size: usize) -> Result<(), AllocError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if self.armed.replace(false) {
            std::fs::remove_dir_all(&self.target).unwrap();
            self.fired.set(true);
        }
        // The first two allocations belong to the root node and its path.
        if call > 2 && !self.fired.get() && size == self.target.as_os_str().len() + 1 {
            self.armed.set(true);
        }
        self.inner.allocate(size)
    }

    fn deallocate(&self, size: usize) {
        self.inner.deallocate(size)
    }
}

#[test]
fn vanished_subdirectory_returns_partial_total() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("a.txt").write_binary(&[0u8; 100]).unwrap();
    let gone = tmp.child("gone");

    for order in [TraversalOrder::Lifo, TraversalOrder::Fifo] {
        gone.child("inner.txt").write_binary(&[0u8; 50]).unwrap();
        let alloc = RemoveOnceQueued::new(gone.path().to_path_buf());
        let r = walk_directory_size(tmp.path(), 0, order, &alloc);

        assert!(alloc.fired.get(), "subdirectory was never queued");
        assert_eq!(r.total, 100);
        assert_eq!(r.files, 1);
        assert!(!r.completed);
        assert!(matches!(r.error, Some(FsUtilError::OpenFailure { ref path, .. }) if path == gone.path()));
        assert_eq!(alloc.inner.outstanding(), 0, "leaked leases with {order}");
        assert_eq!(alloc.inner.outstanding_bytes(), 0);
    }
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_returns_partial_total() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("a.txt").write_binary(&[0u8; 100]).unwrap();
    let locked = tmp.child("locked");
    locked.child("hidden.txt").write_binary(&[0u8; 50]).unwrap();
    fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list it anyway; nothing to check then.
    if fs::read_dir(locked.path()).is_ok() {
        fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let alloc = CountingAllocator::new();
    let r = walk_directory_size(tmp.path(), 0, TraversalOrder::Lifo, &alloc);
    fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(r.total, 100);
    assert!(!r.completed);
    assert!(matches!(r.error, Some(FsUtilError::OpenFailure { .. })));
    assert_eq!(alloc.outstanding(), 0);

    // Bounded to the root, the locked directory is never opened.
    fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o000)).unwrap();
    let r = walk_directory_size(tmp.path(), 1, TraversalOrder::Lifo, &alloc);
    fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o755)).unwrap();
    assert!(r.completed);
    assert_eq!(r.total, 100);
}

#[cfg(unix)]
#[test]
fn symlinked_directory_is_followed_and_dangling_link_counts_zero() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("real/x.bin").write_binary(&[0u8; 40]).unwrap();
    let outside = assert_fs::TempDir::new().unwrap();
    outside.child("y.bin").write_binary(&[0u8; 7]).unwrap();
    std::os::unix::fs::symlink(outside.path(), tmp.child("link").path()).unwrap();
    std::os::unix::fs::symlink(tmp.child("nowhere").path(), tmp.child("dangling").path()).unwrap();

    let r = walk_directory_size(tmp.path(), 0, TraversalOrder::Lifo, &SystemAllocator);
    assert!(r.completed);
    assert_eq!(r.total, 47);
}
