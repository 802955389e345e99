//! Pluggable allocation accounting for the directory walker.
//!
//! Every worklist node and every path string the walker builds is paired with a
//! [`Lease`] taken from an [`Allocator`]. The lease gives the bytes back when it is
//! dropped, so each reservation is released exactly once on every exit path.
//!
//! - [`SystemAllocator`] never refuses (the global allocator aborts on real OOM).
//! - [`CountingAllocator`] tracks outstanding bytes/leases and can be told to refuse
//!   after a number of successful requests, which is how exhaustion is simulated.

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Returned when an allocator refuses a request (resource exhaustion).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("allocator refused a request for {0} bytes")]
pub struct AllocError(pub usize);

/// Allocation capability handed to the walker.
pub trait Allocator {
    /// Reserve `size` bytes. An `Err` means exhaustion, never a crash.
    fn allocate(&self, size: usize) -> Result<(), AllocError>;

    /// Give back `size` bytes previously reserved with `allocate`.
    fn deallocate(&self, size: usize);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, size: usize) -> Result<(), AllocError> {
        (**self).allocate(size)
    }

    fn deallocate(&self, size: usize) {
        (**self).deallocate(size)
    }
}

/// Default allocator: accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    #[inline]
    fn allocate(&self, _size: usize) -> Result<(), AllocError> {
        Ok(())
    }

    #[inline]
    fn deallocate(&self, _size: usize) {}
}

/// Bookkeeping allocator used to verify that nothing leaks.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    outstanding_bytes: AtomicUsize,
    outstanding: AtomicUsize,
    granted: AtomicUsize,
    fail_after: Option<usize>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant the first `n` requests, refuse every request after that.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Bytes reserved and not yet given back.
    pub fn outstanding_bytes(&self) -> usize {
        self.outstanding_bytes.load(Ordering::SeqCst)
    }

    /// Number of live reservations.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Number of requests granted so far.
    pub fn granted(&self) -> usize {
        self.granted.load(Ordering::SeqCst)
    }
}

impl Allocator for CountingAllocator {
    fn allocate(&self, size: usize) -> Result<(), AllocError> {
        if let Some(limit) = self.fail_after
            && self.granted.load(Ordering::SeqCst) >= limit
        {
            return Err(AllocError(size));
        }
        self.granted.fetch_add(1, Ordering::SeqCst);
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.outstanding_bytes.fetch_add(size, Ordering::SeqCst);
        Ok(())
    }

    fn deallocate(&self, size: usize) {
        let prev = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(prev > 0, "deallocate without a matching allocate");
        self.outstanding_bytes.fetch_sub(size, Ordering::SeqCst);
    }
}

/// RAII reservation: released on drop.
#[must_use]
pub struct Lease<'a, A: Allocator + ?Sized> {
    alloc: &'a A,
    size: usize,
}

impl<'a, A: Allocator + ?Sized> Lease<'a, A> {
    pub fn acquire(alloc: &'a A, size: usize) -> Result<Self, AllocError> {
        alloc.allocate(size)?;
        Ok(Self { alloc, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl<A: Allocator + ?Sized> Drop for Lease<'_, A> {
    fn drop(&mut self) {
        self.alloc.deallocate(self.size);
    }
}

impl<A: Allocator + ?Sized> std::fmt::Debug for Lease<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lease").field("size", &self.size).finish()
    }
}
