//! Buddy System Simulator
//!
//! This crate implements a buddy memory allocation simulator over an
//! abstract arena of power-of-two size, featuring:
//! - Offset-ordered free-block registry with first-fit selection
//! - Recursive splitting that always hands out the lower half
//! - Eager buddy coalescing to a fixed point on every release
//! - Lock-wrapped shell for embedding in multi-threaded hosts

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

// Logging support - conditionally import log crate
#[cfg(feature = "log")]
extern crate log;

// Stub macros when log is disabled - these become no-ops
#[cfg(not(feature = "log"))]
macro_rules! error {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! info {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// The error type used for allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Invalid request. (e.g. zero size, id already in use, non-power-of-two
    /// arena)
    InvalidParam,
    /// No free block large enough to serve the request.
    NoMemory,
    /// Release of an id that holds no allocation.
    NotAllocated,
}

/// A [`Result`] type with [`AllocError`] as the error type.
pub type AllocResult<T = ()> = Result<T, AllocError>;

/// Process-granularity allocator.
pub trait ProcessAllocator {
    /// Allocate a block for process `pid`, rounding the requested size up
    /// to the next power of two.
    fn alloc_process(&mut self, pid: &str, size_units: usize) -> AllocResult<Block>;

    /// Release the block held by process `pid` and merge buddies eagerly.
    fn dealloc_process(&mut self, pid: &str) -> AllocResult<Block>;

    /// Address-ordered view of the whole arena, free and allocated runs
    /// interleaved.
    fn snapshot(&self) -> Vec<SnapshotEntry>;

    /// Returns the total number of units in the arena.
    fn total_units(&self) -> usize;

    /// Returns the number of allocated units.
    fn used_units(&self) -> usize;

    /// Returns the number of available units.
    fn available_units(&self) -> usize;
}

// Export the simulator implementation
pub mod buddy;
pub use buddy::{ArenaStats, Block, BuddySystem, FailureReporter, FreeRegistry, SnapshotEntry};

pub mod locked;
pub use locked::LockedBuddySystem;
