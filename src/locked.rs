//! Lock-wrapped buddy system
//!
//! Wraps a [`BuddySystem`] in a spin mutex so a multi-threaded host can
//! share one instance through `&self` methods. The lock is held for the
//! whole call, keeping every operation atomic from the outside.

use alloc::vec::Vec;

use spin::Mutex;

use crate::buddy::{ArenaStats, Block, BuddySystem, SnapshotEntry};
use crate::{AllocResult, ProcessAllocator};

/// A [`BuddySystem`] behind one exclusive lock
pub struct LockedBuddySystem {
    inner: Mutex<BuddySystem>,
}

impl LockedBuddySystem {
    /// Create a locked buddy system over `total_units` abstract units.
    pub fn new(total_units: usize) -> AllocResult<Self> {
        Ok(Self {
            inner: Mutex::new(BuddySystem::new(total_units)?),
        })
    }

    /// Allocate a block for process `pid`.
    pub fn alloc_process(&self, pid: &str, size_units: usize) -> AllocResult<Block> {
        self.inner.lock().alloc_process(pid, size_units)
    }

    /// Release the block held by process `pid`.
    pub fn dealloc_process(&self, pid: &str) -> AllocResult<Block> {
        self.inner.lock().dealloc_process(pid)
    }

    /// Address-ordered view of the whole arena.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.inner.lock().snapshot()
    }

    /// Compute the current arena statistics.
    pub fn stats(&self) -> ArenaStats {
        self.inner.lock().stats()
    }

    /// Returns the total number of units in the arena.
    pub fn total_units(&self) -> usize {
        self.inner.lock().total_units()
    }

    /// Returns the number of allocated units.
    pub fn used_units(&self) -> usize {
        self.inner.lock().used_units()
    }

    /// Returns the number of available units.
    pub fn available_units(&self) -> usize {
        self.inner.lock().available_units()
    }
}
