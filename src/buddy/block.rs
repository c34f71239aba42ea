//! Block metadata
//!
//! Represents a run of the arena as a half-open range with offset and size
//! information.

use core::cmp::PartialOrd;

/// Block metadata
///
/// Covers `[offset, offset + size)` in abstract units. `size` is a power
/// of two everywhere the simulator hands one out.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub offset: usize,
    pub size: usize,
}

impl Block {
    /// Create a new block
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// First offset past the block
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Calculate the buddy offset for this block
    /// The buddy is the other half of the parent block at the next size up
    /// For a block of size s at offset O, its buddy is at O ^ s
    pub const fn buddy_offset(&self) -> usize {
        self.offset ^ self.size
    }
}

impl PartialOrd for Block {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.offset.partial_cmp(&other.offset)
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.size == other.size
    }
}

impl Eq for Block {}

/// One run of the arena as reported by a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub size: usize,
    pub allocated: bool,
}
