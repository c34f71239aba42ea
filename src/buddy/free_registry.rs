//! Free-block registry
//!
//! Keeps the free blocks of the arena keyed by offset, so first-fit scans
//! and neighbor lookups run in ascending address order.

use alloc::collections::BTreeMap;
use core::ops::Bound::{Excluded, Unbounded};

#[cfg(feature = "log")]
use log::error;

use super::block::Block;

/// Offset-ordered set of free blocks
///
/// Invariants: offsets are unique, ranges never overlap, every size is a
/// power of two. `insert` refuses blocks that would break them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeRegistry {
    blocks: BTreeMap<usize, usize>,
}

impl FreeRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Insert a free block, refusing anything that overlaps an existing
    /// entry or is not a power of two in size
    pub fn insert(&mut self, block: Block) -> bool {
        if !block.size.is_power_of_two() {
            error!(
                "free registry: size {} of block at {} is not a power of two",
                block.size, block.offset
            );
            return false;
        }

        if let Some((&offset, &size)) = self.blocks.range(..block.offset).next_back() {
            if offset + size > block.offset {
                error!(
                    "free registry: [{}, {}) overlaps [{}, {})",
                    block.offset,
                    block.end(),
                    offset,
                    offset + size
                );
                return false;
            }
        }
        if let Some((&offset, _)) = self.blocks.range(block.offset..).next() {
            if block.end() > offset {
                error!(
                    "free registry: [{}, {}) overlaps the block at {}",
                    block.offset,
                    block.end(),
                    offset
                );
                return false;
            }
        }

        self.blocks.insert(block.offset, block.size);
        true
    }

    /// Remove and return the block at `offset`
    pub fn remove(&mut self, offset: usize) -> Option<Block> {
        self.blocks
            .remove(&offset)
            .map(|size| Block::new(offset, size))
    }

    /// Lowest-offset block with `size >= needed`
    pub fn first_fit(&self, needed: usize) -> Option<Block> {
        self.iter().find(|block| block.size >= needed)
    }

    /// First block at or after `offset`
    pub fn next_at_or_after(&self, offset: usize) -> Option<Block> {
        self.blocks
            .range(offset..)
            .next()
            .map(|(&offset, &size)| Block::new(offset, size))
    }

    /// First block strictly after `offset`
    pub fn next_after(&self, offset: usize) -> Option<Block> {
        self.blocks
            .range((Excluded(offset), Unbounded))
            .next()
            .map(|(&offset, &size)| Block::new(offset, size))
    }

    /// Last block strictly before `offset`
    pub fn prev_before(&self, offset: usize) -> Option<Block> {
        self.blocks
            .range(..offset)
            .next_back()
            .map(|(&offset, &size)| Block::new(offset, size))
    }

    /// Blocks in ascending offset order
    pub fn iter(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks
            .iter()
            .map(|(&offset, &size)| Block::new(offset, size))
    }

    /// Number of free blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Sum of all free block sizes
    pub fn total_free(&self) -> usize {
        self.blocks.values().sum()
    }

    /// Size of the largest free block, 0 when none
    pub fn largest(&self) -> usize {
        self.blocks.values().copied().max().unwrap_or(0)
    }
}

impl Default for FreeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn iteration_is_offset_ordered() {
        let mut registry = FreeRegistry::new();
        assert!(registry.insert(Block::new(512, 256)));
        assert!(registry.insert(Block::new(0, 128)));
        assert!(registry.insert(Block::new(256, 128)));

        let offsets: Vec<usize> = registry.iter().map(|block| block.offset).collect();
        assert_eq!(offsets, [0, 256, 512]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.total_free(), 512);
        assert_eq!(registry.largest(), 256);
    }

    #[test]
    fn insert_rejects_overlap() {
        let mut registry = FreeRegistry::new();
        assert!(registry.insert(Block::new(0, 256)));

        // Inside, duplicate offset, and straddling from below.
        assert!(!registry.insert(Block::new(128, 128)));
        assert!(!registry.insert(Block::new(0, 256)));
        assert!(registry.insert(Block::new(512, 128)));
        assert!(!registry.insert(Block::new(256, 512)));

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn insert_rejects_non_power_of_two_sizes() {
        let mut registry = FreeRegistry::new();
        assert!(!registry.insert(Block::new(0, 0)));
        assert!(!registry.insert(Block::new(0, 100)));
        assert!(registry.is_empty());
    }

    #[test]
    fn first_fit_takes_the_lowest_offset() {
        let mut registry = FreeRegistry::new();
        assert!(registry.insert(Block::new(0, 32)));
        assert!(registry.insert(Block::new(64, 64)));
        assert!(registry.insert(Block::new(256, 256)));

        assert_eq!(registry.first_fit(16), Some(Block::new(0, 32)));
        assert_eq!(registry.first_fit(64), Some(Block::new(64, 64)));
        assert_eq!(registry.first_fit(128), Some(Block::new(256, 256)));
        assert_eq!(registry.first_fit(512), None);
    }

    #[test]
    fn neighbor_queries() {
        let mut registry = FreeRegistry::new();
        assert!(registry.insert(Block::new(64, 64)));
        assert!(registry.insert(Block::new(256, 128)));

        assert_eq!(registry.next_at_or_after(0), Some(Block::new(64, 64)));
        assert_eq!(registry.next_at_or_after(64), Some(Block::new(64, 64)));
        assert_eq!(registry.next_after(64), Some(Block::new(256, 128)));
        assert_eq!(registry.next_after(256), None);
        assert_eq!(registry.prev_before(256), Some(Block::new(64, 64)));
        assert_eq!(registry.prev_before(64), None);
    }

    #[test]
    fn remove_returns_the_block() {
        let mut registry = FreeRegistry::new();
        assert!(registry.insert(Block::new(0, 128)));

        assert_eq!(registry.remove(0), Some(Block::new(0, 128)));
        assert_eq!(registry.remove(0), None);
        assert!(registry.is_empty());
        assert_eq!(registry.total_free(), 0);
        assert_eq!(registry.largest(), 0);
    }
}
