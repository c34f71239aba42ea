//! Buddy system core
//!
//! Owns the free-block registry and the per-process allocation table and
//! runs the split and merge machinery over them.

use crate::{AllocError, AllocResult, ProcessAllocator};

#[cfg(feature = "log")]
use log::{debug, trace, warn};

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::block::{Block, SnapshotEntry};
use super::free_registry::FreeRegistry;
use super::stats::{ArenaStats, FailureReporter};

/// A buddy system over one fixed arena
///
/// The registry holds the free blocks keyed by offset and the table maps
/// each live process id to the block serving it. Together they always
/// partition `[0, total_units)`.
pub struct BuddySystem {
    total_units: usize,
    registry: FreeRegistry,
    allocations: BTreeMap<String, Block>,
}

impl BuddySystem {
    /// Create a buddy system over `total_units` abstract units.
    ///
    /// The whole arena starts as one free block. `total_units` must be a
    /// power of two, otherwise offsets stop lining up with their buddies.
    pub fn new(total_units: usize) -> AllocResult<Self> {
        if !total_units.is_power_of_two() {
            return Err(AllocError::InvalidParam);
        }

        let mut registry = FreeRegistry::new();
        registry.insert(Block::new(0, total_units));
        Ok(Self {
            total_units,
            registry,
            allocations: BTreeMap::new(),
        })
    }

    /// Free blocks in ascending offset order.
    pub fn free_blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.registry.iter()
    }

    /// Live allocations in ascending process-id order.
    pub fn allocations(&self) -> impl Iterator<Item = (&str, Block)> + '_ {
        self.allocations
            .iter()
            .map(|(pid, &block)| (pid.as_str(), block))
    }

    /// Compute the current arena statistics.
    pub fn stats(&self) -> ArenaStats {
        let free_units = self.registry.total_free();
        ArenaStats {
            total_units: self.total_units,
            free_units,
            used_units: self.total_units - free_units,
            free_blocks: self.registry.len(),
            allocated_blocks: self.allocations.len(),
            largest_free_block: self.registry.largest(),
        }
    }

    /// Merge buddy pairs until none remain.
    ///
    /// The registry is offset-ordered, so a block's buddy can only be its
    /// immediate successor: anything between them would overlap one of the
    /// two. After a merge the scan resumes at the merged block's
    /// predecessor, which may now have a buddy of its own.
    fn coalesce(&mut self) {
        let mut cursor = 0;
        while let Some(lower) = self.registry.next_at_or_after(cursor) {
            let upper = match self.registry.next_after(lower.offset) {
                Some(upper) => upper,
                None => break,
            };

            // Upper halves point down, so this also rules out merging
            // across a parent boundary.
            if lower.size == upper.size && lower.buddy_offset() == upper.offset {
                self.registry.remove(lower.offset);
                self.registry.remove(upper.offset);
                let parent = Block::new(lower.offset, lower.size * 2);
                let inserted = self.registry.insert(parent);
                debug_assert!(inserted, "merged block collided with a free block");
                debug!(
                    "buddy system: merged [{}, {}) and [{}, {}) into [{}, {})",
                    lower.offset,
                    lower.end(),
                    upper.offset,
                    upper.end(),
                    parent.offset,
                    parent.end()
                );
                cursor = match self.registry.prev_before(parent.offset) {
                    Some(prev) => prev.offset,
                    None => parent.offset,
                };
            } else {
                cursor = lower.offset + 1;
            }
        }
    }
}

impl ProcessAllocator for BuddySystem {
    fn alloc_process(&mut self, pid: &str, size_units: usize) -> AllocResult<Block> {
        if size_units == 0 {
            warn!("buddy system: process {} requested 0 units", pid);
            return Err(AllocError::InvalidParam);
        }
        if self.allocations.contains_key(pid) {
            warn!("buddy system: process {} already holds a block", pid);
            return Err(AllocError::InvalidParam);
        }

        let needed = match size_units.checked_next_power_of_two() {
            Some(needed) => needed,
            None => {
                debug!(
                    "buddy system: request of {} units cannot round to a power of two",
                    size_units
                );
                return Err(AllocError::NoMemory);
            }
        };

        // The scan is the last fallible step; nothing is touched until a
        // block large enough is known to exist.
        let mut block = match self.registry.first_fit(needed) {
            Some(block) => block,
            None => {
                FailureReporter::log_alloc_failure(pid, size_units, needed, &self.stats());
                return Err(AllocError::NoMemory);
            }
        };

        let removed = self.registry.remove(block.offset).is_some();
        debug_assert!(removed, "first-fit block missing from the registry");

        // Split down to the rounded size. The lower half keeps the offset,
        // the upper half goes back to the registry.
        while block.size > needed {
            block.size /= 2;
            let upper = Block::new(block.offset + block.size, block.size);
            trace!(
                "buddy system: split off [{}, {}), keeping [{}, {})",
                upper.offset,
                upper.end(),
                block.offset,
                block.end()
            );
            let inserted = self.registry.insert(upper);
            debug_assert!(inserted, "split half collided with a free block");
        }

        self.allocations.insert(String::from(pid), block);
        debug!(
            "buddy system: process {} allocated [{}, {}) for a request of {}",
            pid,
            block.offset,
            block.end(),
            size_units
        );
        Ok(block)
    }

    fn dealloc_process(&mut self, pid: &str) -> AllocResult<Block> {
        let block = match self.allocations.remove(pid) {
            Some(block) => block,
            None => {
                warn!("buddy system: process {} holds no block", pid);
                return Err(AllocError::NotAllocated);
            }
        };

        let inserted = self.registry.insert(block);
        debug_assert!(inserted, "released block collided with a free block");
        self.coalesce();

        debug!(
            "buddy system: process {} released [{}, {})",
            pid,
            block.offset,
            block.end()
        );
        Ok(block)
    }

    fn snapshot(&self) -> Vec<SnapshotEntry> {
        let mut runs: Vec<(usize, SnapshotEntry)> = self
            .registry
            .iter()
            .map(|block| {
                (
                    block.offset,
                    SnapshotEntry {
                        size: block.size,
                        allocated: false,
                    },
                )
            })
            .collect();
        for block in self.allocations.values() {
            runs.push((
                block.offset,
                SnapshotEntry {
                    size: block.size,
                    allocated: true,
                },
            ));
        }
        runs.sort_unstable_by_key(|&(offset, _)| offset);
        runs.into_iter().map(|(_, entry)| entry).collect()
    }

    fn total_units(&self) -> usize {
        self.total_units
    }

    fn used_units(&self) -> usize {
        self.total_units - self.registry.total_free()
    }

    fn available_units(&self) -> usize {
        self.registry.total_free()
    }
}
