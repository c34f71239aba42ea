//! Statistics and debugging for the buddy system
//!
//! Provides on-demand arena statistics and failure reporting.

/// Arena statistics
#[derive(Debug, Clone, Copy)]
pub struct ArenaStats {
    pub total_units: usize,
    pub free_units: usize,
    pub used_units: usize,
    pub free_blocks: usize,
    pub allocated_blocks: usize,
    pub largest_free_block: usize,
}

impl Default for ArenaStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaStats {
    pub const fn new() -> Self {
        Self {
            total_units: 0,
            free_units: 0,
            used_units: 0,
            free_blocks: 0,
            allocated_blocks: 0,
            largest_free_block: 0,
        }
    }
}

/// Allocation failure reporter
pub struct FailureReporter;

impl FailureReporter {
    /// Log the arena state behind a failed allocation
    /// This is a standalone function to keep allocation logic clean
    #[allow(unused_variables)]
    pub fn log_alloc_failure(pid: &str, requested: usize, needed: usize, stats: &ArenaStats) {
        {
            #[cfg(feature = "log")]
            use log::debug;
            debug!("========================================");
            debug!(
                "Request: process {} wants {} units (rounded to {})",
                pid, requested, needed
            );
            debug!("Arena state:");
            debug!("  Total units: {}", stats.total_units);
            debug!(
                "  Free units: {} in {} blocks",
                stats.free_units, stats.free_blocks
            );
            debug!(
                "  Used units: {} in {} blocks",
                stats.used_units, stats.allocated_blocks
            );
            debug!("  Largest free block: {}", stats.largest_free_block);
            debug!("========================================");
        }
    }
}
