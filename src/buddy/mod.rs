//! Buddy system simulator module
//!
//! This module provides the complete simulator core:
//! - Offset-keyed free-block registry for first-fit scans and neighbor lookups
//! - Split and merge machinery over abstract power-of-two blocks
//! - Per-process allocation table and on-demand statistics

pub mod block;
pub mod buddy_system;
pub mod free_registry;
pub mod stats;

pub use block::{Block, SnapshotEntry};
pub use buddy_system::BuddySystem;
pub use free_registry::FreeRegistry;
pub use stats::{ArenaStats, FailureReporter};
