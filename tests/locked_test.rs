//! Tests for the locked wrapper shared across real threads.

use std::sync::Arc;
use std::thread;

use buddy_system_sim::LockedBuddySystem;

const ARENA_UNITS: usize = 1024;

#[test]
fn test_concurrent_churn_keeps_the_arena_intact() {
    let system = Arc::new(LockedBuddySystem::new(ARENA_UNITS).unwrap());

    let mut handles = Vec::new();
    for worker in 0..4 {
        let system = Arc::clone(&system);
        handles.push(thread::spawn(move || {
            for round in 0..50 {
                let pid = format!("w{}-{}", worker, round);
                system.alloc_process(&pid, 8).unwrap();
                system.dealloc_process(&pid).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(system.used_units(), 0);
    assert_eq!(system.available_units(), ARENA_UNITS);

    let snapshot = system.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].size, ARENA_UNITS);
    assert!(!snapshot[0].allocated);
}

#[test]
fn test_operations_stay_whole_across_threads() {
    let system = Arc::new(LockedBuddySystem::new(ARENA_UNITS).unwrap());

    let mut handles = Vec::new();
    for worker in 0..4 {
        let system = Arc::clone(&system);
        handles.push(thread::spawn(move || {
            for slot in 0..4 {
                let pid = format!("w{}-{}", worker, slot);
                system.alloc_process(&pid, 4).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = system.stats();
    assert_eq!(stats.used_units, 64);
    assert_eq!(stats.allocated_blocks, 16);

    for worker in 0..4 {
        for slot in 0..4 {
            let pid = format!("w{}-{}", worker, slot);
            system.dealloc_process(&pid).unwrap();
        }
    }
    assert_eq!(system.used_units(), 0);
    assert_eq!(system.snapshot().len(), 1);
}
