//! Interactive front end for the buddy system simulator.
//!
//! Reads an arena size, then loops over a numbered menu: allocate a
//! process, remove a process, display the memory state, exit. All
//! allocation logic lives in the library; this binary parses text and
//! renders results.

use std::io::{self, Write};

use buddy_system_sim::{AllocError, BuddySystem, ProcessAllocator};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Console logger: colored level tag plus message on standard error.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

fn level_color(level: Level) -> u8 {
    match level {
        Level::Error => 31,
        Level::Warn => 33,
        Level::Info => 37,
        Level::Debug => 32,
        Level::Trace => 36,
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!(
            "\x1b[{}m[{}] {}\x1b[0m",
            level_color(record.level()),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Print `text`, then read one trimmed line. `None` means end of input.
fn prompt(text: &str) -> Option<String> {
    print!("{}", text);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn read_arena_size() -> Option<BuddySystem> {
    loop {
        let text = prompt("Enter total size of memory: ")?;
        let total = match text.parse::<usize>() {
            Ok(total) => total,
            Err(_) => {
                println!("Invalid memory size. Please enter a valid integer.");
                continue;
            }
        };
        match BuddySystem::new(total) {
            Ok(system) => return Some(system),
            Err(_) => println!("Invalid memory size. Please enter a power of two."),
        }
    }
}

fn allocate(system: &mut BuddySystem) {
    let pid = match prompt("Enter Process ID: ") {
        Some(pid) => pid,
        None => return,
    };
    let size = match prompt("Enter size of process (in KB): ") {
        Some(text) => match text.parse::<usize>() {
            Ok(size) => size,
            Err(_) => {
                println!("Invalid process size. Please enter a valid integer.");
                return;
            }
        },
        None => return,
    };

    match system.alloc_process(&pid, size) {
        Ok(_) => println!("Successfully allocated memory for process {}.", pid),
        Err(AllocError::NoMemory) => println!(
            "Allocation failed: Not enough memory available for process {}.",
            pid
        ),
        Err(_) => println!("Allocation failed: Invalid request for process {}.", pid),
    }
}

fn remove(system: &mut BuddySystem) {
    let pid = match prompt("Enter Process ID to deallocate: ") {
        Some(pid) => pid,
        None => return,
    };
    match system.dealloc_process(&pid) {
        Ok(_) => println!("Successfully deallocated memory for process {}.", pid),
        Err(_) => println!("Deallocation failed: Process {} not found.", pid),
    }
}

fn display(system: &BuddySystem) {
    println!();
    println!("Memory State:");
    for entry in system.snapshot() {
        let state = if entry.allocated { "allocated" } else { "free" };
        println!("* {} KB ({})", entry.size, state);
    }
    let stats = system.stats();
    println!(
        "Free: {} KB in {} blocks | Allocated: {} KB in {} blocks",
        stats.free_units, stats.free_blocks, stats.used_units, stats.allocated_blocks
    );
}

fn main() {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Warn))
        .expect("setting logger failed");

    println!("Buddy System Simulator");
    let mut system = match read_arena_size() {
        Some(system) => system,
        None => return,
    };

    loop {
        println!();
        println!("1. Allocate process into memory");
        println!("2. Remove process from memory");
        println!("3. Display memory allocation status");
        println!("4. Exit");

        let choice = match prompt("Enter choice: ") {
            Some(choice) => choice,
            None => return,
        };
        match choice.parse::<u32>() {
            Ok(1) => allocate(&mut system),
            Ok(2) => remove(&mut system),
            Ok(3) => display(&system),
            Ok(4) => {
                println!("Exiting...");
                return;
            }
            Ok(_) => println!("Invalid choice. Please try again."),
            Err(_) => println!("Invalid choice. Please enter a number between 1 and 4."),
        }
    }
}
