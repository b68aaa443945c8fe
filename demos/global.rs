//! Run a Rust program with its whole heap scattered:
//! `cargo run --example global`
//!
//! Installs the shim as the global allocator, upstream of the real malloc,
//! exactly like the preload build does for C hosts. Every Vec growth below
//! moves to a fresh random offset; nothing is ever freed. Expect the
//! process to hold on to everything it ever allocated.

use scattermalloc::{RtldNext, Shim, ShimConfig, Strategy};

#[global_allocator]
static SCATTER: Shim<RtldNext> = Shim::new(
    RtldNext::new(),
    ShimConfig {
        // A quarter gigabyte keeps the demo polite; the preload build
        // reserves a full one.
        capacity: 1 << 28,
        granule: 16,
        diag_cadence: 0,
        strategy: Strategy::RandomOffset,
        seed: 0,
    },
);

fn main() {
    let mut numbers = Vec::new();
    for n in 0u64..1000 {
        numbers.push(n * n);
    }
    let sum: u64 = numbers.iter().sum();
    println!("sum of the first 1000 squares: {sum}");

    let words: Vec<String> = "every allocation lands somewhere new"
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    println!("{} heap-allocated words survived: {words:?}", words.len());

    let stats = SCATTER.counters();
    println!(
        "{} mallocs, {} frees, arena at {:?}",
        stats.allocs,
        stats.frees,
        SCATTER.arena_base().map(|p| p.as_ptr())
    );
}
