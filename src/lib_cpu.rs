#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::hint::black_box;
use std::time::Duration;

/// Runs `iterations` additions on an accumulator the optimizer cannot see through.
///
/// Every step goes through `black_box`, so the loop survives release builds and keeps one
/// core saturated for its whole length.
#[inline(never)]
pub fn hot_loop(iterations: u64) -> u64 {
    let mut sum = 0u64;
    for i in 0..iterations {
        sum = black_box(sum.wrapping_add(i));
    }
    sum
}

// Interruption is not an error here; a short pause is still a pause.
pub fn idle_pause(duration: Duration) {
    std::thread::sleep(duration);
}
