#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::mem::size_of;
use std::os::raw::c_int;

/// Allocates room for `elements` C `int`s and abandons it.
///
/// The block is never freed; a leak checker run against the process reports it as lost
/// once the returned reference goes out of scope.
pub fn leak_block(elements: usize) -> &'static mut [c_int] {
    let block: Box<[c_int]> = vec![0; elements].into_boxed_slice();
    Box::leak(block)
}

pub fn leaked_bytes(elements: usize) -> usize {
    elements.saturating_mul(size_of::<c_int>())
}
