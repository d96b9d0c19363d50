//! Static work partitioning for parallel builds.
//!
//! The record list is cut into exactly `workers` contiguous chunks. Every chunk
//! gets `n / workers` records and the last one also takes the remainder
//! `n % workers`. With fewer records than workers the leading chunks are empty
//! (`n / workers == 0`) and the last chunk holds everything.
//!
//! ```text
//! n = 10, workers = 4  →  [0..2) [2..4) [4..6) [6..10)
//! n = 3,  workers = 4  →  [0..0) [0..0) [0..0) [0..3)
//! ```
//!
//! There is no rebalancing or stealing. Because chunks are disjoint, each
//! worker owns its records and their output filenames outright.

use std::ops::Range;

/// Index ranges of the chunks. Always returns `workers.max(1)` ranges whose
/// concatenation is `0..n`.
pub fn partition_ranges(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let size = n / workers;
    (0..workers)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == workers { n } else { start + size };
            start..end
        })
        .collect()
}

/// Split a mutable slice into the chunks described by [`partition_ranges`].
pub fn partition_mut<T>(items: &mut [T], workers: usize) -> Vec<&mut [T]> {
    let ranges = partition_ranges(items.len(), workers);
    let mut chunks = Vec::with_capacity(ranges.len());
    let mut rest = items;
    for range in ranges {
        let (head, tail) = rest.split_at_mut(range.len());
        chunks.push(head);
        rest = tail;
    }
    chunks
}
