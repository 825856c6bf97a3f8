//! Search space sizing and partitioning

use core::ops::Range;

use crate::error::{Result, SearchError};

/// Contiguous slice `[start, end)` of candidate indices for one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub start: u128,
    pub end: u128,
}

impl Partition {
    pub fn len(&self) -> u128 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<u128> {
        self.start..self.end
    }
}

/// `base^length` with overflow reported as a configuration error
pub fn space_size(base: usize, length: usize) -> Result<u128> {
    if base == 0 {
        return Err(SearchError::EmptyAlphabet);
    }
    let exp = u32::try_from(length).ok();
    exp.and_then(|e| (base as u128).checked_pow(e))
        .ok_or_else(|| SearchError::SpaceOverflow {
            alphabet: base,
            length,
            limit: max_length(base),
        })
}

/// Longest length whose space still fits in a `u128`
///
/// Unbounded (`usize::MAX`) for a single-symbol alphabet.
pub fn max_length(base: usize) -> usize {
    if base <= 1 {
        return usize::MAX;
    }
    let base = base as u128;
    let mut length = 0;
    let mut size: u128 = 1;
    while let Some(next) = size.checked_mul(base) {
        size = next;
        length += 1;
    }
    length
}

/// Split `[0, total)` into contiguous ranges, one per worker
///
/// Each range gets `total / workers` indices and the last one absorbs the
/// remainder. The worker count is clamped to `total`, so small spaces get
/// fewer (never empty or overlapping) ranges.
pub fn partition(total: u128, workers: usize) -> Vec<Partition> {
    let workers = (workers as u128).min(total);
    if workers == 0 {
        return Vec::new();
    }

    let chunk = total / workers;
    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i == workers - 1 { total } else { start + chunk };
            Partition { start, end }
        })
        .collect()
}
