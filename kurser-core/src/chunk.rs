//! Balanced partitioning of an ordered list over a number of days.
//!
//! `x` items over `D` days gives `n = x / D` items per day with `d = x % D`
//! days left over. Solving `(D - d) * n + d * (n + 1) = x` shows the even
//! split is: `D - d` days of `n` items followed by `d` days of `n + 1`.
//!
//! ```text
//! [1, 2, 3, 4, 5, 6, 7, 8, 9, 10] over 3 days
//! => [1, 2, 3] [4, 5, 6] [7, 8, 9, 10]
//! ```

use thiserror::Error;

/// Why a list cannot be split
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// Zero days requested
    #[error("no days to distribute over")]
    NoDays,

    /// Fewer items than days
    #[error("{items} items cannot fill {days} days")]
    TooFewItems { items: usize, days: usize },
}

/// Split `items` into exactly `days` contiguous chunks whose sizes differ by
/// at most one, smaller chunks first.
///
/// Every chunk is non-empty, so `days` may not exceed `items.len()`.
///
/// # Errors
///
/// [`ChunkError::NoDays`] for zero days, [`ChunkError::TooFewItems`] when
/// `items.len() < days`.
pub fn chunk<T>(items: &[T], days: usize) -> Result<Vec<&[T]>, ChunkError> {
    if days == 0 {
        return Err(ChunkError::NoDays);
    }

    let x = items.len();
    let n = x / days;
    let d = x % days;

    if n == 0 {
        return Err(ChunkError::TooFewItems { items: x, days });
    }

    let (small, large) = items.split_at((days - d) * n);

    Ok(small.chunks(n).chain(large.chunks(n + 1)).collect())
}
