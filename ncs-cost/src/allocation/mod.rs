/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Channel allocation enumeration.
//!
//! With `n_channels` channels shared by `n_loops` loops, one time step serves
//! exactly `n_channels` distinct loops.  Every possible choice is given a dense
//! index, and a schedule is simply a sequence of those indices.
//!
//! The table is a bijection `0..C(n_loops, n_channels)` ↔ subsets, in
//! lexicographic combination order over the 1-based loop ids:
//!
//! ```text
//! n_loops = 4, n_channels = 2
//!   0 → [1, 2]   1 → [1, 3]   2 → [1, 4]
//!   3 → [2, 3]   4 → [2, 4]   5 → [3, 4]
//! ```
//!
//! It depends only on `(n_loops, n_channels)`, so it is built once and shared
//! by every evaluation.

pub mod math;

use tracing::debug;

use crate::error::{AllocationError, ScheduleError};
use math::binomial;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default upper limit on the number of table entries.
///
/// Callers that want a different limit can use
/// [`AllocationTable::enumerate_with_limit`].
pub const DEFAULT_TABLE_LIMIT: u64 = 1_000_000;

// ── AllocationTable ───────────────────────────────────────────────────────────

/// Index → served-loop subset lookup table.
///
/// # Example
/// ```rust
/// use ncs_cost::allocation::AllocationTable;
///
/// let table = AllocationTable::enumerate(3, 2).unwrap();
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.subset(0), Some(&[1, 2][..]));
/// assert_eq!(table.subset(2), Some(&[2, 3][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationTable {
    n_loops: usize,
    n_channels: usize,
    /// Sorted loop ids per index.  Lexicographic order of the whole vector
    /// lets [`index_of`](Self::index_of) binary-search it.
    subsets: Vec<Vec<usize>>,
}

impl AllocationTable {
    /// Enumerate every `n_channels`-subset of `{1, …, n_loops}` with the
    /// default size limit.
    ///
    /// # Errors
    /// * [`AllocationError::DegenerateConfiguration`] – `n_channels` is `0`
    ///   or larger than `n_loops`.
    /// * [`AllocationError::Overflow`] / [`AllocationError::TooLarge`] – the
    ///   table would be unreasonably large.
    pub fn enumerate(n_loops: usize, n_channels: usize) -> Result<Self, AllocationError> {
        Self::enumerate_with_limit(n_loops, n_channels, DEFAULT_TABLE_LIMIT)
    }

    /// Same as [`enumerate`](Self::enumerate) with a custom entry limit.
    pub fn enumerate_with_limit(
        n_loops: usize,
        n_channels: usize,
        limit: u64,
    ) -> Result<Self, AllocationError> {
        if n_channels == 0 || n_channels > n_loops {
            return Err(AllocationError::DegenerateConfiguration {
                n_loops,
                n_channels,
            });
        }

        let entries = binomial(n_loops, n_channels)?;
        if entries > limit {
            return Err(AllocationError::TooLarge { entries, limit });
        }

        let mut subsets = Vec::with_capacity(entries as usize);
        let mut current: Vec<usize> = (1..=n_channels).collect();
        loop {
            subsets.push(current.clone());

            // Rightmost position that can still be advanced
            let Some(pos) = (0..n_channels)
                .rev()
                .find(|&i| current[i] < n_loops - n_channels + i + 1)
            else {
                break;
            };
            current[pos] += 1;
            for i in pos + 1..n_channels {
                current[i] = current[i - 1] + 1;
            }
        }

        debug!(
            n_loops,
            n_channels,
            entries = subsets.len(),
            "Enumerated channel allocations"
        );

        Ok(Self {
            n_loops,
            n_channels,
            subsets,
        })
    }

    /// Number of loops the table was built for.
    pub fn n_loops(&self) -> usize {
        self.n_loops
    }

    /// Number of channels (subset size).
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Number of entries, `C(n_loops, n_channels)`.
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    /// Always `false` for a successfully enumerated table.
    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    /// Loops served by allocation `index`, or `None` if out of range.
    pub fn subset(&self, index: usize) -> Option<&[usize]> {
        self.subsets.get(index).map(Vec::as_slice)
    }

    /// Inverse lookup: the index of a subset, given its loop ids in any order.
    pub fn index_of(&self, loops: &[usize]) -> Option<usize> {
        let mut key = loops.to_vec();
        key.sort_unstable();
        self.subsets
            .binary_search_by(|s| s.as_slice().cmp(key.as_slice()))
            .ok()
    }

    /// Returns `true` if allocation `index` serves `loop_id`.
    ///
    /// Out-of-range indices serve nobody.
    pub fn serves(&self, index: usize, loop_id: usize) -> bool {
        self.subset(index)
            .is_some_and(|s| s.binary_search(&loop_id).is_ok())
    }

    /// Iterate over `(index, subset)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.subsets.iter().map(Vec::as_slice).enumerate()
    }

    /// Check that every entry of `schedule` is a valid index.
    ///
    /// # Errors
    /// [`ScheduleError::Empty`] for a zero-length schedule, otherwise
    /// [`ScheduleError::OutOfRange`] naming the first offending position.
    pub fn validate(&self, schedule: &[usize]) -> Result<(), ScheduleError> {
        if schedule.is_empty() {
            return Err(ScheduleError::Empty);
        }
        match schedule.iter().position(|&idx| idx >= self.len()) {
            Some(position) => Err(ScheduleError::OutOfRange {
                position,
                index: schedule[position],
                table_size: self.len(),
            }),
            None => Ok(()),
        }
    }

    /// Translate a schedule of indices into the loop subsets it serves.
    ///
    /// # Errors
    /// [`ScheduleError::OutOfRange`] if any index is not in the table.  No
    /// partial translation is returned.
    pub fn to_schedule(&self, indices: &[usize]) -> Result<Vec<&[usize]>, ScheduleError> {
        indices
            .iter()
            .enumerate()
            .map(|(position, &index)| {
                self.subset(index).ok_or(ScheduleError::OutOfRange {
                    position,
                    index,
                    table_size: self.len(),
                })
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
