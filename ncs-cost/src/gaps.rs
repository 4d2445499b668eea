/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-loop idle-time ("gap") analysis of a cyclic schedule.
//!
//! A schedule of period `T` repeats forever.  For a given loop, the gap at
//! position `i` is the number of steps since the loop last held a channel:
//! `0` if it is served at `i`, `1` if it was served at `i - 1`, and so on,
//! wrapping into the previous cycle.
//!
//! The wrap is resolved by walking two concatenated copies of the schedule
//! and keeping the counters of the second copy.  After one full lap the
//! counter has seen the loop's last service in the previous cycle, so the
//! result does not depend on where the period happens to start.
//!
//! ```text
//! schedule (2 loops, 1 channel):   [0, 1, 1, 0]   0 → {1}, 1 → {2}
//! loop 1, doubled walk:            0 1 2 0 | 0 1 2 0
//! gaps                                       [0, 1, 2, 0]
//! ```

use crate::allocation::AllocationTable;
use crate::error::ScheduleError;

/// Result of [`analyze_gaps`] for one loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopGaps {
    /// Steps since the loop was last served, per schedule position.
    ///
    /// Only meaningful when `ever_served` is `true`.
    pub gaps: Vec<usize>,

    /// `false` if no allocation in the schedule serves the loop.
    pub ever_served: bool,
}

impl LoopGaps {
    /// The gap sequence, or `None` for a loop the schedule never serves.
    pub fn served_gaps(&self) -> Option<&[usize]> {
        self.ever_served.then_some(self.gaps.as_slice())
    }

    /// Largest gap, or `None` for a never-served loop.
    pub fn max_gap(&self) -> Option<usize> {
        self.served_gaps().and_then(|g| g.iter().copied().max())
    }
}

/// Compute the cyclic gap sequence of `loop_id` under `schedule`.
///
/// # Errors
/// * [`ScheduleError::Empty`] – `schedule` has no entries.
/// * [`ScheduleError::OutOfRange`] – an entry is not an index of `table`.
/// * [`ScheduleError::UnknownLoop`] – `loop_id` is not in `1..=n_loops`.
pub fn analyze_gaps(
    schedule: &[usize],
    loop_id: usize,
    table: &AllocationTable,
) -> Result<LoopGaps, ScheduleError> {
    if loop_id == 0 || loop_id > table.n_loops() {
        return Err(ScheduleError::UnknownLoop {
            loop_id,
            n_loops: table.n_loops(),
        });
    }
    table.validate(schedule)?;

    Ok(gaps_unchecked(schedule, loop_id, table))
}

/// [`analyze_gaps`] without validation; the caller guarantees that
/// `schedule` is non-empty and in range and that `loop_id` exists.
pub(crate) fn gaps_unchecked(
    schedule: &[usize],
    loop_id: usize,
    table: &AllocationTable,
) -> LoopGaps {
    let period = schedule.len();
    let mut gaps = vec![0; period];
    let mut since = 0usize;
    let mut ever_served = false;

    for step in 0..2 * period {
        let index = schedule[step % period];
        if table.serves(index, loop_id) {
            since = 0;
            ever_served = true;
        } else {
            since += 1;
        }
        if step >= period {
            gaps[step - period] = since;
        }
    }

    LoopGaps { gaps, ever_served }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n_loops: usize, n_channels: usize) -> AllocationTable {
        AllocationTable::enumerate(n_loops, n_channels).unwrap()
    }

    #[test]
    fn alternating_schedule_serves_every_other_step() {
        let t = table(2, 1);
        let g = analyze_gaps(&[0, 1, 0, 1], 1, &t).unwrap();
        assert!(g.ever_served);
        assert_eq!(g.gaps, vec![0, 1, 0, 1]);

        let g2 = analyze_gaps(&[0, 1, 0, 1], 2, &t).unwrap();
        assert_eq!(g2.gaps, vec![1, 0, 1, 0]);
    }

    #[test]
    fn wraparound_counts_service_from_previous_cycle() {
        // Loop 1 is served only at the last position; position 0 is one step
        // after that service in the previous cycle.
        let t = table(2, 1);
        let g = analyze_gaps(&[1, 1, 1, 0], 1, &t).unwrap();
        assert_eq!(g.gaps, vec![1, 2, 3, 0]);
        assert_eq!(g.max_gap(), Some(3));
    }

    #[test]
    fn rotated_schedule_rotates_gaps() {
        let t = table(3, 1);
        let schedule = vec![0, 1, 0, 2, 2, 1];
        for loop_id in 1..=3 {
            let base = analyze_gaps(&schedule, loop_id, &t).unwrap();
            for shift in 1..schedule.len() {
                let mut rotated = schedule.clone();
                rotated.rotate_left(shift);
                let got = analyze_gaps(&rotated, loop_id, &t).unwrap();

                let mut expected = base.gaps.clone();
                expected.rotate_left(shift);
                assert_eq!(got.gaps, expected, "loop {loop_id}, shift {shift}");
            }
        }
    }

    #[test]
    fn never_served_loop_is_flagged() {
        let t = table(3, 1);
        let g = analyze_gaps(&[0, 1, 0, 1], 3, &t).unwrap();
        assert!(!g.ever_served);
        assert_eq!(g.served_gaps(), None);
        assert_eq!(g.max_gap(), None);
    }

    #[test]
    fn multi_channel_membership_is_respected() {
        // 3 loops, 2 channels: 0 → {1,2}, 1 → {1,3}, 2 → {2,3}
        let t = table(3, 2);
        let g1 = analyze_gaps(&[2, 2, 0], 1, &t).unwrap();
        assert_eq!(g1.gaps, vec![1, 2, 0]);
        let g2 = analyze_gaps(&[2, 2, 0], 2, &t).unwrap();
        assert_eq!(g2.gaps, vec![0, 0, 0]);
        let g3 = analyze_gaps(&[0, 0, 0], 3, &t).unwrap();
        assert!(!g3.ever_served);
    }

    #[test]
    fn always_served_loop_has_zero_gaps() {
        let t = table(1, 1);
        let g = analyze_gaps(&[0, 0, 0], 1, &t).unwrap();
        assert_eq!(g.gaps, vec![0, 0, 0]);
    }

    #[test]
    fn single_step_schedule() {
        let t = table(2, 1);
        assert_eq!(analyze_gaps(&[0], 1, &t).unwrap().gaps, vec![0]);
        assert!(!analyze_gaps(&[0], 2, &t).unwrap().ever_served);
    }

    #[test]
    fn unknown_loop_is_rejected() {
        let t = table(2, 1);
        assert_eq!(
            analyze_gaps(&[0, 1], 0, &t).unwrap_err(),
            ScheduleError::UnknownLoop {
                loop_id: 0,
                n_loops: 2
            }
        );
        assert!(matches!(
            analyze_gaps(&[0, 1], 3, &t),
            Err(ScheduleError::UnknownLoop { .. })
        ));
    }

    #[test]
    fn out_of_range_and_empty_schedules_are_rejected() {
        let t = table(2, 1);
        assert!(matches!(
            analyze_gaps(&[0, 2], 1, &t),
            Err(ScheduleError::OutOfRange { position: 1, .. })
        ));
        assert_eq!(analyze_gaps(&[], 1, &t).unwrap_err(), ScheduleError::Empty);
    }
}
