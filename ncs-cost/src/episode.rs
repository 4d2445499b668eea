/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Episode state machine for building a schedule one slot at a time.
//!
//! An episode starts with `period` empty slots.  Each [`step`] writes one
//! allocation index into the first empty slot; when the last slot is filled
//! the whole schedule is priced through [`ScheduleCost`] and the normalised
//! reward is reported.  Intermediate steps earn nothing.
//!
//! ```text
//! reset  → [_, _, _]
//! step 1 → [1, _, _]   reward 0
//! step 0 → [1, 0, _]   reward 0
//! step 1 → [1, 0, 1]   reward normalize(cost([1, 0, 1])), done
//! ```
//!
//! [`step`]: SchedulingEpisode::step

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cost::ScheduleCost;
use crate::error::ScheduleError;

/// Errors returned by [`SchedulingEpisode::step`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EpisodeError {
    /// The action is not a valid allocation index.
    #[error("action {action} is invalid (expected 0..{action_count})")]
    InvalidAction { action: usize, action_count: usize },

    /// The completed schedule could not be priced.
    #[error("cost evaluation failed: {0}")]
    Cost(#[from] ScheduleError),
}

/// What one [`SchedulingEpisode::step`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Schedule slots after the step; `None` marks an empty slot.
    pub state: Vec<Option<usize>>,
    /// Normalised reward in `[0, 1]`; non-zero only when `done`.
    pub reward: f64,
    /// `true` once every slot is filled.
    pub done: bool,
}

/// Map a cost onto `[0, 1]`: `0` above `max_value`, else `1 − value/max_value`.
pub fn normalize(value: f64, max_value: f64) -> f64 {
    if value > max_value {
        0.0
    } else {
        1.0 - value / max_value
    }
}

/// Fixed-length schedule under construction.
#[derive(Debug)]
pub struct SchedulingEpisode<C: ScheduleCost> {
    cost: Arc<C>,
    slots: Vec<Option<usize>>,
}

impl<C: ScheduleCost> SchedulingEpisode<C> {
    /// Create an episode of `period` slots, already reset.
    pub fn new(cost: Arc<C>, period: usize) -> Self {
        Self {
            cost,
            slots: vec![None; period],
        }
    }

    pub fn period(&self) -> usize {
        self.slots.len()
    }

    /// Number of valid actions (allocation indices).
    pub fn action_count(&self) -> usize {
        self.cost.action_count()
    }

    /// Current slots.
    pub fn state(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// Returns `true` once every slot is filled.
    pub fn is_done(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Clear every slot and return the empty state.
    pub fn reset(&mut self) -> &[Option<usize>] {
        self.slots.iter_mut().for_each(|s| *s = None);
        &self.slots
    }

    /// Place `action` into the first empty slot.
    ///
    /// Stepping a finished episode leaves the schedule unchanged and reports
    /// the terminal reward again; call [`reset`](Self::reset) first.
    ///
    /// # Errors
    /// * [`EpisodeError::InvalidAction`] – `action >= action_count()`.
    /// * [`EpisodeError::Cost`] – the completed schedule was rejected.
    pub fn step(&mut self, action: usize) -> Result<StepOutcome, EpisodeError> {
        let action_count = self.action_count();
        if action >= action_count {
            return Err(EpisodeError::InvalidAction {
                action,
                action_count,
            });
        }

        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(slot) => *slot = Some(action),
            None => warn!(
                action,
                "step() called on a finished episode; call reset() before stepping again"
            ),
        }

        let done = self.is_done();
        let reward = if done {
            let schedule: Vec<usize> = self.slots.iter().flatten().copied().collect();
            let cost = self.cost.cost(&schedule)?;
            let reward = normalize(cost, self.cost.max_cost());
            debug!(?schedule, cost, reward, "Episode complete");
            reward
        } else {
            0.0
        };

        Ok(StepOutcome {
            state: self.slots.clone(),
            reward,
            done,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
