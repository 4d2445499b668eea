/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Steady-state cost of a periodic channel schedule.
//!
//! [`CostEvaluator`] derives, once per loop set, the LQG quantities every
//! evaluation needs ([`LoopDerived`]), then prices any number of schedules
//! against that cache.
//!
//! # Per-loop cost
//!
//! With `S`, `F`, `M`, `N` from [`LoopDerived`] and the loop's gap sequence
//! `g` over a schedule of period `T`:
//!
//! | Case | Contribution |
//! |---|---|
//! | served at least once | `tr(SW) + tr(FM) + (1/T) Σᵢ tr(M Z[gᵢ])` |
//! | never served, `ρ(A) < 1` | `tr(SW) + tr(FM) + tr(XM)` |
//! | never served, `ρ(A) ≥ 1` | whole system costs `max_cost` |
//!
//! where `Z[0] = 0`, `Z[t] = A Z[t-1] Aᵀ + N` is the error covariance built up
//! while the loop waits, and `X` is its limit (`X = A X Aᵀ + N`).
//!
//! The third row short-circuits: the evaluation stops at that loop and any
//! partial sum from earlier loops is discarded.
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | Per-loop storage | `Vec<LoopDerived>` indexed by `loop_id - 1` |
//! | `Z[t]` scratch | local `Vec<DMatrix>` sized `max(gap) + 1`, dropped per call |
//! | Free-running `X` | solved at construction (schedule-independent) |
//! | Thread safety | `Send + Sync`, `evaluate(&self)` never mutates |
//!
//! # Example
//! ```rust
//! use ncs_cost::cost::CostEvaluator;
//! use ncs_cost::model::LoopModel;
//!
//! let plant = LoopModel::scalar(0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
//! let evaluator = CostEvaluator::new(vec![plant.clone(), plant], 1).unwrap();
//! let alternating = evaluator.evaluate(&[0, 1]).unwrap();
//! let starving = evaluator.evaluate(&[0, 0]).unwrap();
//! assert!(alternating < starving);
//! ```

pub mod riccati;

use nalgebra::DMatrix;
use tracing::{debug, info};

use crate::allocation::AllocationTable;
use crate::error::{ConstructionError, RiccatiProblem, ScheduleError};
use crate::gaps::gaps_unchecked;
use crate::model::LoopModel;

use riccati::{invert, solve_dare, solve_discrete_lyapunov, spectral_radius};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Cost reported for a schedule that never serves an open-loop unstable loop.
pub const DEFAULT_MAX_COST: f64 = 25_000.0;

// ── LoopDerived ───────────────────────────────────────────────────────────────

/// Quantities derived once from a [`LoopModel`].
#[derive(Debug, Clone)]
pub struct LoopDerived {
    /// Control Riccati solution.
    pub s: DMatrix<f64>,
    /// Estimation Riccati solution (a-priori error covariance).
    pub p: DMatrix<f64>,
    /// Control gain `(BᵀSB + R)⁻¹BᵀSA`.
    pub l: DMatrix<f64>,
    /// Kalman gain `PCᵀ(CPCᵀ + V)⁻¹`.
    pub k: DMatrix<f64>,
    /// A-posteriori error covariance `(I − KC)P`.
    pub f: DMatrix<f64>,
    /// Cost coupling `Lᵀ(BᵀSB + R)L`.
    pub m: DMatrix<f64>,
    /// Noise injected per step while unserved, `KCP`.
    pub n: DMatrix<f64>,
    /// Spectral radius of the open-loop `A`.
    pub spectral_radius: f64,
    /// Solution of `X = AXAᵀ + N`; `None` when `A` is not stable.
    pub free_running: Option<DMatrix<f64>>,
    /// `tr(SW) + tr(FM)`, the part of the cost every case shares.
    pub base_cost: f64,
}

impl LoopDerived {
    /// Solve both Riccati equations and derive gains for `model`.
    ///
    /// `loop_id` is only used to label errors.
    pub fn derive(loop_id: usize, model: &LoopModel) -> Result<Self, ConstructionError> {
        let (a, b, c) = (model.a(), model.b(), model.c());
        let n_states = a.nrows();

        let control = |source| ConstructionError::Riccati {
            loop_id,
            problem: RiccatiProblem::Control,
            source,
        };
        let estimation = |source| ConstructionError::Riccati {
            loop_id,
            problem: RiccatiProblem::Estimation,
            source,
        };

        // ── Regulator ─────────────────────────────────────────────────────────
        let s = solve_dare(a, b, model.q(), model.r()).map_err(control)?;
        let bt_s = b.transpose() * &s;
        let gram = &bt_s * b + model.r();
        let gram_inv = invert(&gram, "BᵀSB + R").map_err(control)?;
        let l = gram_inv * &bt_s * a;
        let m = l.transpose() * &gram * &l;

        // ── Estimator ─────────────────────────────────────────────────────────
        let p = solve_dare(&a.transpose(), &c.transpose(), model.w(), model.v())
            .map_err(estimation)?;
        let innovation = c * &p * c.transpose() + model.v();
        let innovation_inv = invert(&innovation, "CPCᵀ + V").map_err(estimation)?;
        let k = &p * c.transpose() * innovation_inv;
        let f = (DMatrix::identity(n_states, n_states) - &k * c) * &p;
        let n = &k * c * &p;

        // ── Free-running covariance ───────────────────────────────────────────
        let spectral_radius =
            spectral_radius(a).map_err(|source| ConstructionError::Spectrum { loop_id, source })?;
        let free_running = if spectral_radius < 1.0 {
            Some(
                solve_discrete_lyapunov(a, &n)
                    .map_err(|source| ConstructionError::Lyapunov { loop_id, source })?,
            )
        } else {
            None
        };

        let base_cost = (&s * model.w()).trace() + (&f * &m).trace();

        debug!(
            loop_id,
            spectral_radius,
            stable = free_running.is_some(),
            base_cost,
            "Derived loop quantities"
        );

        Ok(Self {
            s,
            p,
            l,
            k,
            f,
            m,
            n,
            spectral_radius,
            free_running,
            base_cost,
        })
    }

    /// Returns `true` when the open-loop `A` has spectral radius below one.
    pub fn is_open_loop_stable(&self) -> bool {
        self.free_running.is_some()
    }
}

// ── Cost breakdown ────────────────────────────────────────────────────────────

/// One loop's share of a schedule's cost.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCost {
    /// The loop holds a channel at least once per period.
    Served { loop_id: usize, cost: f64 },
    /// Never served, open-loop stable: runs free on its estimator.
    Idle { loop_id: usize, cost: f64 },
    /// Never served and open-loop unstable.  Evaluation stopped here.
    Unstable { loop_id: usize },
}

impl LoopCost {
    pub fn loop_id(&self) -> usize {
        match self {
            LoopCost::Served { loop_id, .. }
            | LoopCost::Idle { loop_id, .. }
            | LoopCost::Unstable { loop_id } => *loop_id,
        }
    }

    /// The loop's contribution, or `None` for the unstable short-circuit.
    pub fn cost(&self) -> Option<f64> {
        match self {
            LoopCost::Served { cost, .. } | LoopCost::Idle { cost, .. } => Some(*cost),
            LoopCost::Unstable { .. } => None,
        }
    }
}

/// Per-loop costs of one schedule, in loop-id order.
///
/// If the last entry is [`LoopCost::Unstable`] the loops after it were not
/// evaluated and [`total`](Self::total) is `max_cost`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub loops: Vec<LoopCost>,
    pub max_cost: f64,
}

impl CostBreakdown {
    /// Returns `true` if the short-circuit fired.
    pub fn is_capped(&self) -> bool {
        matches!(self.loops.last(), Some(LoopCost::Unstable { .. }))
    }

    /// Total system cost.
    pub fn total(&self) -> f64 {
        if self.is_capped() {
            return self.max_cost;
        }
        self.loops.iter().filter_map(LoopCost::cost).sum()
    }
}

// ── ScheduleCost ──────────────────────────────────────────────────────────────

/// A scalar cost over complete schedules.
///
/// This is the seam between the cost engine and anything that searches over
/// schedules (see [`SchedulingEpisode`](crate::episode::SchedulingEpisode)).
pub trait ScheduleCost {
    /// Cost of `schedule`, a sequence of allocation indices.
    fn cost(&self, schedule: &[usize]) -> Result<f64, ScheduleError>;

    /// Number of distinct allocation indices a schedule may use.
    fn action_count(&self) -> usize;

    /// Cost reported for the worst case.
    fn max_cost(&self) -> f64;
}

// ── CostEvaluator ─────────────────────────────────────────────────────────────

/// Prices periodic schedules for a fixed loop set.
///
/// Built once; afterwards immutable and safe to share across threads.
#[derive(Debug, Clone)]
pub struct CostEvaluator {
    models: Vec<LoopModel>,
    derived: Vec<LoopDerived>,
    table: AllocationTable,
    max_cost: f64,
}

impl CostEvaluator {
    /// Build an evaluator with [`DEFAULT_MAX_COST`].
    ///
    /// # Errors
    /// See [`with_max_cost`](Self::with_max_cost).
    pub fn new(models: Vec<LoopModel>, n_channels: usize) -> Result<Self, ConstructionError> {
        Self::with_max_cost(models, n_channels, DEFAULT_MAX_COST)
    }

    /// Build an evaluator with a custom `max_cost`.
    ///
    /// Loop ids are assigned in order: `models[0]` is loop 1.
    ///
    /// # Errors
    /// * [`ConstructionError::NoLoops`] – `models` is empty.
    /// * [`ConstructionError::Allocation`] – `n_channels` not in
    ///   `1..=models.len()`.
    /// * [`ConstructionError::Riccati`] / [`ConstructionError::Lyapunov`] /
    ///   [`ConstructionError::Spectrum`] – a solver failed for some loop.
    pub fn with_max_cost(
        models: Vec<LoopModel>,
        n_channels: usize,
        max_cost: f64,
    ) -> Result<Self, ConstructionError> {
        if models.is_empty() {
            return Err(ConstructionError::NoLoops);
        }
        let table = AllocationTable::enumerate(models.len(), n_channels)?;

        let derived = models
            .iter()
            .enumerate()
            .map(|(i, model)| LoopDerived::derive(i + 1, model))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            loops = models.len(),
            channels = n_channels,
            allocations = table.len(),
            unstable = derived.iter().filter(|d| !d.is_open_loop_stable()).count(),
            max_cost,
            "Cost evaluator ready"
        );

        Ok(Self {
            models,
            derived,
            table,
            max_cost,
        })
    }

    pub fn n_loops(&self) -> usize {
        self.models.len()
    }

    pub fn n_channels(&self) -> usize {
        self.table.n_channels()
    }

    pub fn max_cost(&self) -> f64 {
        self.max_cost
    }

    /// The allocation table schedules index into.
    pub fn table(&self) -> &AllocationTable {
        &self.table
    }

    /// Model of `loop_id` (1-based).
    pub fn model(&self, loop_id: usize) -> Option<&LoopModel> {
        loop_id.checked_sub(1).and_then(|i| self.models.get(i))
    }

    /// Cached derived quantities of `loop_id` (1-based).
    pub fn derived(&self, loop_id: usize) -> Option<&LoopDerived> {
        loop_id.checked_sub(1).and_then(|i| self.derived.get(i))
    }

    /// Total cost of `schedule`.
    ///
    /// # Errors
    /// [`ScheduleError::Empty`] or [`ScheduleError::OutOfRange`]; the schedule
    /// is validated before any cost is computed.
    pub fn evaluate(&self, schedule: &[usize]) -> Result<f64, ScheduleError> {
        self.loop_costs(schedule).map(|b| b.total())
    }

    /// Per-loop contributions of `schedule`.
    ///
    /// Stops at the first never-served unstable loop.
    pub fn loop_costs(&self, schedule: &[usize]) -> Result<CostBreakdown, ScheduleError> {
        self.table.validate(schedule)?;

        let mut loops = Vec::with_capacity(self.derived.len());
        for (i, (model, derived)) in self.models.iter().zip(&self.derived).enumerate() {
            let loop_id = i + 1;
            let gaps = gaps_unchecked(schedule, loop_id, &self.table);

            let entry = match (gaps.served_gaps(), &derived.free_running) {
                (Some(g), _) => LoopCost::Served {
                    loop_id,
                    cost: derived.base_cost + Self::waiting_cost(model, derived, g),
                },
                (None, Some(x)) => LoopCost::Idle {
                    loop_id,
                    cost: derived.base_cost + (x * &derived.m).trace(),
                },
                (None, None) => {
                    debug!(
                        loop_id,
                        spectral_radius = derived.spectral_radius,
                        max_cost = self.max_cost,
                        "Unstable loop never served, capping cost"
                    );
                    loops.push(LoopCost::Unstable { loop_id });
                    break;
                }
            };
            loops.push(entry);
        }

        Ok(CostBreakdown {
            loops,
            max_cost: self.max_cost,
        })
    }

    /// `(1/T) Σᵢ tr(M Z[gᵢ])` for a served loop.
    fn waiting_cost(model: &LoopModel, derived: &LoopDerived, gaps: &[usize]) -> f64 {
        let a = model.a();
        let a_t = a.transpose();
        let largest = gaps.iter().copied().max().unwrap_or(0);

        let mut z: Vec<DMatrix<f64>> = Vec::with_capacity(largest + 1);
        z.push(DMatrix::zeros(derived.n.nrows(), derived.n.ncols()));
        for t in 1..=largest {
            let next = a * &z[t - 1] * &a_t + &derived.n;
            z.push(next);
        }

        let total: f64 = gaps.iter().map(|&g| (&derived.m * &z[g]).trace()).sum();
        total / gaps.len() as f64
    }
}

impl ScheduleCost for CostEvaluator {
    fn cost(&self, schedule: &[usize]) -> Result<f64, ScheduleError> {
        self.evaluate(schedule)
    }

    fn action_count(&self) -> usize {
        self.table.len()
    }

    fn max_cost(&self) -> f64 {
        self.max_cost
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;

    fn scalar(a: f64) -> LoopModel {
        LoopModel::scalar(a, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0)
    }

    fn two_state(a: [f64; 4]) -> LoopModel {
        LoopModel::new(
            DMatrix::from_row_slice(2, 2, &a),
            DMatrix::from_row_slice(2, 1, &[0.0, 1.0]),
            DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
            DMatrix::identity(2, 2),
            DMatrix::from_element(1, 1, 0.5),
            DMatrix::from_row_slice(2, 2, &[1.0, 0.1, 0.1, 0.8]),
            DMatrix::from_element(1, 1, 0.3),
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tol = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn scalar_loop_derived_values_match_closed_form() {
        let evaluator = CostEvaluator::new(vec![scalar(0.5)], 1).unwrap();
        let d = evaluator.derived(1).unwrap();

        // Both Riccati equations reduce to x² − 0.25x − 1 = 0
        let x = (0.25 + 4.0625_f64.sqrt()) / 2.0;
        assert_close(d.s[(0, 0)], x);
        assert_close(d.p[(0, 0)], x);
        assert_close(d.l[(0, 0)], 0.5 * x / (x + 1.0));
        assert_close(d.m[(0, 0)], 0.25 * x * x / (x + 1.0));
        assert_close(d.k[(0, 0)], x / (x + 1.0));
        assert_close(d.f[(0, 0)], x / (x + 1.0));
        assert_close(d.n[(0, 0)], x * x / (x + 1.0));
        assert!(d.is_open_loop_stable());
        assert_close(d.spectral_radius, 0.5);
    }

    #[test]
    fn empty_loop_set_is_rejected() {
        assert_eq!(
            CostEvaluator::new(vec![], 1).unwrap_err(),
            ConstructionError::NoLoops
        );
    }

    #[test]
    fn too_many_channels_is_rejected() {
        let result = CostEvaluator::new(vec![scalar(0.5)], 2);
        assert!(matches!(result, Err(ConstructionError::Allocation(_))));
    }

    #[test]
    fn unstabilizable_loop_fails_construction() {
        // B = 0 cannot stabilise A = 1.5
        let bad = LoopModel::scalar(1.5, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        let result = CostEvaluator::new(vec![scalar(0.5), bad], 1);
        match result {
            Err(ConstructionError::Riccati {
                loop_id, problem, ..
            }) => {
                assert_eq!(loop_id, 2);
                assert_eq!(problem, RiccatiProblem::Control);
            }
            other => panic!("expected control Riccati failure, got {other:?}"),
        }
    }

    #[test]
    fn undetectable_loop_fails_estimation() {
        let bad = LoopModel::scalar(1.5, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0);
        let result = CostEvaluator::new(vec![bad], 1);
        assert!(matches!(
            result,
            Err(ConstructionError::Riccati {
                problem: RiccatiProblem::Estimation,
                source: SolverError::NonFinite { .. } | SolverError::NotConverged { .. },
                ..
            })
        ));
    }

    #[test]
    fn unstable_loop_has_no_free_running_covariance() {
        let evaluator = CostEvaluator::new(vec![scalar(1.5)], 1).unwrap();
        let d = evaluator.derived(1).unwrap();
        assert!(!d.is_open_loop_stable());
        assert!(d.free_running.is_none());
        assert!(evaluator.derived(0).is_none());
        assert!(evaluator.derived(2).is_none());
    }

    // ── evaluate: regression fixture ──────────────────────────────────────────

    #[test]
    fn two_identical_scalar_loops_alternating() {
        let evaluator = CostEvaluator::new(vec![scalar(0.5), scalar(0.5)], 1).unwrap();
        assert_eq!(evaluator.table().subset(0), Some(&[1][..]));
        assert_eq!(evaluator.table().subset(1), Some(&[2][..]));

        let x = (0.25 + 4.0625_f64.sqrt()) / 2.0;
        let m = 0.25 * x * x / (x + 1.0);
        let f = x / (x + 1.0);
        let n = x * x / (x + 1.0);
        // gaps [0, 1] (or [1, 0]): Z[0] = 0, Z[1] = N
        let per_loop = x + f * m + (m * n) / 2.0;

        let breakdown = evaluator.loop_costs(&[0, 1]).unwrap();
        assert_eq!(breakdown.loops.len(), 2);
        let c1 = breakdown.loops[0].cost().unwrap();
        let c2 = breakdown.loops[1].cost().unwrap();
        assert_close(c1, per_loop);
        assert_close(c2, per_loop);

        assert_close(evaluator.evaluate(&[0, 1]).unwrap(), 2.0 * per_loop);
    }

    // ── evaluate: never-served policies ───────────────────────────────────────

    #[test]
    fn never_served_stable_loop_uses_lyapunov_cost() {
        let evaluator = CostEvaluator::new(vec![scalar(0.5), scalar(0.5)], 1).unwrap();
        let breakdown = evaluator.loop_costs(&[0, 0]).unwrap();

        let x = (0.25 + 4.0625_f64.sqrt()) / 2.0;
        let m = 0.25 * x * x / (x + 1.0);
        let f = x / (x + 1.0);
        let n = x * x / (x + 1.0);
        let free = n / (1.0 - 0.25);

        assert!(matches!(breakdown.loops[1], LoopCost::Idle { loop_id: 2, .. }));
        assert_close(breakdown.loops[1].cost().unwrap(), x + f * m + free * m);
        // Loop 1 is always served: zero waiting cost
        assert_close(breakdown.loops[0].cost().unwrap(), x + f * m);
    }

    #[test]
    fn idle_cost_bounds_every_served_cost() {
        let evaluator =
            CostEvaluator::new(vec![two_state([0.8, 0.2, 0.0, 0.7]), scalar(0.3)], 1).unwrap();
        let idle = evaluator.loop_costs(&[1, 1, 1]).unwrap().loops[0]
            .cost()
            .unwrap();
        for schedule in [[0, 1, 1], [0, 0, 1], [1, 0, 1], [0, 0, 0]] {
            let served = evaluator.loop_costs(&schedule).unwrap().loops[0]
                .cost()
                .unwrap();
            assert!(served <= idle, "{schedule:?}: {served} > {idle}");
        }
    }

    #[test]
    fn unserved_unstable_loop_returns_exactly_max_cost() {
        let evaluator =
            CostEvaluator::with_max_cost(vec![scalar(0.5), scalar(1.5)], 1, 1234.5).unwrap();
        // Loop 2 (unstable) never served
        assert_eq!(evaluator.evaluate(&[0, 0, 0]).unwrap(), 1234.5);

        let breakdown = evaluator.loop_costs(&[0, 0, 0]).unwrap();
        assert!(breakdown.is_capped());
        assert_eq!(breakdown.loops.last(), Some(&LoopCost::Unstable { loop_id: 2 }));
    }

    #[test]
    fn short_circuit_skips_later_loops() {
        let evaluator =
            CostEvaluator::new(vec![scalar(2.0), scalar(0.5), scalar(0.9)], 1).unwrap();
        let breakdown = evaluator.loop_costs(&[1, 2]).unwrap();
        assert_eq!(breakdown.loops, vec![LoopCost::Unstable { loop_id: 1 }]);
        assert_eq!(breakdown.total(), DEFAULT_MAX_COST);
    }

    #[test]
    fn served_unstable_loop_is_priced_normally() {
        let evaluator = CostEvaluator::new(vec![scalar(1.5), scalar(0.5)], 1).unwrap();
        let cost = evaluator.evaluate(&[0, 1]).unwrap();
        assert!(cost.is_finite());
        assert!(cost > 0.0);
        assert_ne!(cost, DEFAULT_MAX_COST);
    }

    // ── evaluate: monotonicity ────────────────────────────────────────────────

    #[test]
    fn shorter_gaps_never_cost_more() {
        let evaluator =
            CostEvaluator::new(vec![two_state([0.9, 0.3, 0.0, 0.8]), scalar(0.7)], 1).unwrap();
        // Loop 1 gaps: [0,1,2,3] vs [0,1,0,1], position-wise smaller
        let sparse = evaluator.loop_costs(&[0, 1, 1, 1]).unwrap();
        let dense = evaluator.loop_costs(&[0, 1, 0, 1]).unwrap();
        assert!(dense.loops[0].cost().unwrap() <= sparse.loops[0].cost().unwrap());
        // Loop 2 is served less in `dense`
        assert!(dense.loops[1].cost().unwrap() >= sparse.loops[1].cost().unwrap());
    }

    #[test]
    fn serving_everyone_every_step_is_cheapest() {
        // Two channels for two loops: the only allocation serves both
        let loops = vec![two_state([0.9, 0.3, 0.0, 0.8]), scalar(1.2)];
        let all = CostEvaluator::new(loops.clone(), 2).unwrap();
        let shared = CostEvaluator::new(loops, 1).unwrap();

        let full = all.evaluate(&[0, 0]).unwrap();
        for schedule in [vec![0, 1], vec![1, 0], vec![0, 1, 1], vec![0, 0]] {
            assert!(full <= shared.evaluate(&schedule).unwrap());
        }
    }

    // ── evaluate: errors, determinism, concurrency ────────────────────────────

    #[test]
    fn invalid_schedules_are_rejected_before_costing() {
        let evaluator = CostEvaluator::new(vec![scalar(2.0), scalar(0.5)], 1).unwrap();
        // Would short-circuit on loop 1, but the bad index must win
        assert_eq!(
            evaluator.evaluate(&[1, 5]).unwrap_err(),
            ScheduleError::OutOfRange {
                position: 1,
                index: 5,
                table_size: 2
            }
        );
        assert_eq!(evaluator.evaluate(&[]).unwrap_err(), ScheduleError::Empty);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let evaluator = CostEvaluator::new(
            vec![two_state([0.6, 0.2, -0.1, 0.9]), scalar(0.4), scalar(1.1)],
            2,
        )
        .unwrap();
        let schedule = [0, 2, 1, 1, 0, 2];
        let first = evaluator.evaluate(&schedule).unwrap();
        let second = evaluator.evaluate(&schedule).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn concurrent_evaluation_matches_sequential() {
        let evaluator = CostEvaluator::new(
            vec![two_state([0.6, 0.2, -0.1, 0.9]), scalar(0.4), scalar(1.1)],
            1,
        )
        .unwrap();
        let schedules: Vec<Vec<usize>> = vec![
            vec![0, 1, 2],
            vec![2, 2, 0, 1],
            vec![0, 0, 0],
            vec![1, 2, 1, 2, 0],
        ];
        let sequential: Vec<f64> = schedules
            .iter()
            .map(|s| evaluator.evaluate(s).unwrap())
            .collect();

        let shared = &evaluator;
        let parallel: Vec<f64> = std::thread::scope(|scope| {
            let handles: Vec<_> = schedules
                .iter()
                .map(|s| scope.spawn(move || shared.evaluate(s).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn schedule_cost_trait_delegates() {
        let evaluator = CostEvaluator::new(vec![scalar(0.5), scalar(0.5)], 1).unwrap();
        let as_trait: &dyn ScheduleCost = &evaluator;
        assert_eq!(as_trait.action_count(), 2);
        assert_eq!(as_trait.max_cost(), DEFAULT_MAX_COST);
        assert_eq!(
            as_trait.cost(&[0, 1]).unwrap(),
            evaluator.evaluate(&[0, 1]).unwrap()
        );
    }
}
