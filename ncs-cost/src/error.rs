/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the cost engine.
//!
//! Four enums model the failure layers:
//!
//! * [`SolverError`] – a matrix equation (Riccati, Lyapunov) or an inverse
//!   could not be solved.  Low-level, carries iteration counts.
//! * [`AllocationError`] – the `(n_loops, n_channels)` pair cannot produce an
//!   allocation table.
//! * [`ConstructionError`] – a loop set was rejected while building a
//!   [`CostEvaluator`](crate::cost::CostEvaluator).
//! * [`ScheduleError`] – a schedule handed to the analyzer or evaluator is
//!   malformed.  No partial result is ever returned alongside it.
//!
//! The "unstable loop never served" outcome is deliberately **not** an error:
//! it is a cost policy and surfaces as `max_cost`.

use thiserror::Error;

// ── Numerical solvers ─────────────────────────────────────────────────────────

/// Failure of one of the dense matrix solvers in
/// [`cost::riccati`](crate::cost::riccati).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// A matrix that must be inverted was singular to working precision.
    #[error("singular matrix encountered while computing {context}")]
    Singular { context: &'static str },

    /// The iteration did not reach the tolerance within the iteration cap.
    ///
    /// For the Riccati doubling this almost always means the pair is not
    /// stabilizable (control) or not detectable (estimation).
    #[error("no convergence after {iterations} iterations (last relative change {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },

    /// An iterate contained NaN or infinity.
    #[error("non-finite value after {iterations} iterations")]
    NonFinite { iterations: usize },

    /// The Schur decomposition used for eigenvalues failed to converge.
    #[error("eigenvalue decomposition failed to converge")]
    Eigen,
}

// ── Allocation table ──────────────────────────────────────────────────────────

/// Errors raised while enumerating channel allocations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// `n_channels` must satisfy `1 <= n_channels <= n_loops`.
    #[error("cannot allocate {n_channels} channel(s) among {n_loops} loop(s): need 1 <= channels <= loops")]
    DegenerateConfiguration { n_loops: usize, n_channels: usize },

    /// `C(n_loops, n_channels)` does not fit in `u64`.
    #[error("allocation count C({n_loops}, {n_channels}) overflows")]
    Overflow { n_loops: usize, n_channels: usize },

    /// The table would exceed the configured entry limit.
    #[error("allocation table would hold {entries} entries (limit {limit})")]
    TooLarge { entries: u64, limit: u64 },
}

// ── Evaluator construction ────────────────────────────────────────────────────

/// Which of the two Riccati problems failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiccatiProblem {
    /// Regulator problem on `(A, B, Q, R)`.
    Control,
    /// Dual estimator problem on `(Aᵀ, Cᵀ, W, V)`.
    Estimation,
}

impl std::fmt::Display for RiccatiProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiccatiProblem::Control => write!(f, "control"),
            RiccatiProblem::Estimation => write!(f, "estimation"),
        }
    }
}

/// Error returned while validating a [`LoopModel`](crate::model::LoopModel)
/// or building a [`CostEvaluator`](crate::cost::CostEvaluator).
///
/// `loop_id` is 1-based everywhere; `0` means the model was validated on its
/// own, before being placed in a loop set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    /// No loop models were supplied.
    #[error("loop set is empty")]
    NoLoops,

    /// A matrix has zero rows or columns.
    #[error("loop {loop_id}: matrix {matrix} is empty")]
    EmptyMatrix { loop_id: usize, matrix: &'static str },

    /// A matrix that must be square is not.
    #[error("loop {loop_id}: matrix {matrix} must be square, got {rows}x{cols}")]
    NotSquare {
        loop_id: usize,
        matrix: &'static str,
        rows: usize,
        cols: usize,
    },

    /// A matrix disagrees with the `(n, m, p)` implied by `A`, `B` and `C`.
    #[error("loop {loop_id}: matrix {matrix} has shape {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        loop_id: usize,
        matrix: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A row-major matrix literal has rows of different lengths.
    #[error("loop {loop_id}: matrix {matrix} has ragged rows")]
    RaggedMatrix { loop_id: usize, matrix: &'static str },

    /// The channel count does not fit the loop count.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// A Riccati equation could not be solved for this loop.
    #[error("loop {loop_id}: {problem} Riccati equation: {source}")]
    Riccati {
        loop_id: usize,
        problem: RiccatiProblem,
        #[source]
        source: SolverError,
    },

    /// The free-running Lyapunov equation could not be solved for this loop.
    #[error("loop {loop_id}: Lyapunov equation: {source}")]
    Lyapunov {
        loop_id: usize,
        #[source]
        source: SolverError,
    },

    /// The spectral radius of `A` could not be computed.
    #[error("loop {loop_id}: spectral radius: {source}")]
    Spectrum {
        loop_id: usize,
        #[source]
        source: SolverError,
    },
}

impl ConstructionError {
    /// Attach a loop id to an error produced by a standalone model check.
    pub(crate) fn for_loop(self, id: usize) -> Self {
        match self {
            ConstructionError::EmptyMatrix { matrix, .. } => ConstructionError::EmptyMatrix {
                loop_id: id,
                matrix,
            },
            ConstructionError::NotSquare {
                matrix, rows, cols, ..
            } => ConstructionError::NotSquare {
                loop_id: id,
                matrix,
                rows,
                cols,
            },
            ConstructionError::DimensionMismatch {
                matrix,
                expected,
                actual,
                ..
            } => ConstructionError::DimensionMismatch {
                loop_id: id,
                matrix,
                expected,
                actual,
            },
            ConstructionError::RaggedMatrix { matrix, .. } => ConstructionError::RaggedMatrix {
                loop_id: id,
                matrix,
            },
            other => other,
        }
    }
}

// ── Schedules ─────────────────────────────────────────────────────────────────

/// Errors raised for a malformed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The schedule has period zero.
    #[error("schedule is empty")]
    Empty,

    /// An entry is not a valid allocation-table index.
    #[error("schedule entry {position} is {index}, outside allocation table of size {table_size}")]
    OutOfRange {
        position: usize,
        index: usize,
        table_size: usize,
    },

    /// The queried loop id is not in `1..=n_loops`.
    #[error("loop {loop_id} does not exist (loops are 1..={n_loops})")]
    UnknownLoop { loop_id: usize, n_loops: usize },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
