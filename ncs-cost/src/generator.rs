/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Seeded random loop sets for experiments and tests.
//!
//! All sampling goes through one [`ChaCha8Rng`] owned by the
//! [`SystemGenerator`], so the same seed always yields the same loop set and
//! generators on different threads never interfere.
//!
//! * `A`: entries `U[0, 1)`, redrawn until its stability matches the request.
//! * `B`, `C`: entries `U[0, 1)`.
//! * `Q`, `R`, `W`, `V`: `½(M + Mᵀ) + dim·I` with `M` uniform, which is
//!   symmetric and strictly diagonally dominant, hence positive definite.

use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::debug;

use crate::cost::riccati::is_schur_stable;
use crate::error::{ConstructionError, SolverError};
use crate::model::{Dimensions, LoopModel};

/// Draws per state matrix before giving up.
pub const DEFAULT_MAX_DRAWS: usize = 9_999;

/// Errors raised by [`SystemGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// A dimension is zero.
    #[error("dimensions must be non-zero, got {0:?}")]
    ZeroDimension(Dimensions),

    /// No state matrix with the requested stability was drawn.
    #[error("loop {loop_id}: no state matrix with stable = {stable} found in {draws} draws")]
    Exhausted {
        loop_id: usize,
        stable: bool,
        draws: usize,
    },

    /// Stability of a drawn matrix could not be decided.
    #[error("loop {loop_id}: {source}")]
    Spectrum {
        loop_id: usize,
        #[source]
        source: SolverError,
    },

    /// The assembled model was rejected.
    #[error(transparent)]
    Model(#[from] ConstructionError),
}

/// Random loop-set generator with an explicit RNG.
#[derive(Debug, Clone)]
pub struct SystemGenerator {
    rng: ChaCha8Rng,
    max_draws: usize,
}

impl SystemGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }

    /// Override the per-matrix draw budget.
    pub fn with_max_draws(mut self, max_draws: usize) -> Self {
        self.max_draws = max_draws;
        self
    }

    /// Generate one loop per entry of `stable`; `stable[i]` selects whether
    /// loop `i + 1` is open-loop stable.
    ///
    /// # Errors
    /// * [`GeneratorError::ZeroDimension`] – any of `n`, `m`, `p` is zero.
    /// * [`GeneratorError::Exhausted`] – the draw budget ran out.
    pub fn generate(
        &mut self,
        dims: Dimensions,
        stable: &[bool],
    ) -> Result<Vec<LoopModel>, GeneratorError> {
        if dims.n == 0 || dims.m == 0 || dims.p == 0 {
            return Err(GeneratorError::ZeroDimension(dims));
        }

        stable
            .iter()
            .enumerate()
            .map(|(i, &want_stable)| {
                let loop_id = i + 1;
                let a = self.state_matrix(loop_id, dims.n, want_stable)?;
                let b = self.uniform(dims.n, dims.m);
                let c = self.uniform(dims.p, dims.n);
                let q = self.spd(dims.n);
                let r = self.spd(dims.m);
                let w = self.spd(dims.n);
                let v = self.spd(dims.p);
                LoopModel::new(a, b, c, q, r, w, v)
                    .map_err(|e| GeneratorError::Model(e.for_loop(loop_id)))
            })
            .collect()
    }

    fn uniform(&mut self, rows: usize, cols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(rows, cols, |_, _| self.rng.gen::<f64>())
    }

    fn spd(&mut self, dim: usize) -> DMatrix<f64> {
        let m = self.uniform(dim, dim);
        (&m + m.transpose()) * 0.5 + DMatrix::identity(dim, dim) * dim as f64
    }

    fn state_matrix(
        &mut self,
        loop_id: usize,
        n: usize,
        want_stable: bool,
    ) -> Result<DMatrix<f64>, GeneratorError> {
        for draw in 1..=self.max_draws {
            let a = self.uniform(n, n);
            let stable = is_schur_stable(&a)
                .map_err(|source| GeneratorError::Spectrum { loop_id, source })?;
            if stable == want_stable {
                debug!(loop_id, draw, stable, "Drew state matrix");
                return Ok(a);
            }
        }
        Err(GeneratorError::Exhausted {
            loop_id,
            stable: want_stable,
            draws: self.max_draws,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
