/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Static description of one control loop.
//!
//! A loop is the discrete-time plant
//!
//! ```text
//! x[k+1] = A x[k] + B u[k] + w[k],    w ~ N(0, W)
//! y[k]   = C x[k] + v[k],             v ~ N(0, V)
//! ```
//!
//! with quadratic stage cost `xᵀQx + uᵀRu`.  The model is validated once on
//! construction and is immutable afterwards.

use nalgebra::DMatrix;

use crate::error::ConstructionError;

// ── Dimensions ────────────────────────────────────────────────────────────────

/// State (`n`), input (`m`) and output (`p`) dimensions of a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub n: usize,
    pub m: usize,
    pub p: usize,
}

// ── LoopModel ─────────────────────────────────────────────────────────────────

/// Plant, weighting and noise matrices of one loop.
///
/// | Matrix | Shape | Meaning |
/// |---|---|---|
/// | `A` | n×n | state transition |
/// | `B` | n×m | input |
/// | `C` | p×n | output |
/// | `Q` | n×n | state cost (SPD) |
/// | `R` | m×m | input cost (SPD) |
/// | `W` | n×n | process-noise covariance (SPD) |
/// | `V` | p×p | measurement-noise covariance (SPD) |
#[derive(Debug, Clone, PartialEq)]
pub struct LoopModel {
    a: DMatrix<f64>,
    b: DMatrix<f64>,
    c: DMatrix<f64>,
    q: DMatrix<f64>,
    r: DMatrix<f64>,
    w: DMatrix<f64>,
    v: DMatrix<f64>,
}

impl LoopModel {
    /// Validate shapes and build the model.
    ///
    /// `n`, `m` and `p` are taken from `A`, `B` and `C`; every other matrix
    /// must agree with them.  Definiteness is not checked here: a weight that
    /// is not positive definite shows up as a Riccati failure when the
    /// evaluator is built.
    ///
    /// # Errors
    /// [`ConstructionError::EmptyMatrix`], [`ConstructionError::NotSquare`] or
    /// [`ConstructionError::DimensionMismatch`], with `loop_id == 0`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        a: DMatrix<f64>,
        b: DMatrix<f64>,
        c: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
        w: DMatrix<f64>,
        v: DMatrix<f64>,
    ) -> Result<Self, ConstructionError> {
        for (name, mat) in [
            ("A", &a),
            ("B", &b),
            ("C", &c),
            ("Q", &q),
            ("R", &r),
            ("W", &w),
            ("V", &v),
        ] {
            if mat.is_empty() {
                return Err(ConstructionError::EmptyMatrix {
                    loop_id: 0,
                    matrix: name,
                });
            }
        }

        if !a.is_square() {
            return Err(ConstructionError::NotSquare {
                loop_id: 0,
                matrix: "A",
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }

        let n = a.nrows();
        let m = b.ncols();
        let p = c.nrows();

        let expected = [
            ("B", &b, (n, m)),
            ("C", &c, (p, n)),
            ("Q", &q, (n, n)),
            ("R", &r, (m, m)),
            ("W", &w, (n, n)),
            ("V", &v, (p, p)),
        ];
        for (name, mat, shape) in expected {
            if mat.shape() != shape {
                return Err(ConstructionError::DimensionMismatch {
                    loop_id: 0,
                    matrix: name,
                    expected: shape,
                    actual: mat.shape(),
                });
            }
        }

        Ok(Self {
            a,
            b,
            c,
            q,
            r,
            w,
            v,
        })
    }

    /// Scalar loop (`n = m = p = 1`); handy for tests and examples.
    #[allow(clippy::too_many_arguments)]
    pub fn scalar(a: f64, b: f64, c: f64, q: f64, r: f64, w: f64, v: f64) -> Self {
        let s = |x: f64| DMatrix::from_element(1, 1, x);
        Self {
            a: s(a),
            b: s(b),
            c: s(c),
            q: s(q),
            r: s(r),
            w: s(w),
            v: s(v),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            n: self.a.nrows(),
            m: self.b.ncols(),
            p: self.c.nrows(),
        }
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    pub fn c(&self) -> &DMatrix<f64> {
        &self.c
    }

    pub fn q(&self) -> &DMatrix<f64> {
        &self.q
    }

    pub fn r(&self) -> &DMatrix<f64> {
        &self.r
    }

    pub fn w(&self) -> &DMatrix<f64> {
        &self.w
    }

    pub fn v(&self) -> &DMatrix<f64> {
        &self.v
    }
}

// ── Row-major conversion ──────────────────────────────────────────────────────

/// Build a matrix from row-major nested vectors (the YAML layout).
///
/// # Errors
/// [`ConstructionError::EmptyMatrix`] for no rows / no columns,
/// [`ConstructionError::RaggedMatrix`] when rows differ in length.
pub fn matrix_from_rows(
    rows: &[Vec<f64>],
    name: &'static str,
) -> Result<DMatrix<f64>, ConstructionError> {
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.is_empty() || ncols == 0 {
        return Err(ConstructionError::EmptyMatrix {
            loop_id: 0,
            matrix: name,
        });
    }
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(ConstructionError::RaggedMatrix {
            loop_id: 0,
            matrix: name,
        });
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        ncols,
        rows.iter().flatten().copied(),
    ))
}

/// Inverse of [`matrix_from_rows`].
pub fn matrix_to_rows(mat: &DMatrix<f64>) -> Vec<Vec<f64>> {
    mat.row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
