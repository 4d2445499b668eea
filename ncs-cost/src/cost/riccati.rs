/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Dense solvers for the steady-state matrix equations.
//!
//! # Discrete algebraic Riccati equation
//!
//! $$X = A^T X A - A^T X B (R + B^T X B)^{-1} B^T X A + Q$$
//!
//! solved with the structure-preserving doubling algorithm (Chu, Fan & Lin,
//! 2005).  Starting from `A₀ = A`, `G₀ = B R⁻¹ Bᵀ`, `H₀ = Q`:
//!
//! ```text
//! A_{k+1} = A_k (I + G_k H_k)⁻¹ A_k
//! G_{k+1} = G_k + A_k (I + G_k H_k)⁻¹ G_k A_kᵀ
//! H_{k+1} = H_k + A_kᵀ H_k (I + G_k H_k)⁻¹ A_k
//! ```
//!
//! `H_k → X` quadratically when `(A, B)` is stabilizable and `(A, Q)` is
//! detectable.  Only inverses and products are needed, which keeps the
//! solver on plain `nalgebra` without LAPACK.
//!
//! The estimator problem is the same equation on `(Aᵀ, Cᵀ, W, V)`.
//!
//! # Discrete Lyapunov equation
//!
//! `X = A X Aᵀ + N` for `ρ(A) < 1`, solved by Smith doubling:
//! `X_{k+1} = X_k + A_k X_k A_kᵀ`, `A_{k+1} = A_k²`.

use nalgebra::{DMatrix, Schur};

use crate::error::SolverError;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Iteration cap for both doubling schemes.  Each iteration doubles the
/// horizon, so 64 iterations cover 2⁶⁴ steps of the plain recursion.
const MAX_DOUBLINGS: usize = 64;

/// Relative change in Frobenius norm below which an iterate is accepted.
const TOLERANCE: f64 = 1e-12;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Inverse of `m`, or [`SolverError::Singular`] tagged with `context`.
pub fn invert(m: &DMatrix<f64>, context: &'static str) -> Result<DMatrix<f64>, SolverError> {
    m.clone()
        .try_inverse()
        .ok_or(SolverError::Singular { context })
}

fn symmetrize(m: &mut DMatrix<f64>) {
    let t = m.transpose();
    *m += t;
    *m *= 0.5;
}

fn relative_change(next: &DMatrix<f64>, prev: &DMatrix<f64>) -> f64 {
    let scale = next.norm().max(f64::MIN_POSITIVE);
    (next - prev).norm() / scale
}

fn all_finite(m: &DMatrix<f64>) -> bool {
    m.iter().all(|x| x.is_finite())
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Largest eigenvalue modulus of the square matrix `a`.
///
/// # Errors
/// [`SolverError::Eigen`] if the real Schur decomposition does not converge.
pub fn spectral_radius(a: &DMatrix<f64>) -> Result<f64, SolverError> {
    if a.nrows() == 1 {
        return Ok(a[(0, 0)].abs());
    }
    let schur = Schur::try_new(a.clone(), f64::EPSILON, 0).ok_or(SolverError::Eigen)?;
    Ok(schur
        .complex_eigenvalues()
        .iter()
        .map(|z| z.norm())
        .fold(0.0, f64::max))
}

/// Returns `true` when every eigenvalue of `a` lies strictly inside the unit
/// circle.
pub fn is_schur_stable(a: &DMatrix<f64>) -> Result<bool, SolverError> {
    spectral_radius(a).map(|rho| rho < 1.0)
}

/// Stabilizing solution of the discrete algebraic Riccati equation on
/// `(a, b, q, r)`.
///
/// # Errors
/// * [`SolverError::Singular`] – `r` or an intermediate `I + GH` is singular.
/// * [`SolverError::NonFinite`] – an iterate blew up.
/// * [`SolverError::NotConverged`] – no fixed point within the iteration cap.
pub fn solve_dare(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    q: &DMatrix<f64>,
    r: &DMatrix<f64>,
) -> Result<DMatrix<f64>, SolverError> {
    let n = a.nrows();
    let eye = DMatrix::<f64>::identity(n, n);

    let r_inv = invert(r, "R inverse")?;
    let mut ak = a.clone();
    let mut gk = b * r_inv * b.transpose();
    symmetrize(&mut gk);
    let mut hk = q.clone();
    symmetrize(&mut hk);

    let mut change = f64::INFINITY;
    for iteration in 1..=MAX_DOUBLINGS {
        let w_inv = invert(&(&eye + &gk * &hk), "I + GH")?;
        let ak_t = ak.transpose();
        let aw = &ak * &w_inv;

        let a_next = &aw * &ak;
        let mut g_next = &gk + &aw * &gk * &ak_t;
        let mut h_next = &hk + &ak_t * &hk * &w_inv * &ak;
        symmetrize(&mut g_next);
        symmetrize(&mut h_next);

        if !(all_finite(&a_next) && all_finite(&g_next) && all_finite(&h_next)) {
            return Err(SolverError::NonFinite {
                iterations: iteration,
            });
        }

        change = relative_change(&h_next, &hk);
        ak = a_next;
        gk = g_next;
        hk = h_next;

        if change <= TOLERANCE {
            return Ok(hk);
        }
    }

    Err(SolverError::NotConverged {
        iterations: MAX_DOUBLINGS,
        residual: change,
    })
}

/// Solution of the discrete Lyapunov equation `X = A X Aᵀ + N`.
///
/// The caller is expected to have checked `ρ(A) < 1`; otherwise the series
/// diverges and [`SolverError::NonFinite`] or
/// [`SolverError::NotConverged`] is returned.
pub fn solve_discrete_lyapunov(
    a: &DMatrix<f64>,
    n: &DMatrix<f64>,
) -> Result<DMatrix<f64>, SolverError> {
    let mut ak = a.clone();
    let mut xk = n.clone();

    let mut change = f64::INFINITY;
    for iteration in 1..=MAX_DOUBLINGS {
        let x_next = &xk + &ak * &xk * ak.transpose();
        let a_next = &ak * &ak;

        if !(all_finite(&x_next) && all_finite(&a_next)) {
            return Err(SolverError::NonFinite {
                iterations: iteration,
            });
        }

        change = relative_change(&x_next, &xk);
        xk = x_next;
        ak = a_next;

        if change <= TOLERANCE {
            return Ok(xk);
        }
    }

    Err(SolverError::NotConverged {
        iterations: MAX_DOUBLINGS,
        residual: change,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
