/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! ncs-cost – closed-form LQG cost of periodic channel schedules
//!
//! Several LTI control loops share a network with fewer channels than loops.
//! A periodic schedule says which loops hold a channel at each step; this
//! crate turns such a schedule into the expected per-step LQG cost of the
//! whole system.
//!
//! ```text
//! lib.rs
//! ├── model          – validated loop matrices (A, B, C, Q, R, W, V)
//! ├── allocation/    – lexicographic table of channel allocations
//! ├── gaps           – per-loop waiting times over a cyclic schedule
//! ├── cost/          – Riccati / Lyapunov solvers and the cost evaluator
//! ├── episode        – slot-by-slot schedule construction with rewards
//! ├── generator      – seeded random loop sets
//! ├── config/        – YAML loop-set files
//! └── error          – error types shared across modules
//! ```

pub mod allocation;
pub mod config;
pub mod cost;
pub mod episode;
pub mod error;
pub mod gaps;
pub mod generator;
pub mod model;
