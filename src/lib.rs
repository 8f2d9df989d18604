//! Minimax polynomial approximation via the Remez exchange algorithm.
//!
//! Given a function f(x) on a closed interval, optionally weighted by g(x),
//! the [`solver::RemezSolver`] computes the polynomial of a requested degree
//! whose maximum (weighted) error over the interval is as small as possible,
//! at arbitrary working precision.

pub mod diagnostics;
pub mod expr;
pub mod linalg;
pub mod opts;
pub mod output;
pub mod poly;
pub mod real;
pub mod solver;
