//! This module provides the base framework for the multidimensional root solvers in this crate,
//! such as the base trait and return type.
use crate::error::{BoxError, Result};
use ndarray::prelude::*;
use std::convert::Infallible;
use std::time::Duration;

/// How a solve that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The residual norm is within tolerance.
    Converged,
    /// The iteration budget ran out first. The caller inspects `residual_norm`
    /// to decide whether the answer is good enough.
    MaxIterReached,
}

/// The outcome of a root search, storing various details of the run and the final iterate.
#[derive(Debug, Clone, PartialEq)]
pub struct RootResult<X> {
    /// The final iterate.
    pub solution: X,
    /// The number of iterations run. Never exceeds the configured maximum.
    pub iterations: usize,
    /// Euclidean norm of the residual at `solution`.
    pub residual_norm: f64,
    /// The number of residual evaluations performed, including Jacobian seeding.
    pub f_evals: usize,
    /// The runtime of the solve according to the system clock.
    pub runtime: Duration,
    pub status: Status,
}

impl<X> RootResult<X> {
    pub fn converged(&self) -> bool {
        self.status == Status::Converged
    }
}

/// A general root solver for square systems `F(x) = 0`.
pub trait RootSolver {
    /// Searches for a root of a residual that may fail. Errors returned by `func`
    /// abort the search and come back as [`SolveError::Residual`](crate::SolveError::Residual).
    fn try_solve<F, E>(&self, func: F, x0: ArrayView1<f64>) -> Result<RootResult<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<Array1<f64>, E>,
        E: Into<BoxError>;

    /// Searches for a root of `func` starting at `x0`.
    fn solve<F>(&self, func: F, x0: ArrayView1<f64>) -> Result<RootResult<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
    {
        self.try_solve(|x| Ok::<_, Infallible>(func(x)), x0)
    }
}
