//! Root finding for nonlinear equations.
//!
//! The centrepiece is [`vector::Broyden`], a quasi-Newton solver for square systems
//! `F(x) = 0` that seeds a finite-difference Jacobian once and then keeps it up to
//! date with rank-one updates. [`vector::Newton`] rebuilds the Jacobian at every
//! iterate instead, and [`scalar`] holds bracketing and secant solvers for a single
//! unknown.
//!
//! Vector-valued residuals are closures taking an `ndarray::ArrayView1<f64>` and
//! returning an `Array1<f64>` of the same length.
//!
//! ```
//! # extern crate ndarray;
//! # extern crate broyden;
//! # use ndarray::prelude::*;
//! let res = broyden::solve_quasi_newton(
//!     |x: ArrayView1<f64>| array![x[0] * x[0] - 4.0, x[0] * x[1] - 1.0],
//!     array![1.0, 1.0].view(),
//!     100,
//!     1e-8,
//! )
//! .unwrap();
//! assert!(res.converged());
//! assert!((res.solution[0] - 2.0).abs() < 1e-6);
//! ```

pub mod error;
pub mod linalg;
pub mod scalar;
mod solver;
pub mod utils;
pub mod vector;

pub use crate::error::{Result, SolveError};
pub use crate::solver::{RootResult, RootSolver, Status};

use ndarray::{Array1, ArrayView1};

/// Solves `residual_fn(x) = 0` from `x0` with Broyden's method, the default
/// finite-difference step, and the given iteration budget and tolerance.
pub fn solve_quasi_newton<F>(
    residual_fn: F,
    x0: ArrayView1<f64>,
    max_iterations: usize,
    tolerance: f64,
) -> Result<RootResult<Array1<f64>>>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    let solver = vector::Broyden {
        max_iter: max_iterations,
        tol: tolerance,
        ..Default::default()
    };
    solver.solve(residual_fn, x0)
}
