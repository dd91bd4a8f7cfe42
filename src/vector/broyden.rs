//! Broyden's ("good") quasi-Newton method for square systems of nonlinear equations.
//!
//! The Jacobian is estimated once by forward differences at the initial guess.
//! After that every iteration solves `J * dx = -F` exactly and corrects `J` with
//! the rank-one update
//!
//! ```text
//! J <- J + (dF - J * dx) * dx^T / (dx^T * dx)
//! ```
//!
//! so that the new approximation satisfies the secant condition `J * dx = dF`.
//! An update costs O(n^2) and a single residual evaluation, instead of the `n`
//! extra evaluations a fresh finite-difference Jacobian would need. The price is
//! superlinear rather than quadratic convergence, and the residual norm is free
//! to grow for a few iterations before it drops.
//!
//! # Examples
//!
//! ```
//! # extern crate ndarray;
//! # extern crate broyden;
//! # use ndarray::prelude::*;
//! # use broyden::RootSolver;
//! # use broyden::vector::BroydenBuilder;
//!
//! let circle_and_line =
//!     |x: ArrayView1<f64>| array![x[0].powi(2) + x[1].powi(2) - 1.0, x[0] - x[1]];
//! let solver = BroydenBuilder::default()
//!     .tol(1e-10)
//!     .build()
//!     .unwrap();
//! let res = solver.solve(&circle_and_line, array![2.0, 1.0].view()).unwrap();
//! assert!(res.converged());
//! assert!((res.solution[0] - 0.5f64.sqrt()).abs() < 1e-8);
//! ```

use derive_builder::Builder;
use ndarray::prelude::*;
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::{BoxError, Result, SolveError};
use crate::linalg;
use crate::solver::{RootResult, RootSolver, Status};
use crate::utils::{self, WrappedFunction, DEFAULT_EPSILON};

#[derive(Builder, Debug, Clone, PartialEq)]
/// A root solver for square nonlinear systems using Broyden's rank-one Jacobian updates.
pub struct Broyden {
    /// The maximum number of iterations. Zero is allowed and only evaluates the initial residual.
    #[builder(default = "100")]
    pub max_iter: usize,

    /// The solve has converged once the Euclidean norm of the residual is at most `tol`.
    /// Must be positive.
    #[builder(default = "1e-8")]
    pub tol: f64,

    /// Forward-difference step used to seed the Jacobian. Must be positive.
    #[builder(default = "DEFAULT_EPSILON")]
    pub epsilon: f64,
}

impl Default for Broyden {
    fn default() -> Self {
        Broyden {
            max_iter: 100,
            tol: 1e-8,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Broyden {
    fn validate(&self) -> Result<()> {
        utils::check_tolerance("tolerance", self.tol)?;
        utils::check_tolerance("finite-difference step", self.epsilon)
    }
}

impl RootSolver for Broyden {
    /// Search for a root of `func` starting at `x0`.
    fn try_solve<F, E>(&self, func: F, x0: ArrayView1<f64>) -> Result<RootResult<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<Array1<f64>, E>,
        E: Into<BoxError>,
    {
        self.validate()?;
        utils::check_initial_guess(x0)?;
        let start = Instant::now();

        let mut func = WrappedFunction::new(func);
        let mut x = x0.to_owned();
        let mut fx = func.call(x.view())?;
        let mut jac = utils::jacobian(&mut func, x.view(), fx.view(), self.epsilon)?;
        let mut residual_norm = utils::norm(fx.view());
        let mut iterations = 0;
        debug!(n = x.len(), residual_norm, "seeded Jacobian");

        while residual_norm > self.tol && iterations < self.max_iter {
            let dx = linalg::solve(jac.view(), (-&fx).view())
                .ok_or(SolveError::SingularJacobian { iteration: iterations })?;

            let step_norm_sq = dx.dot(&dx);
            if is_degenerate(step_norm_sq, x.view(), dx.view()) {
                debug!(iterations, step_norm_sq, "degenerate step");
                return Err(SolveError::DegenerateStep {
                    iteration: iterations,
                    step_norm_sq,
                });
            }

            x += &dx;
            let fx_new = func.call(x.view())?;
            update_jacobian(&mut jac, (&fx_new - &fx).view(), dx.view(), step_norm_sq);

            fx = fx_new;
            residual_norm = utils::norm(fx.view());
            iterations += 1;
            trace!(iterations, residual_norm, step = step_norm_sq.sqrt(), "broyden iteration");
        }

        let status = if residual_norm <= self.tol {
            Status::Converged
        } else {
            Status::MaxIterReached
        };
        debug!(?status, iterations, residual_norm, f_evals = func.num, "broyden finished");

        Ok(RootResult {
            solution: x,
            iterations,
            residual_norm,
            f_evals: func.num,
            runtime: start.elapsed(),
            status,
        })
    }
}

/// A step is degenerate when `dx^T dx` is zero, subnormal or not finite, or when
/// adding it leaves every component of `x` unchanged.
#[inline]
fn is_degenerate(step_norm_sq: f64, x: ArrayView1<f64>, dx: ArrayView1<f64>) -> bool {
    !step_norm_sq.is_normal() || x.iter().zip(dx.iter()).all(|(&xi, &di)| xi + di == xi)
}

/// `J <- J + (dF - J dx) dx^T / (dx^T dx)`
fn update_jacobian(
    jac: &mut Array2<f64>,
    df: ArrayView1<f64>,
    dx: ArrayView1<f64>,
    step_norm_sq: f64,
) {
    let defect = &df - &jac.dot(&dx);
    let correction = defect
        .view()
        .insert_axis(Axis(1))
        .dot(&dx.insert_axis(Axis(0)));
    jac.scaled_add(1.0 / step_norm_sq, &correction);
}
