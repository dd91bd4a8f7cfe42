//! Newton's method for square systems with a forward-difference Jacobian.
//!
//! Unlike [`Broyden`](super::Broyden) the Jacobian is rebuilt from scratch at every
//! iterate, so an iteration costs `n + 1` residual evaluations. In exchange the
//! convergence near a regular root is quadratic, up to the accuracy of the
//! finite differences.

use derive_builder::Builder;
use ndarray::prelude::*;
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::{BoxError, Result, SolveError};
use crate::linalg;
use crate::solver::{RootResult, RootSolver, Status};
use crate::utils::{self, WrappedFunction, DEFAULT_EPSILON};

#[derive(Builder, Debug, Clone, PartialEq)]
/// A root solver for square nonlinear systems that re-estimates the Jacobian at every iterate.
pub struct Newton {
    /// The maximum number of iterations. Zero is allowed and only evaluates the initial residual.
    #[builder(default = "100")]
    pub max_iter: usize,

    /// Convergence threshold on the Euclidean norm of the residual.
    #[builder(default = "1e-8")]
    pub tol: f64,

    /// Forward-difference step for the Jacobian.
    #[builder(default = "DEFAULT_EPSILON")]
    pub epsilon: f64,
}

impl Default for Newton {
    fn default() -> Self {
        Newton {
            max_iter: 100,
            tol: 1e-8,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl RootSolver for Newton {
    fn try_solve<F, E>(&self, func: F, x0: ArrayView1<f64>) -> Result<RootResult<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<Array1<f64>, E>,
        E: Into<BoxError>,
    {
        utils::check_tolerance("tolerance", self.tol)?;
        utils::check_tolerance("finite-difference step", self.epsilon)?;
        utils::check_initial_guess(x0)?;
        let start = Instant::now();

        let mut func = WrappedFunction::new(func);
        let mut x = x0.to_owned();
        let mut fx = func.call(x.view())?;
        let mut residual_norm = utils::norm(fx.view());
        let mut iterations = 0;

        while residual_norm > self.tol && iterations < self.max_iter {
            let jac = utils::jacobian(&mut func, x.view(), fx.view(), self.epsilon)?;
            let dx = linalg::solve(jac.view(), (-&fx).view())
                .ok_or(SolveError::SingularJacobian { iteration: iterations })?;
            x += &dx;
            fx = func.call(x.view())?;
            residual_norm = utils::norm(fx.view());
            iterations += 1;
            trace!(iterations, residual_norm, "newton iteration");
        }

        let status = if residual_norm <= self.tol {
            Status::Converged
        } else {
            Status::MaxIterReached
        };
        debug!(?status, iterations, residual_norm, f_evals = func.num, "newton finished");

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
