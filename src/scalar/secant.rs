//! The secant method replaces the derivative in Newton's iteration by the slope
//! through the last two iterates:
//!
//! ```text
//! x_{k+1} = x_k - f(x_k) * (x_k - x_{k-1}) / (f(x_k) - f(x_{k-1}))
//! ```
//!
//! It is the one-dimensional ancestor of Broyden's method and converges with
//! order (1 + sqrt 5) / 2 near a simple root. Nothing keeps the iterates
//! bracketed, so it may also wander off.

use derive_builder::Builder;
use float_cmp::ApproxEqUlps;
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::{Result, SolveError};
use crate::solver::{RootResult, Status};
use crate::utils::check_tolerance;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Secant {
    /// Accept an iterate once `|f(x)| <= tol`.
    #[builder(default = "1e-8")]
    pub tol: f64,

    #[builder(default = "100")]
    pub max_iter: usize,

    /// Two function values within this many floating point representations of each other
    /// make the secant flat. See crate float_cmp for more information.
    #[builder(default = "1")]
    pub ulps: i64,
}

impl Default for Secant {
    fn default() -> Self {
        Secant {
            tol: 1e-8,
            max_iter: 100,
            ulps: 1,
        }
    }
}

impl Secant {
    /// Searches for a root of `func` from the two starting points `x0` and `x1`.
    pub fn solve<F>(&self, func: F, x0: f64, x1: f64) -> Result<RootResult<f64>>
    where
        F: Fn(f64) -> f64,
    {
        check_tolerance("tolerance", self.tol)?;
        if !(x0.is_finite() && x1.is_finite()) || x0 == x1 {
            return Err(SolveError::InvalidArgument(format!(
                "secant needs two distinct finite starting points, got {} and {}",
                x0, x1
            )));
        }
        let start = Instant::now();

        let (mut x_prev, mut f_prev) = (x0, func(x0));
        let (mut x, mut fx) = (x1, func(x1));
        let mut f_evals = 2;
        let mut iterations = 0;

        while fx.abs() > self.tol && iterations < self.max_iter {
            if fx.approx_eq_ulps(&f_prev, self.ulps) {
                debug!(iterations, x, fx, "flat secant");
                return Err(SolveError::DegenerateStep {
                    iteration: iterations,
                    step_norm_sq: (x - x_prev).powi(2),
                });
            }
            let x_next = x - fx * (x - x_prev) / (fx - f_prev);
            x_prev = x;
            f_prev = fx;
            x = x_next;
            fx = func(x);
            f_evals += 1;
            iterations += 1;
            trace!(iterations, x, fx, "secant iteration");
        }

        let status = if fx.abs() <= self.tol {
            Status::Converged
        } else {
            Status::MaxIterReached
        };
        Ok(RootResult {
            solution: x,
            iterations,
            residual_norm: fx.abs(),
            f_evals,
            runtime: start.elapsed(),
            status,
        })
    }
}
