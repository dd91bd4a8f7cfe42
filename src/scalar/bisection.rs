//! Bisection is the simplest bracketing root finder. Given an interval on
//! whose ends the function takes opposite signs, every iteration evaluates
//! the midpoint and keeps the half that still brackets a sign change:
//!         +---------+---------+
//! iter 1  a         m         b        f(a) < 0 < f(m)
//!         +----+----+
//! iter 2  a    m    b
//! The bracket halves each time, so reaching a width `w` from an initial
//! width `w0` takes `log2(w0 / w)` iterations no matter how the function
//! behaves inside the bracket.

use derive_builder::Builder;
use tracing::debug;

use crate::error::{Result, SolveError};
use crate::solver::{RootResult, Status};
use crate::utils::check_tolerance;
use std::time::Instant;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Bisection {
    /// The bracket half-width at which the midpoint is accepted.
    /// Smaller is more precise.
    #[builder(default = "1e-8")]
    pub xtol: f64,

    /// The maximum number of halvings before the search terminates.
    #[builder(default = "1000")]
    pub max_iter: usize,
}

impl Default for Bisection {
    fn default() -> Self {
        Bisection {
            xtol: 1e-8,
            max_iter: 1000,
        }
    }
}

impl Bisection {
    /// Searches for a root of `func` between `left` and `right`. The function must change
    /// sign over the interval (or vanish at one of its ends). `residual_norm` in the
    /// result is `|func(root)|`; convergence is judged on the bracket width only.
    pub fn solve<F>(&self, func: F, left: f64, right: f64) -> Result<RootResult<f64>>
    where
        F: Fn(f64) -> f64,
    {
        check_tolerance("xtol", self.xtol)?;
        if !(left.is_finite() && right.is_finite()) || left == right {
            return Err(SolveError::InvalidArgument(format!(
                "[{}, {}] is not a bracket",
                left, right
            )));
        }
        let start = Instant::now();
        let (mut a, mut b) = if left < right { (left, right) } else { (right, left) };
        let mut fa = func(a);
        let fb = func(b);
        let mut f_evals = 2;

        let done = |root: f64, f_root: f64, iterations, f_evals, status| RootResult {
            solution: root,
            iterations,
            residual_norm: f_root.abs(),
            f_evals,
            runtime: start.elapsed(),
            status,
        };

        if fa == 0.0 {
            return Ok(done(a, fa, 0, f_evals, Status::Converged));
        }
        if fb == 0.0 {
            return Ok(done(b, fb, 0, f_evals, Status::Converged));
        }
        if !(fa * fb < 0.0) {
            return Err(SolveError::InvalidArgument(format!(
                "no sign change over [{}, {}]: f = {} and {}",
                a, b, fa, fb
            )));
        }

        let mut iterations = 0;
        loop {
            let half_width = 0.5 * (b - a);
            let mid = a + half_width;
            let f_mid = func(mid);
            f_evals += 1;

            if f_mid == 0.0 || half_width <= self.xtol {
                debug!(iterations, mid, f_mid, "bisection converged");
                return Ok(done(mid, f_mid, iterations, f_evals, Status::Converged));
            }
            if iterations == self.max_iter {
                debug!(iterations, mid, f_mid, "bisection ran out of iterations");
                return Ok(done(mid, f_mid, iterations, f_evals, Status::MaxIterReached));
            }

            if (f_mid < 0.0) == (fa < 0.0) {
                a = mid;
                fa = f_mid;
            } else {
                b = mid;
            }
            iterations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_root_of_two() {
        let solver = BisectionBuilder::default().xtol(1e-10).build().unwrap();
        let res = solver.solve(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();

        println!("res: {:?}", res);
        assert!(res.converged());
        assert!((res.solution - 2f64.sqrt()).abs() <= 1e-10);
        assert_eq!(res.f_evals, res.iterations + 3);
    }

    #[test]
    fn endpoints_in_any_order() {
        let f = |x: f64| x.cos() - x;
        let res = Bisection::default().solve(f, 1.0, 0.0).unwrap();
        assert!((res.solution - 0.739_085_133_215_160_6).abs() <= 1e-8);
    }

    #[test]
    fn root_on_the_boundary() {
        let res = Bisection::default().solve(|x: f64| x - 1.0, 1.0, 3.0).unwrap();
        assert_eq!(res.solution, 1.0);
        assert_eq!(res.iterations, 0);
        assert_eq!(res.residual_norm, 0.0);
    }

    #[test]
    fn budget() {
        let solver = BisectionBuilder::default().max_iter(3).build().unwrap();
        let res = solver.solve(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
        assert_eq!(res.iterations, 3);
        assert_eq!(res.status, Status::MaxIterReached);
    }

    #[test]
    fn no_bracket() {
        let f = |x: f64| x * x + 1.0;
        assert!(matches!(
            Bisection::default().solve(f, -1.0, 1.0),
            Err(SolveError::InvalidArgument(_))
        ));
        assert!(matches!(
            Bisection::default().solve(f, 2.0, 2.0),
            Err(SolveError::InvalidArgument(_))
        ));
        assert!(matches!(
            Bisection::default().solve(f, 0.0, f64::INFINITY),
            Err(SolveError::InvalidArgument(_))
        ));
    }
}
