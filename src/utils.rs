use crate::error::{BoxError, Result, SolveError};
use ndarray::prelude::*;
use std::convert::Infallible;

/// Default forward-difference step.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Counts residual evaluations and checks that every output has the dimension of its input.
pub(crate) struct WrappedFunction<F> {
    pub num: usize,
    pub func: F,
}

impl<F> WrappedFunction<F> {
    pub fn new(func: F) -> Self {
        WrappedFunction { num: 0, func }
    }

    pub fn call<E>(&mut self, arg: ArrayView1<f64>) -> Result<Array1<f64>>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<Array1<f64>, E>,
        E: Into<BoxError>,
    {
        self.num += 1;
        let out = (self.func)(arg).map_err(|e| SolveError::Residual(e.into()))?;
        if out.len() != arg.len() {
            return Err(SolveError::InvalidArgument(format!(
                "residual returned {} values for {} unknowns",
                out.len(),
                arg.len()
            )));
        }
        Ok(out)
    }
}

/// Euclidean norm.
#[inline]
pub fn norm(x: ArrayView1<f64>) -> f64 {
    x.dot(&x).sqrt()
}

pub(crate) fn check_initial_guess(x0: ArrayView1<f64>) -> Result<()> {
    if x0.is_empty() {
        return Err(SolveError::InvalidArgument(
            "initial guess has no components".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_tolerance(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(SolveError::InvalidArgument(format!(
            "{} must be positive and finite, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Forward-difference approximation of the Jacobian of `func` at `xk`.
///
/// `fk` is `func(xk)`, passed in so it is not evaluated twice. Column `i` of the
/// result is `(func(xk + epsilon * e_i) - fk) / epsilon`, which costs exactly
/// `n` further evaluations of `func`.
pub fn approx_jacobian<F>(
    func: F,
    xk: ArrayView1<f64>,
    fk: ArrayView1<f64>,
    epsilon: f64,
) -> Result<Array2<f64>>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    let mut func = WrappedFunction::new(|x: ArrayView1<f64>| Ok::<_, Infallible>(func(x)));
    jacobian(&mut func, xk, fk, epsilon)
}

pub(crate) fn jacobian<F, E>(
    func: &mut WrappedFunction<F>,
    xk: ArrayView1<f64>,
    fk: ArrayView1<f64>,
    epsilon: f64,
) -> Result<Array2<f64>>
where
    F: Fn(ArrayView1<f64>) -> std::result::Result<Array1<f64>, E>,
    E: Into<BoxError>,
{
    check_tolerance("finite-difference step", epsilon)?;
    check_initial_guess(xk)?;
    let n = xk.len();
    if fk.len() != n {
        return Err(SolveError::InvalidArgument(format!(
            "residual has {} values at a point with {} components",
            fk.len(),
            n
        )));
    }

    let mut jac = Array2::<f64>::zeros((n, n));
    let mut x = xk.to_owned();
    for k in 0..n {
        x[k] += epsilon;
        let fx = func.call(x.view())?;
        jac.column_mut(k).assign(&((&fx - &fk) / epsilon));
        x[k] = xk[k];
    }
    Ok(jac)
}

#[cfg(test)]
mod tests {

    use super::*;
    use float_cmp::ApproxEq;

    #[test]
    fn linear_jacobian() {
        let a = arr2(&[[2.0, -1.0, 0.5], [0.0, 3.0, 1.0], [4.0, 1.0, -2.0]]);
        let b = arr1(&[1.0, -2.0, 0.25]);
        let function = |x: ArrayView1<f64>| a.dot(&x) + &b;
        let x = arr1(&[0.3, -1.2, 2.0]);
        let fx = function(x.view());

        for &eps in &[1e-4, 1e-6, 1e-8] {
            let jac = approx_jacobian(&function, x.view(), fx.view(), eps).unwrap();
            for (&est, &exact) in jac.iter().zip(a.iter()) {
                assert!(
                    est.approx_eq(exact, (1e-5, 2)),
                    "eps {}: {} vs {}",
                    eps,
                    est,
                    exact
                );
            }
        }
    }

    #[test]
    fn nonlinear_jacobian() {
        let function = |x: ArrayView1<f64>| arr1(&[x[0] * x[0] + x[1] * x[1] - 1.0, x[0] - x[1]]);
        let x = arr1(&[2.0, 1.0]);
        let fx = function(x.view());
        let jac = approx_jacobian(&function, x.view(), fx.view(), DEFAULT_EPSILON).unwrap();

        assert!(jac[[0, 0]].approx_eq(4.0, (1e-6, 10)));
        assert!(jac[[0, 1]].approx_eq(2.0, (1e-6, 10)));
        assert!(jac[[1, 0]].approx_eq(1.0, (1e-6, 10)));
        assert!(jac[[1, 1]].approx_eq(-1.0, (1e-6, 10)));
    }

    #[test]
    fn rejects_bad_step() {
        let function = |x: ArrayView1<f64>| x.to_owned();
        let x = arr1(&[1.0, 2.0]);
        for &eps in &[0.0, -1e-8, f64::NAN] {
            match approx_jacobian(&function, x.view(), x.view(), eps) {
                Err(SolveError::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument, got {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_mismatched_residual() {
        let function = |x: ArrayView1<f64>| arr1(&[x[0] + x[1]]);
        let x = arr1(&[1.0, 2.0]);
        let fx = arr1(&[3.0, 0.0]);
        assert!(matches!(
            approx_jacobian(&function, x.view(), fx.view(), 1e-8),
            Err(SolveError::InvalidArgument(_))
        ));
        assert!(matches!(
            approx_jacobian(&function, x.view(), arr1(&[3.0]).view(), 1e-8),
            Err(SolveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn counts_evaluations() {
        let mut func = WrappedFunction::new(|x: ArrayView1<f64>| Ok::<_, Infallible>(x.mapv(f64::sin)));
        let x = arr1(&[0.1, 0.2, 0.3, 0.4]);
        let fx = func.call(x.view()).unwrap();
        jacobian(&mut func, x.view(), fx.view(), 1e-8).unwrap();
        assert_eq!(func.num, 1 + x.len());
    }

    #[test]
    fn euclidean_norm() {
        assert_eq!(norm(arr1(&[3.0, 4.0]).view()), 5.0);
        assert_eq!(norm(Array1::<f64>::zeros(3).view()), 0.0);
    }
}
