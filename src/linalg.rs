//! Dense linear solve used for the quasi-Newton step.
//!
//! LU factorisation with partial pivoting from nalgebra. A diagonal entry of `U`
//! that does not stand out from the rounding noise of the matrix, i.e.
//! `|u_kk| <= n * eps * max|a_ij|`, marks the system as singular. A zero matrix
//! is always singular.
use nalgebra::{DMatrix, DVector};
use ndarray::prelude::*;

/// Solves `a * x = b` for square `a`. Returns `None` when `a` is numerically singular
/// or the solution is not finite.
pub fn solve(a: ArrayView2<f64>, b: ArrayView1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    debug_assert_eq!(a.dim(), (n, n));

    let scale = a.fold(0f64, |acc, v| acc.max(v.abs()));
    let tiny = n as f64 * f64::EPSILON * scale;

    let decomp = DMatrix::from_fn(n, n, |i, j| a[[i, j]]).lu();
    if decomp.u().diagonal().iter().any(|&d| !(d.abs() > tiny)) {
        return None;
    }

    let rhs = DVector::from_iterator(n, b.iter().cloned());
    let x = decomp.solve(&rhs)?;
    if x.iter().all(|v| v.is_finite()) {
        Some(x.iter().cloned().collect())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use float_cmp::ApproxEq;

    #[test]
    fn needs_pivoting() {
        // zero in the leading position
        let a = arr2(&[[0.0, 2.0, 1.0], [1.0, -1.0, 0.0], [3.0, 0.0, 4.0]]);
        let expected = arr1(&[1.0, -2.0, 0.5]);
        let b = a.dot(&expected);
        let x = solve(a.view(), b.view()).unwrap();
        for (&xi, &ei) in x.iter().zip(expected.iter()) {
            assert!(xi.approx_eq(ei, (1e-12, 4)), "{} vs {}", xi, ei);
        }
    }

    #[test]
    fn identity() {
        let b = arr1(&[1.5, -2.0, 7.0, 0.0]);
        let x = solve(Array2::<f64>::eye(4).view(), b.view()).unwrap();
        assert_eq!(x, b);
    }

    #[test]
    fn singular() {
        let zero = Array2::<f64>::zeros((2, 2));
        assert!(solve(zero.view(), arr1(&[1.0, 2.0]).view()).is_none());

        let rank_one = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        assert!(solve(rank_one.view(), arr1(&[1.0, 1.0]).view()).is_none());

        let with_nan = arr2(&[[f64::NAN, 0.0], [0.0, 1.0]]);
        assert!(solve(with_nan.view(), arr1(&[1.0, 1.0]).view()).is_none());
    }

    #[test]
    fn nearly_singular() {
        // u_22 is one ulp of 1, below the 2 * eps * max|a_ij| threshold
        let a = arr2(&[[1.0, 1.0], [1.0, 1.0 + 2e-16]]);
        assert!(solve(a.view(), arr1(&[1.0, 2.0]).view()).is_none());
    }

    #[test]
    fn badly_scaled_but_regular() {
        let a = arr2(&[[1e-12, 0.0], [0.0, 1e-12]]);
        let x = solve(a.view(), arr1(&[1e-12, 2e-12]).view()).unwrap();
        assert!(x[0].approx_eq(1.0, (1e-12, 4)));
        assert!(x[1].approx_eq(2.0, (1e-12, 4)));
    }
}
