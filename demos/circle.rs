extern crate broyden;
extern crate ndarray;

use broyden::vector::{Broyden, Newton};
use broyden::RootSolver;
use ndarray::prelude::*;

fn main() {
        // intersection of the unit circle with the line y = x
        let f = |x: ArrayView1<f64>| array![x[0].powi(2) + x[1].powi(2) - 1.0, x[0] - x[1]];
        let x0 = array![2.0, 1.0];

        match Broyden::default().solve(&f, x0.view()) {
                Ok(res) => println!("broyden: {:?}", res),
                Err(e) => println!("broyden failed: {}", e),
        }
        match Newton::default().solve(&f, x0.view()) {
                Ok(res) => println!("newton:  {:?}", res),
                Err(e) => println!("newton failed: {}", e),
        }
}
