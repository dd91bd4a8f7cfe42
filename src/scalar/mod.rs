//! This module contains algorithms that search for roots of functions of a single variable.

mod bisection;
mod secant;

pub use self::bisection::{Bisection, BisectionBuilder};
pub use self::secant::{Secant, SecantBuilder};
