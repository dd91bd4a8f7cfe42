//! Algorithms that search for roots of square systems of equations in several variables.

mod broyden;
pub use self::broyden::Broyden;
pub use self::broyden::BroydenBuilder;

mod newton;
pub use self::newton::Newton;
pub use self::newton::NewtonBuilder;
