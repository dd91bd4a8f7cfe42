//! Error type shared by all solvers in this crate.
use thiserror::Error;

/// Boxed error returned by a fallible residual function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Reasons a solve terminates early. Running out of iterations is not one of
/// them: see [`Status::MaxIterReached`](crate::Status::MaxIterReached).
#[derive(Error, Debug)]
pub enum SolveError {
    /// Malformed configuration or inputs, e.g. a non-positive tolerance or
    /// a residual whose output length differs from its input length.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The linear system `J * dx = -F` could not be solved.
    #[error("singular Jacobian approximation at iteration {iteration}")]
    SingularJacobian { iteration: usize },

    /// The step has (numerically) zero length, so the rank-one update is undefined.
    #[error("degenerate step at iteration {iteration} (squared step length {step_norm_sq:e})")]
    DegenerateStep { iteration: usize, step_norm_sq: f64 },

    /// The residual function itself failed.
    #[error("residual evaluation failed: {0}")]
    Residual(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, SolveError>;
