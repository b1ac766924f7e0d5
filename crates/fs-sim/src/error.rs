//! Error types for system operations.

use fs_core::FsError;
use fs_graph::GraphError;
use fs_solver::SolverError;
use thiserror::Error;

/// Errors surfaced by [`crate::System`].
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Core(#[from] FsError),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// The failure context when a recycle loop ran out of iterations.
    pub fn convergence_failure(&self) -> Option<&fs_solver::ConvergenceFailure> {
        match self {
            SimError::Solver(e) => e.convergence_failure(),
            _ => None,
        }
    }
}
