//! Error types for recycle convergence.

use std::fmt;

use fs_core::Real;
use fs_graph::{GraphError, UnitError};
use nalgebra::DVector;
use thiserror::Error;

/// Context of a recycle loop that ran out of iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceFailure {
    /// Units of the failing network, in path order.
    pub units: Vec<String>,
    /// Recycle streams closing the failing network.
    pub recycle: Vec<String>,
    pub iterations: usize,
    /// Largest `|g - x|` over the recycle state at the last check.
    pub residual: Real,
    /// Recycle state computed by the last sweep.
    pub last_iterate: DVector<Real>,
}

impl fmt::Display for ConvergenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "recycle {{{}}} around [{}] did not converge after {} iterations (residual {:.3e})",
            self.recycle.join(", "),
            self.units.join(", "),
            self.iterations,
            self.residual
        )
    }
}

/// Errors that can occur while converging a network.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Convergence failed: {0}")]
    ConvergenceFailure(Box<ConvergenceFailure>),

    #[error("Unit {unit} failed: {source}")]
    UnitEvaluation {
        unit: String,
        #[source]
        source: UnitError,
    },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// The failure context when this is a convergence failure.
    pub fn convergence_failure(&self) -> Option<&ConvergenceFailure> {
        match self {
            SolverError::ConvergenceFailure(failure) => Some(failure),
            _ => None,
        }
    }
}
