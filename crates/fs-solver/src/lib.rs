//! Recycle convergence for flowsheet networks.
//!
//! This crate drives a nested [`fs_graph::Network`] to its fixed point:
//! straight networks are swept once, recycle networks are iterated with
//! Wegstein acceleration until every recycle stream satisfies the
//! configured tolerances. Inner loops converge within each outer sweep.

pub mod config;
pub mod convergence;
pub mod error;
pub mod report;
pub mod wegstein;

pub use config::{Acceleration, ConvergenceConfig};
pub use convergence::{ConvergenceState, LoopPhase, converge, gather, scatter, sweep};
pub use error::{ConvergenceFailure, SolverError, SolverResult};
pub use report::{LoopReport, SolveReport};
pub use wegstein::Accelerator;
