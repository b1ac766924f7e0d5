//! Summary of a convergence run.

use fs_core::{Real, StreamId};

/// One converged invocation of a recycle loop.
///
/// Inner loops are converged once per sweep of their parent, so they
/// appear once per outer iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopReport {
    pub recycle: Vec<StreamId>,
    /// Recycle stream names, parallel to `recycle`.
    pub names: Vec<String>,
    pub iterations: usize,
    /// Largest `|g - x|` at the accepting check.
    pub residual: Real,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveReport {
    /// Loop invocations in completion order (inner before outer).
    pub loops: Vec<LoopReport>,
    /// Unit evaluations performed.
    pub evaluations: usize,
}

impl SolveReport {
    /// Sweeps over all loop invocations.
    pub fn total_iterations(&self) -> usize {
        self.loops.iter().map(|l| l.iterations).sum()
    }

    /// The last completed invocation of the loop closed by `stream`.
    pub fn last_for(&self, stream: StreamId) -> Option<&LoopReport> {
        self.loops.iter().rev().find(|l| l.recycle.contains(&stream))
    }

    /// Largest accepted residual over every loop invocation.
    pub fn max_residual(&self) -> Real {
        self.loops.iter().map(|l| l.residual).fold(0.0, Real::max)
    }
}
