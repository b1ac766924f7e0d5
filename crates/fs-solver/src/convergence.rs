//! Recycle convergence over a nested [`Network`].
//!
//! A network without recycle streams is swept once. A network with recycle
//! streams is a loop driven by [`LoopPhase`]:
//!
//! ```text
//! Initializing -> Sweeping -> Checking -> Converged
//!                     ^           |
//!                     |           +-----> Failed
//!                     |           v
//!                     +------ Accelerating
//! ```
//!
//! Nested loops are converged completely inside every sweep of their parent.

use fs_core::{Real, StreamId, within_tolerance};
use fs_graph::{Element, Flowsheet, GraphError, Network};
use nalgebra::DVector;
use tracing::{debug, warn};

use crate::config::ConvergenceConfig;
use crate::error::{ConvergenceFailure, SolverError, SolverResult};
use crate::report::{LoopReport, SolveReport};
use crate::wegstein::Accelerator;

/// Where a recycle loop is in its fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Read the starting guess from the recycle streams.
    Initializing,
    /// Run every element once.
    Sweeping,
    /// Compare the swept recycle state with the guess.
    Checking,
    /// Form the next guess and write it to the recycle streams.
    Accelerating,
    Converged,
    Failed,
}

/// Iteration state of one recycle loop.
#[derive(Debug, Clone)]
pub struct ConvergenceState {
    pub phase: LoopPhase,
    /// Completed sweeps.
    pub iteration: usize,
    /// Recycle state the current sweep started from (`x`).
    pub guess: DVector<Real>,
    /// Recycle state the current sweep produced (`g(x)`).
    pub computed: DVector<Real>,
    /// `max |g - x|` at the last check.
    pub residual: Real,
}

impl ConvergenceState {
    fn new() -> Self {
        Self {
            phase: LoopPhase::Initializing,
            iteration: 0,
            guess: DVector::zeros(0),
            computed: DVector::zeros(0),
            residual: Real::INFINITY,
        }
    }
}

/// Converge `network` in place on `flowsheet`.
///
/// On success every recycle stream holds its fixed point. On failure the
/// streams keep the last swept values; loops that finished before the
/// failure stay at their fixed points.
pub fn converge(
    flowsheet: &mut Flowsheet,
    network: &Network,
    config: &ConvergenceConfig,
) -> SolverResult<SolveReport> {
    config.validate()?;
    let mut report = SolveReport::default();
    run(flowsheet, network, config, &mut report)?;
    Ok(report)
}

fn run(
    flowsheet: &mut Flowsheet,
    network: &Network,
    config: &ConvergenceConfig,
    report: &mut SolveReport,
) -> SolverResult<()> {
    if network.has_recycle() {
        RecycleLoop::new(flowsheet, network, config).run(flowsheet, config, report)
    } else {
        sweep(flowsheet, network, config, report)
    }
}

/// Run every element of `network` once, in order. Nested loops are
/// converged; the recycle set of `network` itself is not checked.
pub fn sweep(
    flowsheet: &mut Flowsheet,
    network: &Network,
    config: &ConvergenceConfig,
    report: &mut SolveReport,
) -> SolverResult<()> {
    for element in network.elements() {
        match element {
            Element::Unit(id) => {
                if let Err(source) = flowsheet.evaluate(*id) {
                    return Err(SolverError::UnitEvaluation {
                        unit: flowsheet.unit_name(*id).to_string(),
                        source,
                    });
                }
                report.evaluations += 1;
            }
            Element::Network(inner) => run(flowsheet, inner, config, report)?,
        }
    }
    Ok(())
}

/// Concatenated state vectors of `streams`.
pub fn gather(flowsheet: &Flowsheet, streams: &[StreamId]) -> SolverResult<DVector<Real>> {
    let mut state = Vec::new();
    for &id in streams {
        let stream = flowsheet.stream(id).ok_or(missing_recycle())?;
        state.extend(stream.state_vector().iter());
    }
    Ok(DVector::from_vec(state))
}

/// Write a concatenated state back into `streams`.
pub fn scatter(
    flowsheet: &mut Flowsheet,
    streams: &[StreamId],
    state: &DVector<Real>,
) -> SolverResult<()> {
    let mut offset = 0;
    for &id in streams {
        let stream = flowsheet.stream_mut(id).ok_or(missing_recycle())?;
        let len = stream.state_len();
        let Some(slice) = state.as_slice().get(offset..offset + len) else {
            return Err(SolverError::Graph(GraphError::Invariant {
                what: "recycle state shorter than its streams",
            }));
        };
        stream.write_state(slice);
        offset += len;
    }
    Ok(())
}

fn missing_recycle() -> SolverError {
    SolverError::Graph(GraphError::Invariant {
        what: "recycle stream missing from flowsheet",
    })
}

struct RecycleLoop<'n> {
    network: &'n Network,
    recycle: Vec<StreamId>,
    names: Vec<String>,
    state: ConvergenceState,
    accelerator: Accelerator,
}

impl<'n> RecycleLoop<'n> {
    fn new(flowsheet: &Flowsheet, network: &'n Network, config: &ConvergenceConfig) -> Self {
        let recycle: Vec<StreamId> = network.recycle().iter().copied().collect();
        let names = recycle
            .iter()
            .map(|&s| flowsheet.stream_name(s).to_string())
            .collect();
        Self {
            network,
            recycle,
            names,
            state: ConvergenceState::new(),
            accelerator: Accelerator::new(config.acceleration, config.damping),
        }
    }

    fn run(
        mut self,
        flowsheet: &mut Flowsheet,
        config: &ConvergenceConfig,
        report: &mut SolveReport,
    ) -> SolverResult<()> {
        loop {
            match self.state.phase {
                LoopPhase::Initializing => {
                    self.state.guess = gather(flowsheet, &self.recycle)?;
                    self.accelerator.reset();
                    self.state.phase = LoopPhase::Sweeping;
                }
                LoopPhase::Sweeping => {
                    sweep(flowsheet, self.network, config, report)?;
                    self.state.iteration += 1;
                    self.state.computed = gather(flowsheet, &self.recycle)?;
                    self.state.phase = LoopPhase::Checking;
                }
                LoopPhase::Checking => {
                    self.state.phase = self.check(config);
                }
                LoopPhase::Accelerating => {
                    let next = self
                        .accelerator
                        .next_guess(&self.state.guess, &self.state.computed);
                    scatter(flowsheet, &self.recycle, &next)?;
                    self.state.guess = next;
                    self.state.phase = LoopPhase::Sweeping;
                }
                LoopPhase::Converged => {
                    debug!(
                        recycle = ?self.names,
                        iterations = self.state.iteration,
                        residual = self.state.residual,
                        "recycle converged"
                    );
                    report.loops.push(LoopReport {
                        recycle: self.recycle,
                        names: self.names,
                        iterations: self.state.iteration,
                        residual: self.state.residual,
                    });
                    return Ok(());
                }
                LoopPhase::Failed => {
                    let units = self
                        .network
                        .path()
                        .into_iter()
                        .map(|u| flowsheet.unit_name(u).to_string())
                        .collect();
                    warn!(
                        recycle = ?self.names,
                        iterations = self.state.iteration,
                        residual = self.state.residual,
                        "recycle failed to converge"
                    );
                    return Err(SolverError::ConvergenceFailure(Box::new(
                        ConvergenceFailure {
                            units,
                            recycle: self.names,
                            iterations: self.state.iteration,
                            residual: self.state.residual,
                            last_iterate: self.state.computed,
                        },
                    )));
                }
            }
        }
    }

    fn check(&mut self, config: &ConvergenceConfig) -> LoopPhase {
        let (x, g) = (&self.state.guess, &self.state.computed);
        let residual = if x.len() == g.len() {
            x.iter()
                .zip(g.iter())
                .map(|(a, b)| (b - a).abs())
                .fold(0.0, |acc: Real, d| {
                    // `max` would drop a NaN difference
                    if d.is_finite() { acc.max(d) } else { Real::INFINITY }
                })
        } else {
            Real::INFINITY
        };
        let converged = x.len() == g.len()
            && x
                .iter()
                .zip(g.iter())
                .all(|(&a, &b)| within_tolerance(a, b, config.tolerances));
        self.state.residual = residual;

        debug!(
            recycle = ?self.names,
            iteration = self.state.iteration,
            residual,
            "recycle sweep"
        );

        if converged {
            LoopPhase::Converged
        } else if !g.iter().all(|v| v.is_finite()) || self.state.iteration >= config.max_iterations {
            LoopPhase::Failed
        } else {
            LoopPhase::Accelerating
        }
    }
}
