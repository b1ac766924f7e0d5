//! The simulation context: a flowsheet plus its network.

use std::collections::BTreeSet;

use fs_core::{StreamId, Tolerances, UnitId};
use fs_graph::{Flowsheet, Network, NetworkBuilder, Stream, build_network};
use fs_solver::{ConvergenceConfig, SolveReport, converge};
use tracing::info;

use crate::error::{SimError, SimResult};

/// A flowsheet together with the nested network that solves it.
///
/// The system owns its flowsheet; there is no ambient "current" flowsheet.
/// Streams keep their values between calls, so a second `simulate` starts
/// from the previous fixed point unless [`System::empty_recycles`] resets
/// the recycle streams first.
#[derive(Debug)]
pub struct System {
    name: String,
    flowsheet: Flowsheet,
    /// Units the network was built from; `None` means the whole flowsheet.
    seeds: Option<Vec<UnitId>>,
    network: Network,
    config: ConvergenceConfig,
    last_report: Option<SolveReport>,
}

impl System {
    /// Build the network of every unit in `flowsheet`.
    pub fn new(flowsheet: Flowsheet) -> SimResult<Self> {
        let network = NetworkBuilder::new(&flowsheet).build()?;
        Ok(Self::assemble(flowsheet, None, network))
    }

    /// Build the network of the units downstream of `seeds`.
    pub fn from_units(flowsheet: Flowsheet, seeds: &[UnitId]) -> SimResult<Self> {
        if seeds.is_empty() {
            return Err(SimError::InvalidArg {
                what: "a system needs at least one seed unit",
            });
        }
        let network = build_network(&flowsheet, seeds)?;
        Ok(Self::assemble(flowsheet, Some(seeds.to_vec()), network))
    }

    fn assemble(flowsheet: Flowsheet, seeds: Option<Vec<UnitId>>, network: Network) -> Self {
        info!(
            system = flowsheet.name(),
            units = network.unit_count(),
            recycles = network.all_recycles().len(),
            depth = network.depth(),
            "system built"
        );
        Self {
            name: flowsheet.name().to_string(),
            flowsheet,
            seeds,
            network,
            config: ConvergenceConfig::default(),
            last_report: None,
        }
    }

    pub fn with_config(mut self, config: ConvergenceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConvergenceConfig) {
        self.config = config;
    }

    /// Converge the network with the stored configuration.
    pub fn simulate(&mut self) -> SimResult<&SolveReport> {
        let config = self.config;
        self.run(&config)
    }

    /// Converge with one-off overrides of the tolerances and iteration budget.
    pub fn simulate_with(
        &mut self,
        tolerances: Option<Tolerances>,
        max_iterations: Option<usize>,
    ) -> SimResult<&SolveReport> {
        let mut config = self.config;
        if let Some(tolerances) = tolerances {
            config.tolerances = tolerances;
        }
        if let Some(max_iterations) = max_iterations {
            config.max_iterations = max_iterations;
        }
        self.run(&config)
    }

    fn run(&mut self, config: &ConvergenceConfig) -> SimResult<&SolveReport> {
        self.last_report = None;
        let report = converge(&mut self.flowsheet, &self.network, config)?;
        info!(
            system = %self.name,
            loops = report.loops.len(),
            iterations = report.total_iterations(),
            evaluations = report.evaluations,
            "system converged"
        );
        Ok(self.last_report.insert(report))
    }

    /// Collapse the network into one level. Every recycle stream of every
    /// level becomes a recycle of the flat network.
    pub fn flatten(&mut self) {
        self.network.flatten();
    }

    pub fn is_flat(&self) -> bool {
        self.network.is_flat()
    }

    /// Discard any flattening and derive the nested network again.
    pub fn rebuild(&mut self) -> SimResult<()> {
        self.network = match &self.seeds {
            Some(seeds) => build_network(&self.flowsheet, seeds)?,
            None => NetworkBuilder::new(&self.flowsheet).build()?,
        };
        Ok(())
    }

    /// Reset every recycle stream, at every nesting level, to the empty
    /// state. Nothing is re-simulated.
    pub fn empty_recycles(&mut self) {
        for id in self.network.all_recycles() {
            if let Some(stream) = self.flowsheet.stream_mut(id) {
                stream.empty();
            }
        }
    }

    /// Units in execution order.
    pub fn path(&self) -> Vec<UnitId> {
        self.network.path()
    }

    pub fn path_names(&self) -> Vec<&str> {
        self.network
            .path()
            .into_iter()
            .map(|u| self.flowsheet.unit_name(u))
            .collect()
    }

    /// Recycle streams of every nesting level.
    pub fn recycles(&self) -> BTreeSet<StreamId> {
        self.network.all_recycles()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn describe(&self) -> String {
        self.network.describe(&self.flowsheet)
    }

    pub fn flowsheet(&self) -> &Flowsheet {
        &self.flowsheet
    }

    /// Mutable flowsheet access, e.g. to change feeds between runs.
    pub fn flowsheet_mut(&mut self) -> &mut Flowsheet {
        &mut self.flowsheet
    }

    /// Look a stream up by name.
    pub fn stream(&self, name: &str) -> Option<&Stream> {
        self.flowsheet
            .find_stream(name)
            .and_then(|id| self.flowsheet.stream(id))
    }

    /// Report of the last successful simulation.
    pub fn last_report(&self) -> Option<&SolveReport> {
        self.last_report.as_ref()
    }

    pub fn into_flowsheet(self) -> Flowsheet {
        self.flowsheet
    }
}
