//! The flowsheet arena: every stream and unit of one simulation session.

use std::collections::BTreeSet;

use fs_core::{StreamId, UnitId};

use crate::stream::Stream;
use crate::unit::{Unit, UnitError, UnitResult};

/// A unit placed in a flowsheet: identity, wiring and model.
#[derive(Debug)]
pub struct UnitNode {
    pub id: UnitId,
    pub name: String,
    /// Inlet streams in slot order.
    pub ins: Vec<StreamId>,
    /// Outlet streams in slot order.
    pub outs: Vec<StreamId>,
    pub(crate) model: Box<dyn Unit>,
}

impl UnitNode {
    pub fn kind(&self) -> &'static str {
        self.model.kind()
    }
}

/// A validated flowsheet.
///
/// Topology is fixed once built (use [`crate::FlowsheetBuilder`]); stream
/// values and unit models stay mutable so the flowsheet can be simulated
/// repeatedly. This object is the explicit simulation context: nothing
/// about the current flowsheet lives in global state.
#[derive(Debug)]
pub struct Flowsheet {
    pub(crate) name: String,
    pub(crate) n_components: usize,
    pub(crate) streams: Vec<Stream>,
    pub(crate) units: Vec<UnitNode>,
    pub(crate) feeds: BTreeSet<StreamId>,
    /// Producing unit of each stream, indexed by stream slot.
    pub(crate) producers: Vec<Option<UnitId>>,
    /// Consuming unit of each stream, indexed by stream slot.
    pub(crate) consumers: Vec<Option<UnitId>>,
}

impl Flowsheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of chemical components carried by every stream.
    pub fn component_count(&self) -> usize {
        self.n_components
    }

    /// Return all streams, in creation order.
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Return all units, in insertion order.
    pub fn units(&self) -> &[UnitNode] {
        &self.units
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().map(|u| u.id)
    }

    /// Get a stream by ID (returns None if ID out of bounds).
    pub fn stream(&self, id: StreamId) -> Option<&Stream> {
        self.streams.get(id.slot())
    }

    pub fn stream_mut(&mut self, id: StreamId) -> Option<&mut Stream> {
        self.streams.get_mut(id.slot())
    }

    /// Get a unit by ID (returns None if ID out of bounds).
    pub fn unit(&self, id: UnitId) -> Option<&UnitNode> {
        self.units.get(id.slot())
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitNode> {
        self.units.get_mut(id.slot())
    }

    pub fn find_unit(&self, name: &str) -> Option<UnitId> {
        self.units.iter().find(|u| u.name == name).map(|u| u.id)
    }

    pub fn find_stream(&self, name: &str) -> Option<StreamId> {
        self.streams.iter().find(|s| s.name() == name).map(|s| s.id())
    }

    pub fn unit_name(&self, id: UnitId) -> &str {
        self.unit(id).map_or("?", |u| u.name.as_str())
    }

    pub fn stream_name(&self, id: StreamId) -> &str {
        self.stream(id).map_or("?", |s| s.name())
    }

    /// The unit writing `stream`, if any.
    pub fn producer(&self, stream: StreamId) -> Option<UnitId> {
        self.producers.get(stream.slot()).copied().flatten()
    }

    /// The unit reading `stream`, if any.
    pub fn consumer(&self, stream: StreamId) -> Option<UnitId> {
        self.consumers.get(stream.slot()).copied().flatten()
    }

    pub fn is_feed(&self, stream: StreamId) -> bool {
        self.feeds.contains(&stream)
    }

    /// Declared external feeds.
    pub fn feeds(&self) -> impl Iterator<Item = StreamId> + '_ {
        self.feeds.iter().copied()
    }

    /// Streams written by a unit and read by none.
    pub fn products(&self) -> impl Iterator<Item = StreamId> + '_ {
        self.streams
            .iter()
            .map(Stream::id)
            .filter(|&s| self.producer(s).is_some() && self.consumer(s).is_none())
    }

    /// Units reading any outlet of `unit`, in outlet slot order.
    pub fn downstream(&self, unit: UnitId) -> Vec<UnitId> {
        self.unit(unit)
            .map(|u| u.outs.iter().filter_map(|&s| self.consumer(s)).collect())
            .unwrap_or_default()
    }

    /// Evaluate one unit: copy its inlets, let the model write its outlet
    /// slots, then store the outlet states back into the arena. Nothing is
    /// stored if any outlet comes back with a different component count.
    pub fn evaluate(&mut self, id: UnitId) -> UnitResult<()> {
        let Self { streams, units, .. } = self;
        let node = units.get_mut(id.slot()).ok_or(UnitError::InvalidArg {
            what: "unit id not in flowsheet",
        })?;

        let ins: Vec<Stream> = node
            .ins
            .iter()
            .map(|s| streams[s.slot()].clone())
            .collect();
        let mut outs: Vec<Stream> = node
            .outs
            .iter()
            .map(|s| streams[s.slot()].clone())
            .collect();

        node.model.evaluate(&ins, &mut outs)?;

        let resized = node
            .outs
            .iter()
            .zip(&outs)
            .any(|(slot, out)| out.component_count() != streams[slot.slot()].component_count());
        if resized {
            return Err(UnitError::InvalidArg {
                what: "outlet component count changed during evaluation",
            });
        }
        for (slot, out) in node.outs.iter().zip(&outs) {
            streams[slot.slot()].copy_state_from(out);
        }
        Ok(())
    }
}
