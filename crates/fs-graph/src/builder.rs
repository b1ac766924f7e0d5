//! Incremental flowsheet builder.

use std::collections::BTreeSet;

use fs_core::{Pressure, Real, StreamId, Temperature, UnitId};
use nalgebra::DVector;

use crate::error::GraphResult;
use crate::flowsheet::{Flowsheet, UnitNode};
use crate::stream::Stream;
use crate::unit::Unit;
use crate::validate;

/// Builder for constructing a flowsheet incrementally.
///
/// Streams and units get ids in insertion order. That order is the
/// deterministic tie-break used later when ordering units in a network,
/// so declare units roughly in process order.
pub struct FlowsheetBuilder {
    name: String,
    n_components: usize,
    streams: Vec<Stream>,
    /// Feed flows as given, checked against `n_components` at build time.
    feed_flows: Vec<(StreamId, Vec<Real>)>,
    feeds: BTreeSet<StreamId>,
    units: Vec<UnitNode>,
}

impl FlowsheetBuilder {
    /// Create a new empty builder for streams carrying `n_components` components.
    pub fn new(name: impl Into<String>, n_components: usize) -> Self {
        Self {
            name: name.into(),
            n_components,
            streams: Vec::new(),
            feed_flows: Vec::new(),
            feeds: BTreeSet::new(),
            units: Vec::new(),
        }
    }

    fn next_stream_id(&self) -> StreamId {
        StreamId::from_index(self.streams.len() as u32)
    }

    /// Add an internal stream (recycle, intermediate or product) and return its ID.
    pub fn add_stream(&mut self, name: impl Into<String>) -> StreamId {
        let id = self.next_stream_id();
        self.streams.push(Stream::new(id, name, self.n_components));
        id
    }

    /// Add an external feed with the given component flows.
    pub fn add_feed(&mut self, name: impl Into<String>, mol: &[Real]) -> StreamId {
        let id = self.add_stream(name);
        self.feeds.insert(id);
        self.feed_flows.push((id, mol.to_vec()));
        id
    }

    /// Set the temperature of a stream (typically a feed).
    pub fn set_temperature(&mut self, stream: StreamId, temperature: Temperature) {
        if let Some(s) = self.streams.get_mut(stream.slot()) {
            s.set_temperature(temperature);
        }
    }

    /// Set the pressure of a stream (typically a feed).
    pub fn set_pressure(&mut self, stream: StreamId, pressure: Pressure) {
        if let Some(s) = self.streams.get_mut(stream.slot()) {
            s.set_pressure(pressure);
        }
    }

    /// Add a unit reading `ins` and writing `outs` (slot order matters).
    pub fn add_unit(
        &mut self,
        name: impl Into<String>,
        model: impl Unit + 'static,
        ins: &[StreamId],
        outs: &[StreamId],
    ) -> UnitId {
        let id = UnitId::from_index(self.units.len() as u32);
        self.units.push(UnitNode {
            id,
            name: name.into(),
            ins: ins.to_vec(),
            outs: outs.to_vec(),
            model: Box::new(model),
        });
        id
    }


    /// Validate the wiring and freeze it into a `Flowsheet`.
    pub fn build(mut self) -> GraphResult<Flowsheet> {
        for (id, flows) in &self.feed_flows {
            let stream = &mut self.streams[id.slot()];
            validate::check_dimension(stream.name(), self.n_components, flows.len())?;
            stream.set_mol(DVector::from_column_slice(flows));
        }

        let (producers, consumers) =
            validate::validate_wiring(&self.streams, &self.units, &self.feeds)?;

        Ok(Flowsheet {
            name: self.name,
            n_components: self.n_components,
            streams: self.streams,
            units: self.units,
            feeds: self.feeds,
            producers,
            consumers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::unit::{UnitError, UnitResult};
    use fs_core::k;

    struct Tee;

    impl Unit for Tee {
        fn kind(&self) -> &'static str {
            "Tee"
        }

        fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()> {
            for out in outs.iter_mut() {
                out.copy_state_from(&ins[0]);
            }
            Ok(())
        }
    }

    #[test]
    fn builder_assigns_ids_in_order() {
        let mut b = FlowsheetBuilder::new("fs", 1);
        let feed = b.add_feed("feed", &[5.0]);
        let mid = b.add_stream("mid");
        let u1 = b.add_unit("U1", Tee, &[feed], &[mid]);
        let u2 = b.add_unit("U2", Tee, &[mid], &[]);

        assert_eq!(feed.index(), 0);
        assert_eq!(mid.index(), 1);
        assert_eq!(u1.index(), 0);
        assert_eq!(u2.index(), 1);
    }

    #[test]
    fn build_records_producers_and_consumers() {
        let mut b = FlowsheetBuilder::new("fs", 2);
        let feed = b.add_feed("feed", &[1.0, 2.0]);
        b.set_temperature(feed, k(320.0));
        let mid = b.add_stream("mid");
        let out = b.add_stream("out");
        let u1 = b.add_unit("U1", Tee, &[feed], &[mid]);
        let u2 = b.add_unit("U2", Tee, &[mid], &[out]);
        let fs = b.build().unwrap();

        assert_eq!(fs.producer(mid), Some(u1));
        assert_eq!(fs.consumer(mid), Some(u2));
        assert_eq!(fs.producer(feed), None);
        assert!(fs.is_feed(feed));
        assert_eq!(fs.products().collect::<Vec<_>>(), vec![out]);
        assert_eq!(fs.stream(feed).unwrap().mol().as_slice(), &[1.0, 2.0]);
        assert_eq!(fs.stream(feed).unwrap().temperature().value, 320.0);
        assert_eq!(fs.find_unit("U2"), Some(u2));
        assert_eq!(fs.find_stream("out"), Some(out));
    }

    #[test]
    fn build_rejects_feed_dimension_mismatch() {
        let mut b = FlowsheetBuilder::new("fs", 2);
        b.add_feed("feed", &[1.0]);
        let err = b.build().unwrap_err();
        assert!(matches!(
            err,
            GraphError::DimensionMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn evaluate_writes_outlets_back() {
        let mut b = FlowsheetBuilder::new("fs", 1);
        let feed = b.add_feed("feed", &[7.0]);
        let a = b.add_stream("a");
        let c = b.add_stream("c");
        let u = b.add_unit("T", Tee, &[feed], &[a, c]);
        let mut fs = b.build().unwrap();

        fs.evaluate(u).unwrap();
        assert_eq!(fs.stream(a).unwrap().total_flow(), 7.0);
        assert_eq!(fs.stream(c).unwrap().total_flow(), 7.0);
        assert_eq!(fs.stream(c).unwrap().name(), "c");
    }

    /// Copies its inlet to the first outlet and widens the second.
    struct Widen;

    impl Unit for Widen {
        fn kind(&self) -> &'static str {
            "Widen"
        }

        fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()> {
            outs[0].copy_state_from(&ins[0]);
            *outs[1].mol_mut() = DVector::zeros(3);
            Ok(())
        }
    }

    #[test]
    fn evaluate_rejects_resized_outlet_without_writing() {
        let mut b = FlowsheetBuilder::new("fs", 1);
        let feed = b.add_feed("feed", &[7.0]);
        let a = b.add_stream("a");
        let c = b.add_stream("c");
        let u = b.add_unit("W", Widen, &[feed], &[a, c]);
        let mut fs = b.build().unwrap();

        let err = fs.evaluate(u).unwrap_err();
        assert!(matches!(err, UnitError::InvalidArg { .. }));
        assert_eq!(fs.stream(a).unwrap().total_flow(), 0.0);
        assert_eq!(fs.stream(c).unwrap().component_count(), 1);
    }
}
