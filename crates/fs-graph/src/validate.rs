//! Flowsheet wiring validation.

use std::collections::BTreeSet;

use fs_core::{StreamId, UnitId};

use crate::error::{GraphError, GraphResult};
use crate::flowsheet::UnitNode;
use crate::stream::Stream;

pub(crate) fn check_dimension(stream: &str, expected: usize, actual: usize) -> GraphResult<()> {
    if expected != actual {
        return Err(GraphError::DimensionMismatch {
            stream: stream.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_slots(unit: &UnitNode) -> GraphResult<()> {
    let declared = [
        ("inlets", unit.model.inlet_count(), unit.ins.len()),
        ("outlets", unit.model.outlet_count(), unit.outs.len()),
    ];
    for (what, expected, actual) in declared {
        if let Some(expected) = expected {
            if expected != actual {
                return Err(GraphError::SlotCount {
                    unit: unit.name.clone(),
                    what,
                    expected,
                    actual,
                });
            }
        }
    }
    Ok(())
}

/// Validate the wiring and return the producer and consumer of every stream.
///
/// Checks that:
/// - every referenced stream exists
/// - each unit matches its model's declared slot counts
/// - each stream has at most one producer and at most one consumer
/// - feeds are never written by a unit
pub(crate) fn validate_wiring(
    streams: &[Stream],
    units: &[UnitNode],
    feeds: &BTreeSet<StreamId>,
) -> GraphResult<(Vec<Option<UnitId>>, Vec<Option<UnitId>>)> {
    let mut producers: Vec<Option<UnitId>> = vec![None; streams.len()];
    let mut consumers: Vec<Option<UnitId>> = vec![None; streams.len()];

    for unit in units {
        check_slots(unit)?;

        for &s in unit.ins.iter().chain(&unit.outs) {
            if s.slot() >= streams.len() {
                return Err(GraphError::UnknownStream {
                    unit: unit.name.clone(),
                    stream: s,
                });
            }
        }

        for &s in &unit.outs {
            if feeds.contains(&s) {
                return Err(GraphError::ProducedFeed {
                    stream: streams[s.slot()].name().to_string(),
                    producer: unit.name.clone(),
                });
            }
            if let Some(first) = producers[s.slot()] {
                return Err(GraphError::MultipleProducers {
                    stream: streams[s.slot()].name().to_string(),
                    first: units[first.slot()].name.clone(),
                    second: unit.name.clone(),
                });
            }
            producers[s.slot()] = Some(unit.id);
        }

        for &s in &unit.ins {
            if let Some(first) = consumers[s.slot()] {
                return Err(GraphError::MultipleConsumers {
                    stream: streams[s.slot()].name().to_string(),
                    first: units[first.slot()].name.clone(),
                    second: unit.name.clone(),
                });
            }
            consumers[s.slot()] = Some(unit.id);
        }
    }

    Ok((producers, consumers))
}
