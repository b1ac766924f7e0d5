//! Shared helpers for fs-graph integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use fs_core::{StreamId, UnitId};
use fs_graph::{Element, Flowsheet, FlowsheetBuilder, Network, Stream, Unit, UnitResult};

/// Wiring-only unit; decomposition never evaluates anything.
pub struct Block;

impl Unit for Block {
    fn kind(&self) -> &'static str {
        "Block"
    }

    fn evaluate(&mut self, _ins: &[Stream], _outs: &mut [Stream]) -> UnitResult<()> {
        Ok(())
    }
}

/// Builds flowsheets by stream name.
pub struct Sheet {
    builder: FlowsheetBuilder,
    streams: HashMap<String, StreamId>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            builder: FlowsheetBuilder::new(name, 1),
            streams: HashMap::new(),
        }
    }

    pub fn feed(&mut self, name: &str) {
        let id = self.builder.add_feed(name, &[1.0]);
        self.streams.insert(name.to_string(), id);
    }

    pub fn stream(&mut self, name: &str) -> StreamId {
        if let Some(&id) = self.streams.get(name) {
            return id;
        }
        let id = self.builder.add_stream(name);
        self.streams.insert(name.to_string(), id);
        id
    }

    pub fn unit(&mut self, name: &str, ins: &[&str], outs: &[&str]) -> UnitId {
        let ins: Vec<StreamId> = ins.iter().map(|s| self.stream(s)).collect();
        let outs: Vec<StreamId> = outs.iter().map(|s| self.stream(s)).collect();
        self.builder.add_unit(name, Block, &ins, &outs)
    }

    pub fn build(self) -> Flowsheet {
        self.builder.build().unwrap()
    }
}

/// Compact rendering: `[A, B, ([C, D] / r)]`.
pub fn shape(flowsheet: &Flowsheet, network: &Network) -> String {
    let inner: Vec<String> = network
        .elements()
        .iter()
        .map(|e| match e {
            Element::Unit(id) => flowsheet.unit_name(*id).to_string(),
            Element::Network(n) => format!("({})", shape(flowsheet, n)),
        })
        .collect();
    let body = format!("[{}]", inner.join(", "));
    if network.has_recycle() {
        let names: Vec<&str> = network
            .recycle()
            .iter()
            .map(|&s| flowsheet.stream_name(s))
            .collect();
        format!("{body} / {}", names.join(","))
    } else {
        body
    }
}

pub fn names(flowsheet: &Flowsheet, path: &[UnitId]) -> Vec<String> {
    path.iter()
        .map(|&u| flowsheet.unit_name(u).to_string())
        .collect()
}

/// Every edge whose consumer runs no later than its producer must be a
/// recycle of the innermost network holding both units.
pub fn assert_cycles_captured(flowsheet: &Flowsheet, network: &Network) {
    fn check(flowsheet: &Flowsheet, network: &Network) {
        let path = network.path();
        let position: HashMap<UnitId, usize> =
            path.iter().enumerate().map(|(i, &u)| (u, i)).collect();
        let holder = |u: UnitId| {
            network.elements().iter().position(|e| match e {
                Element::Unit(id) => *id == u,
                Element::Network(n) => n.contains(u),
            })
        };
        for &u in &path {
            let node = flowsheet.unit(u).unwrap();
            for &s in &node.ins {
                let Some(p) = flowsheet.producer(s) else {
                    continue;
                };
                if !network.contains(p) {
                    continue;
                }
                let same_child = holder(p) == holder(u)
                    && matches!(network.elements()[holder(u).unwrap()], Element::Network(_));
                if same_child {
                    continue;
                }
                if position[&p] >= position[&u] {
                    assert!(
                        network.recycle().contains(&s),
                        "stream {} closes a cycle but is not a recycle",
                        flowsheet.stream_name(s)
                    );
                }
            }
        }
        for inner in network.nested() {
            check(flowsheet, inner);
        }
    }
    check(flowsheet, network);
}
