//! Recycle-aware decomposition of a flowsheet into a nested [`Network`].
//!
//! 1. Units are nodes; every stream produced by one member and consumed by
//!    another is an edge.
//! 2. Strongly connected components are found with Tarjan's algorithm.
//! 3. Components are ordered topologically with Kahn's algorithm, always
//!    releasing the ready component whose first unit was inserted earliest.
//! 4. Each cyclic component becomes a nested network. Its *entry* is the
//!    earliest-inserted member fed from outside the component; the recycle
//!    set is every internal stream consumed by the entry. Those are exactly
//!    the back edges to the root of a depth-first walk started at the
//!    entry, so removing them leaves the entry outside every remaining
//!    cycle. The rest of the component is decomposed again, which is where
//!    inner loops come from.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, VecDeque};

use fs_core::{StreamId, UnitId};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::flowsheet::Flowsheet;
use crate::network::{Element, Network};

/// A producer -> consumer connection through one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    from: UnitId,
    to: UnitId,
    stream: StreamId,
}

/// Builds the nested [`Network`] of a flowsheet.
///
/// The result depends only on the wiring and on insertion order, so
/// building twice yields structurally equal networks.
#[derive(Debug, Clone, Copy)]
pub struct NetworkBuilder<'a> {
    flowsheet: &'a Flowsheet,
}

/// Build the network of every unit downstream of `seeds` (seeds included).
pub fn build_network(flowsheet: &Flowsheet, seeds: &[UnitId]) -> GraphResult<Network> {
    NetworkBuilder::new(flowsheet).build_from(seeds)
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(flowsheet: &'a Flowsheet) -> Self {
        Self { flowsheet }
    }

    /// Build the network of the whole flowsheet.
    pub fn build(&self) -> GraphResult<Network> {
        let all: Vec<UnitId> = self.flowsheet.unit_ids().collect();
        self.build_from(&all)
    }

    /// Build the network of every unit reachable from `seeds`.
    ///
    /// Fails with [`GraphError::DisconnectedGraph`] when a member consumes a
    /// non-feed stream whose producer is not a member.
    pub fn build_from(&self, seeds: &[UnitId]) -> GraphResult<Network> {
        let members = self.reachable(seeds)?;
        self.check_connectivity(&members)?;

        let members: Vec<UnitId> = members.into_iter().collect();
        let edges = self.internal_edges(&members);
        debug!(
            flowsheet = self.flowsheet.name(),
            units = members.len(),
            connections = edges.len(),
            "decomposing flowsheet"
        );

        let mut elements = self.decompose(&members, &edges)?;

        // A flowsheet that is one loop is that loop, not a wrapper around it.
        if let [Element::Network(_)] = elements.as_slice() {
            if let Some(Element::Network(root)) = elements.pop() {
                return Ok(root);
            }
        }
        Ok(Network::new(elements))
    }

    /// Downstream closure of `seeds`.
    fn reachable(&self, seeds: &[UnitId]) -> GraphResult<BTreeSet<UnitId>> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        for &seed in seeds {
            if self.flowsheet.unit(seed).is_none() {
                return Err(GraphError::UnknownUnit { unit: seed });
            }
            if seen.insert(seed) {
                queue.push_back(seed);
            }
        }
        while let Some(unit) = queue.pop_front() {
            for next in self.flowsheet.downstream(unit) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        Ok(seen)
    }

    fn check_connectivity(&self, members: &BTreeSet<UnitId>) -> GraphResult<()> {
        for &unit in members {
            let Some(node) = self.flowsheet.unit(unit) else {
                return Err(GraphError::UnknownUnit { unit });
            };
            for &stream in &node.ins {
                if self.flowsheet.is_feed(stream) {
                    continue;
                }
                match self.flowsheet.producer(stream) {
                    Some(p) if members.contains(&p) => {}
                    _ => {
                        return Err(GraphError::DisconnectedGraph {
                            stream: self.flowsheet.stream_name(stream).to_string(),
                            consumer: node.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Edges between members, ordered by producer then outlet slot.
    fn internal_edges(&self, members: &[UnitId]) -> Vec<Edge> {
        let set: BTreeSet<UnitId> = members.iter().copied().collect();
        let mut edges = Vec::new();
        for &from in members {
            let Some(node) = self.flowsheet.unit(from) else {
                continue;
            };
            for &stream in &node.outs {
                if let Some(to) = self.flowsheet.consumer(stream) {
                    if set.contains(&to) {
                        edges.push(Edge { from, to, stream });
                    }
                }
            }
        }
        edges
    }

    /// Order `members` (sorted by id) into elements, nesting every cycle.
    fn decompose(&self, members: &[UnitId], edges: &[Edge]) -> GraphResult<Vec<Element>> {
        let mut graph: DiGraph<UnitId, StreamId> =
            DiGraph::with_capacity(members.len(), edges.len());
        let index: HashMap<UnitId, NodeIndex> =
            members.iter().map(|&u| (u, graph.add_node(u))).collect();
        for e in edges {
            graph.add_edge(index[&e.from], index[&e.to], e.stream);
        }

        let components: Vec<Vec<UnitId>> = tarjan_scc(&graph)
            .into_iter()
            .map(|scc| {
                let mut units: Vec<UnitId> = scc.into_iter().map(|n| graph[n]).collect();
                units.sort();
                units
            })
            .collect();

        let mut component_of: HashMap<UnitId, usize> = HashMap::with_capacity(members.len());
        for (i, component) in components.iter().enumerate() {
            for &u in component {
                component_of.insert(u, i);
            }
        }

        // Condensed graph
        let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); components.len()];
        let mut in_degree = vec![0_usize; components.len()];
        for e in edges {
            let (a, b) = (component_of[&e.from], component_of[&e.to]);
            if a != b && successors[a].insert(b) {
                in_degree[b] += 1;
            }
        }

        // Kahn's algorithm, earliest-inserted leading unit first
        let mut ready: BinaryHeap<Reverse<(UnitId, usize)>> = components
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] == 0)
            .map(|(i, c)| Reverse((c[0], i)))
            .collect();

        let mut elements = Vec::with_capacity(components.len());
        while let Some(Reverse((_, i))) = ready.pop() {
            let component = &components[i];
            let inner: Vec<Edge> = edges
                .iter()
                .filter(|e| component_of[&e.from] == i && component_of[&e.to] == i)
                .copied()
                .collect();

            if inner.is_empty() {
                elements.push(Element::Unit(component[0]));
            } else {
                elements.push(Element::Network(self.close_loop(component, &inner)?));
            }

            for &j in &successors[i] {
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.push(Reverse((components[j][0], j)));
                }
            }
        }

        if elements.len() != components.len() {
            return Err(GraphError::Invariant {
                what: "condensed unit graph is not acyclic",
            });
        }
        Ok(elements)
    }

    /// Turn one strongly connected component into a recycle network.
    fn close_loop(&self, members: &[UnitId], edges: &[Edge]) -> GraphResult<Network> {
        let set: BTreeSet<UnitId> = members.iter().copied().collect();
        let entry = self
            .entry_unit(members, &set)
            .ok_or(GraphError::Invariant {
                what: "cyclic component has no members",
            })?;

        let recycle: BTreeSet<StreamId> = edges
            .iter()
            .filter(|e| e.to == entry)
            .map(|e| e.stream)
            .collect();
        if recycle.is_empty() {
            return Err(GraphError::AmbiguousRecycleCut {
                units: members
                    .iter()
                    .map(|&u| self.flowsheet.unit_name(u).to_string())
                    .collect(),
            });
        }

        debug!(
            entry = self.flowsheet.unit_name(entry),
            recycle = ?recycle
                .iter()
                .map(|&s| self.flowsheet.stream_name(s))
                .collect::<Vec<_>>(),
            units = members.len(),
            "closing recycle loop"
        );

        let remaining: Vec<Edge> = edges.iter().filter(|e| e.to != entry).copied().collect();
        let elements = self.decompose(members, &remaining)?;
        Ok(Network::with_recycle(elements, recycle))
    }

    /// Earliest member with an inlet from outside the component, else the earliest member.
    fn entry_unit(&self, members: &[UnitId], set: &BTreeSet<UnitId>) -> Option<UnitId> {
        members
            .iter()
            .copied()
            .find(|&u| {
                self.flowsheet.unit(u).is_some_and(|node| {
                    node.ins.iter().any(|&s| {
                        self.flowsheet
                            .producer(s)
                            .is_none_or(|p| !set.contains(&p))
                    })
                })
            })
            .or_else(|| members.first().copied())
    }
}
