//! The nested execution structure produced by [`crate::NetworkBuilder`].

use std::collections::BTreeSet;

use fs_core::{StreamId, UnitId};

use crate::flowsheet::Flowsheet;

/// One entry of a network: a unit, or a nested network.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Unit(UnitId),
    Network(Network),
}

impl From<UnitId> for Element {
    fn from(id: UnitId) -> Self {
        Element::Unit(id)
    }
}

impl From<Network> for Element {
    fn from(network: Network) -> Self {
        Element::Network(network)
    }
}

/// Ordered, recursively nested execution structure.
///
/// Elements run in stored order. A network with a non-empty `recycle` set
/// is a loop: its elements are swept repeatedly until the recycle streams
/// reach a fixed point. Any stream consumed by an element that precedes
/// its producer is in the `recycle` set of the smallest network enclosing
/// both.
///
/// Equality is structural: same elements in the same order (recursively)
/// and the same recycle set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Network {
    elements: Vec<Element>,
    recycle: BTreeSet<StreamId>,
}

impl Network {
    /// A straight-through network with no recycle.
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            recycle: BTreeSet::new(),
        }
    }

    /// A loop closed by the given recycle streams.
    pub fn with_recycle(
        elements: Vec<Element>,
        recycle: impl IntoIterator<Item = StreamId>,
    ) -> Self {
        Self {
            elements,
            recycle: recycle.into_iter().collect(),
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Recycle streams closing the loop at this level.
    pub fn recycle(&self) -> &BTreeSet<StreamId> {
        &self.recycle
    }

    pub fn has_recycle(&self) -> bool {
        !self.recycle.is_empty()
    }

    /// Units in execution order, nested networks expanded.
    pub fn path(&self) -> Vec<UnitId> {
        let mut path = Vec::with_capacity(self.elements.len());
        self.collect_path(&mut path);
        path
    }

    fn collect_path(&self, path: &mut Vec<UnitId>) {
        for element in &self.elements {
            match element {
                Element::Unit(id) => path.push(*id),
                Element::Network(inner) => inner.collect_path(path),
            }
        }
    }

    pub fn unit_count(&self) -> usize {
        self.elements
            .iter()
            .map(|e| match e {
                Element::Unit(_) => 1,
                Element::Network(inner) => inner.unit_count(),
            })
            .sum()
    }

    /// True if `unit` appears anywhere in this network.
    pub fn contains(&self, unit: UnitId) -> bool {
        self.elements.iter().any(|e| match e {
            Element::Unit(id) => *id == unit,
            Element::Network(inner) => inner.contains(unit),
        })
    }

    /// Directly nested networks, in order.
    pub fn nested(&self) -> impl Iterator<Item = &Network> {
        self.elements.iter().filter_map(|e| match e {
            Element::Network(inner) => Some(inner),
            Element::Unit(_) => None,
        })
    }

    /// Union of the recycle sets at every nesting level.
    pub fn all_recycles(&self) -> BTreeSet<StreamId> {
        let mut all = self.recycle.clone();
        for inner in self.nested() {
            all.extend(inner.all_recycles());
        }
        all
    }

    /// True if no element is a nested network.
    pub fn is_flat(&self) -> bool {
        self.nested().next().is_none()
    }

    /// Nesting depth; a flat network has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.nested().map(Network::depth).max().unwrap_or(0)
    }

    /// Collapse the tree into one flat sequence of units in path order.
    ///
    /// Every recycle stream of every level becomes a recycle of the flat
    /// network, so a converged flat network reaches the same fixed point as
    /// the nested one; only the inner-loops-first ordering is lost.
    pub fn flatten(&mut self) {
        let recycle = self.all_recycles();
        let path = self.path();
        self.elements = path.into_iter().map(Element::Unit).collect();
        self.recycle = recycle;
    }

    /// Render the tree with unit and stream names.
    pub fn describe(&self, flowsheet: &Flowsheet) -> String {
        let mut out = String::new();
        self.render(flowsheet, 0, &mut out);
        out
    }

    fn render(&self, flowsheet: &Flowsheet, base: usize, out: &mut String) {
        let pad = " ".repeat(base + 4);
        out.push_str("Network(\n");
        out.push_str(&pad);
        out.push('[');
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                out.push_str(",\n");
                out.push_str(&pad);
                out.push(' ');
            }
            match element {
                Element::Unit(id) => out.push_str(flowsheet.unit_name(*id)),
                Element::Network(inner) => inner.render(flowsheet, base + 5, out),
            }
        }
        out.push(']');
        if self.has_recycle() {
            let names: Vec<&str> = self
                .recycle
                .iter()
                .map(|&s| flowsheet.stream_name(s))
                .collect();
            out.push_str(",\n");
            out.push_str(&pad);
            out.push_str("recycle=");
            if names.len() == 1 {
                out.push_str(names[0]);
            } else {
                out.push('{');
                out.push_str(&names.join(", "));
                out.push('}');
            }
        }
        out.push(')');
    }
}
