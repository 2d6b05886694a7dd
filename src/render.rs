// RouteVis: Reconstructing and classifying distance-vector forwarding paths
// Copyright (C) 2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Rendering
//!
//! The graph itself is drawn by an external renderer. This module translates a
//! [`Classification`] into the element IDs and class names that renderer understands, and
//! drives it through the [`RenderSink`] trait. Nodes are identified as `n<id>`, links as
//! `e<low>-<high>`.
//!
//! [`Scene`] is an in-memory [`RenderSink`], which can be serialized to JSON.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Serialize, Serializer};
use strum_macros::{Display, EnumIter};

use crate::{
    classifier::Classification,
    snapshot::Snapshot,
    types::{Direction, EdgeId, NodeId, Weight},
};

/// Identifier of an element in the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    /// A node, rendered as `n<id>`
    Node(NodeId),
    /// A link, rendered as `e<low>-<high>`
    Edge(EdgeId),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(n) => write!(f, "n{n}"),
            Self::Edge(e) => write!(f, "e{e}"),
        }
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Class attached to an element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ElementClass {
    /// Consistent link or node
    Ok,
    /// Inconsistent link or node
    Infeasible,
    /// Link that does not exist in the topology
    Fake,
    /// Link traversed from the lower to the higher id
    Forward,
    /// Link traversed from the higher to the lower id
    Backward,
}

impl From<Direction> for ElementClass {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Forward => Self::Forward,
            Direction::Backward => Self::Backward,
        }
    }
}

/// Receiver of render instructions.
pub trait RenderSink {
    /// Create a node element.
    fn add_node(&mut self, node: NodeId, label: &str);

    /// Create a link element. `weight` is `None` for placeholder links that are not part of the
    /// topology.
    fn add_edge(&mut self, edge: EdgeId, weight: Option<Weight>);

    /// Remove an element.
    fn remove(&mut self, id: ElementId);

    /// Replace the classes of an element.
    fn set_classes(&mut self, id: ElementId, classes: BTreeSet<ElementClass>);
}

/// Create an element for every node and link of the topology.
pub fn draw_topology<S: RenderSink + ?Sized>(snapshot: &Snapshot, sink: &mut S) {
    for node in snapshot.topology().nodes() {
        sink.add_node(node, &snapshot.label(node));
    }
    for edge in snapshot.topology().edges() {
        sink.add_edge(edge.id(), Some(edge.weight));
    }
}

/// The render instructions for a single classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderPlan {
    /// Classes of every element touched by the classification.
    pub classes: BTreeMap<ElementId, BTreeSet<ElementClass>>,
    /// Placeholder links that must be created before classes are applied.
    pub synthetic_edges: Vec<EdgeId>,
}

impl RenderPlan {
    /// Translate a classification into classes.
    pub fn new(classification: &Classification) -> Self {
        let mut classes: BTreeMap<ElementId, BTreeSet<ElementClass>> = BTreeMap::new();
        let mut add = |id: ElementId, class: ElementClass| {
            classes.entry(id).or_default().insert(class);
        };

        for edge in &classification.consistent_links {
            add(ElementId::Edge(*edge), ElementClass::Ok);
        }
        // fabricated links are only drawn as fake
        for edge in classification
            .inconsistent_links
            .difference(&classification.fabricated_links)
        {
            add(ElementId::Edge(*edge), ElementClass::Infeasible);
        }
        for edge in &classification.fabricated_links {
            add(ElementId::Edge(*edge), ElementClass::Fake);
        }
        for (edge, dir) in &classification.directions {
            add(ElementId::Edge(*edge), (*dir).into());
        }
        for node in &classification.consistent_nodes {
            add(ElementId::Node(*node), ElementClass::Ok);
        }
        for node in &classification.inconsistent_nodes {
            add(ElementId::Node(*node), ElementClass::Infeasible);
        }

        Self {
            classes,
            synthetic_edges: classification.synthetic_edges.clone(),
        }
    }

    /// Create the placeholder links and set all classes.
    pub fn apply<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for edge in &self.synthetic_edges {
            sink.add_edge(*edge, None);
        }
        for (id, classes) in &self.classes {
            sink.set_classes(*id, classes.clone());
        }
    }

    /// Undo [`RenderPlan::apply`]: clear all classes and remove the placeholder links.
    pub fn revert<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for id in self.classes.keys() {
            sink.set_classes(*id, BTreeSet::new());
        }
        for edge in &self.synthetic_edges {
            sink.remove(ElementId::Edge(*edge));
        }
    }
}

/// Kind of a rendered element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKind {
    /// A node with its label
    Node {
        /// Displayed label
        label: String,
    },
    /// A link with its weight, or a placeholder link without weight.
    Edge {
        /// Link weight, `None` for placeholders.
        weight: Option<Weight>,
    },
}

/// A rendered element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// What is drawn
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Current classes
    pub classes: BTreeSet<ElementClass>,
}

/// In-memory renderer state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scene {
    elements: BTreeMap<ElementId, Element>,
}

impl Scene {
    /// Create a scene containing the topology of the snapshot.
    pub fn new(snapshot: &Snapshot) -> Self {
        let mut scene = Self::default();
        draw_topology(snapshot, &mut scene);
        scene
    }

    /// Get an element
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get the classes of an element. Returns an empty set for unknown elements.
    pub fn classes(&self, id: ElementId) -> BTreeSet<ElementClass> {
        self.elements
            .get(&id)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    /// Iterate over all elements
    pub fn elements(&self) -> impl Iterator<Item = (&ElementId, &Element)> {
        self.elements.iter()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl RenderSink for Scene {
    fn add_node(&mut self, node: NodeId, label: &str) {
        self.elements.insert(
            ElementId::Node(node),
            Element {
                kind: ElementKind::Node {
                    label: label.to_string(),
                },
                classes: Default::default(),
            },
        );
    }

    fn add_edge(&mut self, edge: EdgeId, weight: Option<Weight>) {
        // never replace a declared link by a placeholder
        self.elements
            .entry(ElementId::Edge(edge))
            .or_insert_with(|| Element {
                kind: ElementKind::Edge { weight },
                classes: Default::default(),
            });
    }

    fn remove(&mut self, id: ElementId) {
        // only placeholders may disappear
        if let Some(Element {
            kind: ElementKind::Edge { weight: None },
            ..
        }) = self.elements.get(&id)
        {
            self.elements.remove(&id);
        }
    }

    fn set_classes(&mut self, id: ElementId, classes: BTreeSet<ElementClass>) {
        match self.elements.get_mut(&id) {
            Some(e) => e.classes = classes,
            None => log::warn!("Cannot set classes of the missing element {id}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use maplit::btreeset;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn element_names() {
        assert_eq!(ElementId::Node(3).to_string(), "n3");
        assert_eq!(ElementId::Edge(EdgeId::new(4, 1)).to_string(), "e1-4");
        assert_eq!(
            ElementClass::iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            vec!["ok", "infeasible", "fake", "forward", "backward"]
        );
        assert_eq!(
            serde_json::to_string(&ElementClass::Infeasible).unwrap(),
            "\"infeasible\""
        );
    }

    #[test]
    fn scene_keeps_declared_links() {
        let mut scene = Scene::default();
        scene.add_edge(EdgeId::new(1, 2), Some(10));
        scene.add_edge(EdgeId::new(1, 2), None);
        scene.remove(ElementId::Edge(EdgeId::new(1, 2)));
        assert_eq!(
            scene.get(ElementId::Edge(EdgeId::new(1, 2))).map(|e| &e.kind),
            Some(&ElementKind::Edge { weight: Some(10) })
        );

        scene.add_edge(EdgeId::new(1, 4), None);
        scene.set_classes(ElementId::Edge(EdgeId::new(1, 4)), btreeset! {ElementClass::Fake});
        assert_eq!(
            scene.classes(ElementId::Edge(EdgeId::new(1, 4))),
            btreeset! {ElementClass::Fake}
        );
        scene.remove(ElementId::Edge(EdgeId::new(1, 4)));
        assert_eq!(scene.get(ElementId::Edge(EdgeId::new(1, 4))), None);
        assert_eq!(scene.len(), 1);
    }
}
