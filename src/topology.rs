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

//! The declared topology, i.e., the set of links that physically exist.

use std::collections::HashSet;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;

use crate::types::{EdgeId, NodeId, TopologyEdge, Weight};

/// Undirected graph of all declared links. Declaring the same link twice (in any direction)
/// keeps the weight of the last declaration.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    graph: UnGraphMap<NodeId, Weight>,
}

impl Topology {
    /// Create an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node without any link.
    pub fn add_node(&mut self, node: NodeId) {
        self.graph.add_node(node);
    }

    /// Add a link. Both endpoints are added as nodes if they do not exist yet.
    pub fn add_edge(&mut self, edge: TopologyEdge) {
        if self.graph.add_edge(edge.a, edge.b, edge.weight).is_some() {
            log::debug!("Link {} declared twice", edge.id());
        }
    }

    /// Returns `true` if the link exists, regardless of the direction.
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.graph.contains_edge(edge.low(), edge.high())
    }

    /// Get the weight of a link.
    pub fn weight(&self, edge: EdgeId) -> Option<Weight> {
        self.graph.edge_weight(edge.low(), edge.high()).copied()
    }

    /// Iterate over all nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.nodes().sorted()
    }

    /// Iterate over all links in ascending order of their canonical identity.
    pub fn edges(&self) -> impl Iterator<Item = TopologyEdge> + '_ {
        self.graph
            .all_edges()
            .map(|(a, b, weight)| TopologyEdge {
                a: a.min(b),
                b: a.max(b),
                weight: *weight,
            })
            .sorted_by_key(|e| e.id())
    }

    /// The set of canonical identities of all declared links.
    pub fn edge_ids(&self) -> HashSet<EdgeId> {
        self.graph
            .all_edges()
            .map(|(a, b, _)| EdgeId::new(a, b))
            .collect()
    }

    /// Number of declared links
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }
}

impl FromIterator<TopologyEdge> for Topology {
    fn from_iter<T: IntoIterator<Item = TopologyEdge>>(iter: T) -> Self {
        let mut topo = Self::new();
        iter.into_iter().for_each(|e| topo.add_edge(e));
        topo
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use maplit::hashset;
    use pretty_assertions::assert_eq;

    #[test]
    fn edges_are_undirected() {
        let topo: Topology = ["1 2 10", "3 2 5", "2 1 7"]
            .into_iter()
            .map(|s| s.parse().unwrap())
            .collect();

        assert_eq!(topo.num_edges(), 2);
        assert!(topo.contains(EdgeId::new(2, 1)));
        assert!(topo.contains(EdgeId::new(2, 3)));
        assert!(!topo.contains(EdgeId::new(1, 3)));
        assert_eq!(topo.weight(EdgeId::new(1, 2)), Some(7));
        assert_eq!(
            topo.edge_ids(),
            hashset! {EdgeId::new(1, 2), EdgeId::new(2, 3)}
        );
        assert_eq!(topo.nodes().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(
            topo.edges().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec!["1 2 7", "2 3 5"]
        );
    }
}
