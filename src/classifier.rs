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

//! # Link Classifier
//!
//! Resolves the paths from a focal node to every other node, and labels all links and nodes
//! along these paths:
//!
//! - A link is *consistent* if any path reaches both endpoints with a finite metric, and
//!   *inconsistent* otherwise.
//! - A link is *fabricated* if it does not exist in the declared topology. Both endpoints of a
//!   fabricated link are inconsistent, no matter what any path says about them.
//! - A node is *consistent* if it is reached with a finite metric, and *inconsistent* otherwise.
//!   Every destination to which the focal node itself advertises an infinite metric is
//!   inconsistent as well. A node that any path reaches with an infinite metric stays
//!   inconsistent.
//!
//! If a walk stops at a node that knows no route to the destination, the hops taken up to that
//! node are labelled all the same. Forwarding loops and exceeded hop budgets label nothing.
//!
//! The classifier has no side effects. Links that must be materialized by the renderer (because
//! they do not exist in the topology) are listed in [`Classification::synthetic_edges`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    config::Config,
    resolver::PathResolver,
    snapshot::Snapshot,
    types::{Direction, EdgeId, Metric, NodeId, ResolveError, ResolvedPath, RouteTables, INF},
};

/// Result of classifying all paths from a focal node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The node from which all paths start.
    pub focal: NodeId,
    /// Links on which both endpoints are reached with a finite metric.
    pub consistent_links: BTreeSet<EdgeId>,
    /// Links on which any endpoint is reached with an infinite metric, and all fabricated links.
    pub inconsistent_links: BTreeSet<EdgeId>,
    /// Links that are traversed but absent from the topology.
    pub fabricated_links: BTreeSet<EdgeId>,
    /// Nodes that are reached with a finite metric.
    pub consistent_nodes: BTreeSet<NodeId>,
    /// Nodes reached with an infinite metric, or incident to a fabricated link.
    pub inconsistent_nodes: BTreeSet<NodeId>,
    /// Arrow orientation of every traversed link.
    pub directions: BTreeMap<EdgeId, Direction>,
    /// Fabricated links in the order they were discovered. The renderer must create a
    /// placeholder for each of them.
    pub synthetic_edges: Vec<EdgeId>,
    /// The successfully resolved path towards each destination.
    pub paths: BTreeMap<NodeId, ResolvedPath>,
    /// Destinations for which no path could be resolved.
    pub failures: BTreeMap<NodeId, ResolveError>,
}

/// Label of a single link or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Reached with a finite metric
    Consistent,
    /// Reached with an infinite metric
    Inconsistent,
    /// Not part of the declared topology (links only)
    Fabricated,
}

impl Classification {
    fn new(focal: NodeId) -> Self {
        Self {
            focal,
            consistent_links: Default::default(),
            inconsistent_links: Default::default(),
            fabricated_links: Default::default(),
            consistent_nodes: Default::default(),
            inconsistent_nodes: Default::default(),
            directions: Default::default(),
            synthetic_edges: Default::default(),
            paths: Default::default(),
            failures: Default::default(),
        }
    }

    /// Get the label of a link, or `None` if no path traverses it.
    pub fn link_label(&self, edge: EdgeId) -> Option<Label> {
        if self.fabricated_links.contains(&edge) {
            Some(Label::Fabricated)
        } else if self.inconsistent_links.contains(&edge) {
            Some(Label::Inconsistent)
        } else if self.consistent_links.contains(&edge) {
            Some(Label::Consistent)
        } else {
            None
        }
    }

    /// Get the label of a node, or `None` if it is neither traversed nor pre-marked.
    pub fn node_label(&self, node: NodeId) -> Option<Label> {
        if self.inconsistent_nodes.contains(&node) {
            Some(Label::Inconsistent)
        } else if self.consistent_nodes.contains(&node) {
            Some(Label::Consistent)
        } else {
            None
        }
    }

    /// Iterate over all traversed links.
    pub fn traversed_links(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.consistent_links
            .iter()
            .chain(self.inconsistent_links.iter())
            .copied()
    }

    /// Mark a node as either consistent or inconsistent. Once inconsistent, a node stays
    /// inconsistent.
    fn mark_node(&mut self, node: NodeId, good: bool) {
        if good {
            if !self.inconsistent_nodes.contains(&node) {
                self.consistent_nodes.insert(node);
            }
        } else {
            self.consistent_nodes.remove(&node);
            self.inconsistent_nodes.insert(node);
        }
    }

    /// Mark a link as either consistent or inconsistent. Once consistent, a link stays
    /// consistent, until it is found to be fabricated.
    fn mark_link(&mut self, edge: EdgeId, good: bool) {
        if good {
            self.inconsistent_links.remove(&edge);
            self.consistent_links.insert(edge);
        } else if !self.consistent_links.contains(&edge) {
            self.inconsistent_links.insert(edge);
        }
    }

    /// Force a link (and both its endpoints) to be inconsistent.
    fn mark_fabricated(&mut self, edge: EdgeId) {
        self.consistent_links.remove(&edge);
        self.inconsistent_links.insert(edge);
        self.mark_node(edge.low(), false);
        self.mark_node(edge.high(), false);
        self.fabricated_links.insert(edge);
        self.synthetic_edges.push(edge);
    }
}

/// Classifies the paths from a focal node towards all other nodes.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    resolver: PathResolver<'a>,
    tables: &'a RouteTables,
    known_edges: &'a HashSet<EdgeId>,
    premark_infeasible: bool,
}

impl<'a> Classifier<'a> {
    /// Create a new classifier on the given route tables and set of declared links.
    pub fn new(tables: &'a RouteTables, known_edges: &'a HashSet<EdgeId>) -> Self {
        Self {
            resolver: PathResolver::new(tables),
            tables,
            known_edges,
            premark_infeasible: true,
        }
    }

    /// Apply the options of the configuration.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.resolver = self.resolver.with_max_hops(config.max_hops);
        self.premark_infeasible = config.premark_infeasible;
        self
    }

    /// Resolve the path from `focal` to every node in `nodes` (except `focal` itself) and
    /// classify all links and nodes along them.
    pub fn classify(
        &self,
        focal: NodeId,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Classification {
        let mut result = Classification::new(focal);

        // the focal node may directly report a destination as infeasible.
        if self.premark_infeasible {
            self.tables
                .get(&focal)
                .into_iter()
                .flatten()
                .filter(|r| !r.self_flag && r.is_infeasible())
                .for_each(|r| result.mark_node(r.destination, false));
        }

        let mut fabricated: Vec<EdgeId> = Vec::new();

        for dst in nodes.into_iter().filter(|n| *n != focal).unique() {
            match self.resolver.resolve(focal, dst) {
                Ok(path) => {
                    self.mark_hops(&mut result, &mut fabricated, &path);
                    result.paths.insert(dst, path);
                }
                Err(e) => {
                    log::debug!("No path from {focal} to {dst}: {e}");
                    // the hops up to the node without a route are still taken.
                    if let ResolveError::NoRoute(path) = &e {
                        let taken = &path[..path.len().saturating_sub(1)];
                        self.mark_hops(&mut result, &mut fabricated, taken);
                    }
                    result.failures.insert(dst, e);
                }
            }
        }

        // fabricated links override everything else, so they must be applied last.
        for edge in fabricated {
            log::debug!("Path from {focal} traverses the non-existing link {edge}");
            result.mark_fabricated(edge);
        }

        result
    }

    /// Label all hops of a (partial) path. Links absent from the topology are collected in
    /// `fabricated`, in the order they are found.
    fn mark_hops(
        &self,
        result: &mut Classification,
        fabricated: &mut Vec<EdgeId>,
        path: &[(NodeId, Metric)],
    ) {
        for (&(a, cost_a), &(b, cost_b)) in path.iter().tuple_windows() {
            let edge = EdgeId::new(a, b);
            let good_a = cost_a != INF;
            let good_b = cost_b != INF;

            result.mark_link(edge, good_a && good_b);
            result.mark_node(a, good_a);
            result.mark_node(b, good_b);
            result
                .directions
                .entry(edge)
                .or_insert_with(|| edge.direction_from(a));

            if !self.known_edges.contains(&edge) && !fabricated.contains(&edge) {
                fabricated.push(edge);
            }
        }
    }
}

/// Classify all paths from `focal` to every node in `nodes`, using the default configuration.
pub fn classify(
    focal: NodeId,
    nodes: impl IntoIterator<Item = NodeId>,
    tables: &RouteTables,
    known_edges: &HashSet<EdgeId>,
) -> Classification {
    Classifier::new(tables, known_edges).classify(focal, nodes)
}

/// Classify all paths from `focal` to every node in the snapshot.
pub fn classify_snapshot(snapshot: &Snapshot, focal: NodeId, config: &Config) -> Classification {
    let known_edges = snapshot.topology().edge_ids();
    Classifier::new(snapshot.tables(), &known_edges)
        .with_config(config)
        .classify(focal, snapshot.node_ids())
}
