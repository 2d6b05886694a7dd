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

//! # Path Resolver
//!
//! Reconstructs the forwarding path from a source to a destination by following the next hops
//! stored in the route tables of each node along the way. Route tables may be inconsistent
//! (stale routes, retracted routes, or next hops that point back), so the walk keeps track of
//! all visited nodes and reports a [`ResolveError::ForwardingLoop`] instead of following a cycle
//! forever.

use std::collections::HashSet;

use crate::types::{combine, NodeId, Metric, ResolveError, ResolvedPath, RouteEntry, RouteTables};

/// Walks the next-hop chain through a set of route tables.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    tables: &'a RouteTables,
    max_hops: Option<usize>,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver without any hop budget. The walk still terminates after at most one
    /// step per distinct node, as every node can only be visited once.
    pub fn new(tables: &'a RouteTables) -> Self {
        Self {
            tables,
            max_hops: None,
        }
    }

    /// Limit the number of hops a single walk may take. Exceeding the limit results in
    /// [`ResolveError::HopBudgetExceeded`].
    pub fn with_max_hops(mut self, max_hops: Option<usize>) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Get the entry that `node` uses to forward towards `destination`. Self routes are never
    /// returned. If the table contains multiple entries for the same destination, the first one
    /// wins.
    pub fn next_entry(&self, node: NodeId, destination: NodeId) -> Option<&'a RouteEntry> {
        self.tables
            .get(&node)?
            .iter()
            .find(|r| !r.self_flag && r.destination == destination)
    }

    /// Reconstruct the path from `from` to `to`. The path contains both endpoints, each node
    /// annotated with the accumulated metric when reaching that node. The accumulated metric
    /// of `from` is 0.
    pub fn resolve(&self, from: NodeId, to: NodeId) -> Result<ResolvedPath, ResolveError> {
        self.resolve_from(from, to, 0)
    }

    /// Like [`PathResolver::resolve`], but starting with an accumulated metric of `cost`.
    pub fn resolve_from(
        &self,
        from: NodeId,
        to: NodeId,
        cost: Metric,
    ) -> Result<ResolvedPath, ResolveError> {
        let mut path = ResolvedPath::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut cur = from;
        let mut cost = cost;

        loop {
            if cur == to {
                path.push((cur, cost));
                return Ok(path);
            }

            // we have been here already for the same destination
            if !visited.insert(cur) {
                path.push((cur, cost));
                log::debug!("Forwarding loop from {from} towards {to}: {path:?}");
                return Err(ResolveError::ForwardingLoop(path));
            }

            if self.max_hops.map(|max| path.len() >= max).unwrap_or(false) {
                path.push((cur, cost));
                log::debug!("Exceeded the hop budget from {from} towards {to}");
                return Err(ResolveError::HopBudgetExceeded(path));
            }

            let entry = match self.next_entry(cur, to) {
                Some(entry) => entry,
                None => {
                    path.push((cur, cost));
                    return Err(ResolveError::NoRoute(path));
                }
            };

            path.push((cur, cost));
            cost = combine(cost, entry.metric);
            cur = entry.next_hop;
        }
    }
}

/// Reconstruct the path from `from` to `to`, without any hop budget. See
/// [`PathResolver::resolve`].
pub fn resolve_path(
    tables: &RouteTables,
    from: NodeId,
    to: NodeId,
) -> Result<ResolvedPath, ResolveError> {
    PathResolver::new(tables).resolve(from, to)
}

/// Reconstruct the path from `from` to `to`, taking at most `max_hops` hops.
pub fn resolve_path_with_budget(
    tables: &RouteTables,
    from: NodeId,
    to: NodeId,
    max_hops: usize,
) -> Result<ResolvedPath, ResolveError> {
    PathResolver::new(tables)
        .with_max_hops(Some(max_hops))
        .resolve(from, to)
}
