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

//! Module that introduces a formatter to display all types containing `NodeId`.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{
    classifier::Classification,
    snapshot::{ParseReport, Snapshot},
    types::{EdgeId, NodeId, ResolveError, ResolvedPath, INF},
};

/// Trait to format a type that contains NodeIds
pub trait SnapshotFormatter<'a, 'n> {
    /// Type that is returned, which implements `std::fmt::Display`.
    type Formatter;

    /// Return a struct that can be formatted and displayed.
    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter;
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for NodeId {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        snapshot.label(*self)
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for EdgeId {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        format!(
            "{} -- {}",
            self.low().fmt(snapshot),
            self.high().fmt(snapshot)
        )
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for BTreeSet<NodeId> {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        format!("{{{}}}", self.iter().map(|n| n.fmt(snapshot)).join(", "))
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for BTreeSet<EdgeId> {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        format!("{{{}}}", self.iter().map(|e| e.fmt(snapshot)).join(", "))
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for ResolvedPath {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        self.iter()
            .map(|(n, cost)| {
                if *cost == INF {
                    format!("{} (inf)", n.fmt(snapshot))
                } else {
                    format!("{} ({cost})", n.fmt(snapshot))
                }
            })
            .join(" => ")
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for ResolveError {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        match self {
            ResolveError::NoRoute(p) => format!("No Route: ({})", p.fmt(snapshot)),
            ResolveError::ForwardingLoop(p) => format!("FW Loop: ({})", p.fmt(snapshot)),
            ResolveError::HopBudgetExceeded(p) => {
                format!("Hop Budget Exceeded: ({})", p.fmt(snapshot))
            }
        }
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for Result<ResolvedPath, ResolveError> {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        match self {
            Ok(p) => format!("({})", p.fmt(snapshot)),
            Err(e) => e.fmt(snapshot),
        }
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for Classification {
    type Formatter = String;

    fn fmt(&'a self, snapshot: &'n Snapshot) -> Self::Formatter {
        let paths = self
            .paths
            .iter()
            .map(|(dst, p)| (dst, format!("({})", p.fmt(snapshot))))
            .chain(self.failures.iter().map(|(dst, e)| (dst, e.fmt(snapshot))))
            .sorted_by_key(|(dst, _)| **dst)
            .map(|(dst, s)| format!("    {}: {}", dst.fmt(snapshot), s))
            .join("\n");
        format!(
            "Classification from {}:\n  paths:\n{}\n  consistent links: {}\n  inconsistent links: {}\n  fabricated links: {}\n  consistent nodes: {}\n  inconsistent nodes: {}",
            self.focal.fmt(snapshot),
            paths,
            self.consistent_links.fmt(snapshot),
            self.inconsistent_links.fmt(snapshot),
            self.fabricated_links.fmt(snapshot),
            self.consistent_nodes.fmt(snapshot),
            self.inconsistent_nodes.fmt(snapshot),
        )
    }
}

impl<'a, 'n> SnapshotFormatter<'a, 'n> for ParseReport {
    type Formatter = String;

    fn fmt(&'a self, _snapshot: &'n Snapshot) -> Self::Formatter {
        if self.is_clean() {
            return "No entries skipped".to_string();
        }
        format!(
            "Skipped {} links and {} routes:\n{}",
            self.skipped_edges(),
            self.skipped_routes(),
            self.skipped
                .iter()
                .map(|e| format!("  {} #{}: {:?} ({})", e.source, e.index, e.raw, e.error))
                .join("\n")
        )
    }
}
