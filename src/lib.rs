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

//! # RouteVis: Reconstructing and classifying distance-vector forwarding paths
//!
//! A distance-vector routing protocol (in the style of Babel) is simulated elsewhere. After each
//! simulation step, every node has a route table, mapping destinations to a next hop, a sequence
//! number, a metric (where `65535` means infinity), and a feasibility distance. This library
//! takes such a snapshot and answers two questions:
//!
//! 1. Which path does a packet take from node `a` to node `b`? ([`resolver`])
//! 2. Looking at all paths from a focal node, which links and nodes are consistent, which are
//!    inconsistent (reached with an infinite metric), and which links do not even exist in the
//!    topology? ([`classifier`])
//!
//! Route tables may be inconsistent during convergence. Forwarding loops are detected and
//! reported as [`types::ResolveError::ForwardingLoop`], never followed forever.
//!
//! ## Structure
//! - [`types`] contains the data model: [`types::RouteEntry`], [`types::TopologyEdge`],
//!   [`types::EdgeId`], and the wire formats of routes and links.
//! - [`snapshot`] reads the simulation state from YAML, skipping malformed entries.
//! - [`topology`] stores the declared links.
//! - [`resolver`] walks the next-hop chain.
//! - [`classifier`] labels links and nodes.
//! - [`render`] turns a classification into render instructions for an external graph renderer.
//! - [`simulation`] is the interface to the external simulator.
//! - [`config`] holds the classifier options.
//!
//! ## Example
//!
//! ```
//! use routevis::prelude::*;
//!
//! let (snapshot, report) = Snapshot::from_yaml_str(
//!     "neighbours: [1 2 10, 2 3 10]\nroutes:\n  1: [3 2 1 20 1]\n  2: [3 3 1 10 1]\n",
//! )?;
//! assert!(report.is_clean());
//!
//! let c = classify_snapshot(&snapshot, 1, &Config::default());
//! assert!(c.consistent_links.contains(&EdgeId::new(1, 2)));
//! assert!(c.consistent_links.contains(&EdgeId::new(3, 2)));
//! assert!(c.fabricated_links.is_empty());
//! # Ok::<(), SnapshotError>(())
//! ```

#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod classifier;
pub mod config;
pub mod formatter;
pub mod render;
pub mod resolver;
pub mod simulation;
pub mod snapshot;
pub mod topology;
pub mod types;
#[cfg(test)]
mod test;

/// Everything needed to load a snapshot and classify it.
pub mod prelude {
    pub use crate::classifier::{classify, classify_snapshot, Classification, Classifier, Label};
    pub use crate::config::Config;
    pub use crate::formatter::SnapshotFormatter;
    pub use crate::render::{RenderPlan, RenderSink, Scene};
    pub use crate::resolver::{resolve_path, resolve_path_with_budget, PathResolver};
    pub use crate::snapshot::{ParseReport, Snapshot, SnapshotError};
    pub use crate::types::{
        EdgeId, NodeId, ResolveError, ResolvedPath, RouteEntry, RouteTables, TopologyEdge, INF,
    };
}
