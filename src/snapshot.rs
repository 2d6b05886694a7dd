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

//! # Simulation Snapshot
//!
//! A snapshot is the immutable view on the simulation state that all computations operate on.
//! It is replaced as a whole after every simulation update. The snapshot is read from a YAML
//! document of the following shape:
//!
//! ```yaml
//! nodes:
//!   1: {packets: []}
//!   2: Zurich
//! neighbours:
//!   - 1 2 10
//! routes:
//!   1:
//!     - 1 - 0 self
//!     - 2 2 1 10 10
//!   2:
//!     - 2 - 0 self
//!     - 1 1 1 10 10
//! config:
//!   broadcast_routes: false
//! ```
//!
//! Malformed edge and route strings do not abort loading. They are skipped, logged, and
//! collected in the [`ParseReport`].

use std::{collections::BTreeMap, fmt, path::Path};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

use crate::{
    topology::Topology,
    types::{NodeId, RouteEntry, RouteTables, TopologyEdge, WireError},
};

/// Immutable view on the simulation state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    labels: BTreeMap<NodeId, String>,
    topology: Topology,
    tables: RouteTables,
    config: BTreeMap<String, bool>,
}

impl Snapshot {
    /// Build a snapshot from already parsed links and route tables.
    pub fn new(edges: impl IntoIterator<Item = TopologyEdge>, tables: RouteTables) -> Self {
        let mut topology: Topology = edges.into_iter().collect();
        tables.keys().for_each(|n| topology.add_node(*n));
        Self {
            labels: Default::default(),
            topology,
            tables,
            config: Default::default(),
        }
    }

    /// Read and parse a YAML file. See [`Snapshot::from_yaml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<(Self, ParseReport), SnapshotError> {
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }

    /// Parse the YAML document. Returns the snapshot, together with the report of all skipped
    /// entries.
    pub fn from_yaml_str(s: &str) -> Result<(Self, ParseReport), SnapshotError> {
        let raw: RawSnapshot = serde_yaml::from_str(s)?;
        Ok(raw.build())
    }

    /// Get the declared topology
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Get the route tables of all nodes.
    pub fn tables(&self) -> &RouteTables {
        &self.tables
    }

    /// Get the route table of a single node. Returns an empty slice for unknown nodes.
    pub fn table(&self, node: NodeId) -> &[RouteEntry] {
        self.tables.get(&node).map(|t| t.as_slice()).unwrap_or_default()
    }

    /// Simulator flags stored alongside the state (such as `broadcast_routes`).
    pub fn config(&self) -> &BTreeMap<String, bool> {
        &self.config
    }

    /// All nodes that appear anywhere in the snapshot, in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.topology.nodes().collect()
    }

    /// Returns `true` if the node appears anywhere in the snapshot.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.topology.nodes().any(|n| n == node)
    }

    /// Get the label of a node. Nodes without an explicit label are named by their id.
    pub fn label(&self, node: NodeId) -> String {
        self.labels
            .get(&node)
            .cloned()
            .unwrap_or_else(|| node.to_string())
    }
}

/// Error while reading a snapshot. Only structural errors are reported here, malformed entries
/// are skipped (see [`ParseReport`]).
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid YAML, or has the wrong top-level shape.
    #[error("Invalid snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The file could not be read.
    #[error("Cannot read snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a skipped entry was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// An entry in the list of `neighbours`.
    Neighbours,
    /// An entry in the route table of the given node.
    Routes(NodeId),
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neighbours => write!(f, "neighbours"),
            Self::Routes(n) => write!(f, "routes of {n}"),
        }
    }
}

/// An entry that was skipped while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// The list the entry was found in.
    pub source: EntrySource,
    /// Position within that list
    pub index: usize,
    /// The raw entry
    pub raw: String,
    /// The parse error
    pub error: WireError,
}

/// Summary of all entries that were skipped while loading a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    /// All skipped entries, in the order they were encountered.
    pub skipped: Vec<SkippedEntry>,
}

impl ParseReport {
    /// Number of skipped links
    pub fn skipped_edges(&self) -> usize {
        self.skipped
            .iter()
            .filter(|e| e.source == EntrySource::Neighbours)
            .count()
    }

    /// Number of skipped routes
    pub fn skipped_routes(&self) -> usize {
        self.skipped.len() - self.skipped_edges()
    }

    /// Returns `true` if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, source: EntrySource, index: usize, raw: &Value, error: WireError) {
        let raw = scalar_to_string(raw).unwrap_or_else(|| format!("{raw:?}"));
        log::warn!("Skipping entry {index} of {source} ({raw:?}): {error}");
        self.skipped.push(SkippedEntry {
            source,
            index,
            raw,
            error,
        });
    }
}

/// The document as it is written, before any wire strings are parsed.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    nodes: BTreeMap<NodeId, Value>,
    #[serde(default)]
    neighbours: Vec<Value>,
    #[serde(default)]
    routes: BTreeMap<NodeId, Vec<Value>>,
    #[serde(default)]
    config: BTreeMap<String, bool>,
}

impl RawSnapshot {
    fn build(self) -> (Snapshot, ParseReport) {
        let mut report = ParseReport::default();
        let mut topology = Topology::new();

        let mut labels = BTreeMap::new();
        for (node, value) in self.nodes {
            topology.add_node(node);
            if let Some(label) = node_label(&value) {
                labels.insert(node, label);
            }
        }

        for (i, value) in self.neighbours.iter().enumerate() {
            match parse_wire::<TopologyEdge>(value) {
                Ok(edge) => topology.add_edge(edge),
                Err(e) => report.skip(EntrySource::Neighbours, i, value, e),
            }
        }

        let mut tables = RouteTables::with_capacity(self.routes.len());
        for (node, entries) in self.routes {
            topology.add_node(node);
            let table = tables.entry(node).or_insert_with(Vec::new);
            for (i, value) in entries.iter().enumerate() {
                match parse_wire::<RouteEntry>(value) {
                    Ok(route) => table.push(route),
                    Err(e) => report.skip(EntrySource::Routes(node), i, value, e),
                }
            }
        }

        if !report.is_clean() {
            log::info!(
                "Skipped {} links and {} routes while loading the snapshot",
                report.skipped_edges(),
                report.skipped_routes()
            );
        }

        let snapshot = Snapshot {
            labels,
            topology,
            tables,
            config: self.config,
        };
        (snapshot, report)
    }
}

/// Parse an entry that should be a wire string.
fn parse_wire<T>(value: &Value) -> Result<T, WireError>
where
    T: std::str::FromStr<Err = WireError>,
{
    scalar_to_string(value)
        .ok_or(WireError::NotAString)?
        .parse()
}

/// Convert a scalar to its string representation. A lone number (such as the route `- 5`) is
/// still a wire string, albeit a malformed one.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extract the label of a node entry. The entry is either the label itself, or a mapping with a
/// `label` or `name` key. Anything else (such as the pending packets) carries no label.
fn node_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Mapping(m) => ["label", "name"]
            .into_iter()
            .find_map(|k| m.get(k))
            .and_then(scalar_to_string),
        _ => None,
    }
}
