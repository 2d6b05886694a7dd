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

//! Module containing all type definitions

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Node Identification. This is also the label shown for a node that has no explicit name.
pub type NodeId = u32;

/// Route metric, as advertised by the distance-vector protocol.
pub type Metric = u16;

/// Link weight of the declared topology.
pub type Weight = u16;

/// Metric of a retracted or unreachable route.
pub const INF: Metric = 0xFFFF;

/// Sequence of `(node, accumulated metric)` from the source to the destination, both inclusive.
pub type ResolvedPath = Vec<(NodeId, Metric)>;

/// The route table of every node. The order of entries within a table is significant: when
/// multiple entries exist for the same destination, the first one wins.
pub type RouteTables = HashMap<NodeId, Vec<RouteEntry>>;

/// Add two metrics. The result is [`INF`] if any of the two is [`INF`], and saturates at
/// `INF - 1` otherwise.
///
/// ```
/// use routevis::types::{combine, INF};
/// assert_eq!(combine(10, 20), 30);
/// assert_eq!(combine(10, INF), INF);
/// assert_eq!(combine(INF - 2, 5), INF - 1);
/// ```
pub fn combine(a: Metric, b: Metric) -> Metric {
    if a == INF || b == INF {
        INF
    } else {
        (a as u32 + b as u32).min((INF - 1) as u32) as Metric
    }
}

/// Canonical identity of an undirected link. The two endpoints are always stored in ascending
/// order, such that `EdgeId::new(a, b) == EdgeId::new(b, a)`. It is serialized as the string
/// `low-high`, so it can be used as a key of JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId {
    low: NodeId,
    high: NodeId,
}

impl EdgeId {
    /// Create the canonical identity of the link between `a` and `b`.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// The endpoint with the lower id.
    pub fn low(&self) -> NodeId {
        self.low
    }

    /// The endpoint with the higher id.
    pub fn high(&self) -> NodeId {
        self.high
    }

    /// Direction hint of a traversal from `from` over this link. A traversal starting at the
    /// lower endpoint goes [`Direction::Forward`].
    pub fn direction_from(&self, from: NodeId) -> Direction {
        if from == self.low {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for EdgeId {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((a, b)) => Ok(Self::new(parse_field(a, "a")?, parse_field(b, "b")?)),
            None => Err(WireError::TokenCount {
                expected: "2",
                found: 1,
            }),
        }
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Orientation of a traversed link, relative to its canonical endpoint order. This is only a
/// rendering hint for the arrow orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// From the lower to the higher id.
    Forward,
    /// From the higher to the lower id.
    Backward,
}

/// A link in the declared topology, parsed from the wire format `a b weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopologyEdge {
    /// First endpoint, as written.
    pub a: NodeId,
    /// Second endpoint, as written.
    pub b: NodeId,
    /// Link weight
    pub weight: Weight,
}

impl TopologyEdge {
    /// The canonical identity of this edge.
    pub fn id(&self) -> EdgeId {
        EdgeId::new(self.a, self.b)
    }
}

impl FromStr for TopologyEdge {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [a, b, weight] => Ok(Self {
                a: parse_field(a, "a")?,
                b: parse_field(b, "b")?,
                weight: parse_field(weight, "weight")?,
            }),
            _ => Err(WireError::TokenCount {
                expected: "3",
                found: tokens.len(),
            }),
        }
    }
}

impl fmt::Display for TopologyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.a, self.b, self.weight)
    }
}

/// A single learned route of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteEntry {
    /// The destination this route leads to
    pub destination: NodeId,
    /// The neighbour packets towards `destination` are forwarded to. For self routes, this is
    /// the node itself.
    pub next_hop: NodeId,
    /// Sequence number the route was advertised with
    pub sequence: u32,
    /// Metric with which the route was advertised, or [`INF`] for a retracted route.
    pub metric: Metric,
    /// The feasibility distance. `None` if it is infinite.
    pub feasibility_distance: Option<Metric>,
    /// Whether this is the route of the node towards itself.
    pub self_flag: bool,
}

impl RouteEntry {
    /// Create a regular (non-self) route entry.
    pub fn new(destination: NodeId, next_hop: NodeId, sequence: u32, metric: Metric) -> Self {
        Self {
            destination,
            next_hop,
            sequence,
            metric,
            feasibility_distance: (metric != INF).then_some(metric),
            self_flag: false,
        }
    }

    /// Create the route of a node towards itself.
    pub fn new_self(node: NodeId, sequence: u32) -> Self {
        Self {
            destination: node,
            next_hop: node,
            sequence,
            metric: 0,
            feasibility_distance: None,
            self_flag: true,
        }
    }

    /// Returns `true` if the metric of this route is infinite.
    pub fn is_infeasible(&self) -> bool {
        self.metric == INF
    }
}

impl FromStr for RouteEntry {
    type Err = WireError;

    /// Parse a route in the wire format `dst nextHop seq metric feasibility[ self]`. The short
    /// self-route form `dst - seq self` is accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [dst, "-", seq, "self"] => Ok(Self::new_self(
                parse_field(dst, "destination")?,
                parse_field(seq, "sequence")?,
            )),
            [dst, nh, seq, metric, fd] | [dst, nh, seq, metric, fd, "self"] => {
                let fd: Metric = parse_field(fd, "feasibility")?;
                Ok(Self {
                    destination: parse_field(dst, "destination")?,
                    next_hop: parse_field(nh, "next hop")?,
                    sequence: parse_field(seq, "sequence")?,
                    metric: parse_field(metric, "metric")?,
                    feasibility_distance: (fd != INF).then_some(fd),
                    self_flag: tokens.len() == 6,
                })
            }
            [.., last] if tokens.len() == 6 => Err(WireError::UnexpectedToken(last.to_string())),
            _ => Err(WireError::TokenCount {
                expected: "4, 5 or 6",
                found: tokens.len(),
            }),
        }
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.destination,
            self.next_hop,
            self.sequence,
            self.metric,
            self.feasibility_distance.unwrap_or(INF)
        )?;
        if self.self_flag {
            write!(f, " self")?;
        }
        Ok(())
    }
}

/// Parse a single integer field of a wire string.
fn parse_field<T: FromStr>(token: &str, field: &'static str) -> Result<T, WireError> {
    token.parse().map_err(|_| WireError::InvalidField {
        field,
        token: token.to_string(),
    })
}

/// Error while parsing a single edge or route string.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum WireError {
    /// The string has the wrong number of whitespace-separated tokens.
    #[error("Expected {expected} tokens, found {found}")]
    TokenCount {
        /// Number of tokens allowed
        expected: &'static str,
        /// Number of tokens present
        found: usize,
    },
    /// A field is not an integer of the expected range.
    #[error("Invalid {field}: {token:?}")]
    InvalidField {
        /// Name of the field
        field: &'static str,
        /// The token found
        token: String,
    },
    /// The entry is not a string at all.
    #[error("Expected a string")]
    NotAString,
    /// A trailing token other than `self`.
    #[error("Unexpected trailing token: {0:?}")]
    UnexpectedToken(String),
}

/// Reason why no complete path could be reconstructed. Each variant carries the path walked so
/// far.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveError {
    /// Some node on the way knows no route towards the destination.
    #[error("No route! path: {0:?}")]
    NoRoute(ResolvedPath),
    /// The next-hop chain revisits a node.
    #[error("Forwarding Loop occurred! path: {0:?}")]
    ForwardingLoop(ResolvedPath),
    /// The walk took more hops than allowed.
    #[error("Hop budget exceeded! path: {0:?}")]
    HopBudgetExceeded(ResolvedPath),
}

impl ResolveError {
    /// The path walked before the failure was detected.
    pub fn path(&self) -> &ResolvedPath {
        match self {
            Self::NoRoute(p) | Self::ForwardingLoop(p) | Self::HopBudgetExceeded(p) => p,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_edge_is_symmetric() {
        for a in 0..6 {
            for b in 0..6 {
                assert_eq!(EdgeId::new(a, b), EdgeId::new(b, a));
            }
        }
        assert_eq!(EdgeId::new(4, 1).to_string(), "1-4");
        assert_eq!(EdgeId::new(4, 1).direction_from(4), Direction::Backward);
        assert_eq!(EdgeId::new(4, 1).direction_from(1), Direction::Forward);
    }

    #[test]
    fn edge_id_as_string() {
        assert_eq!(serde_json::to_string(&EdgeId::new(3, 1)).unwrap(), "\"1-3\"");
        assert_eq!(
            serde_json::from_str::<EdgeId>("\"7-2\"").unwrap(),
            EdgeId::new(2, 7)
        );
        assert!("7".parse::<EdgeId>().is_err());
        assert!("a-2".parse::<EdgeId>().is_err());
    }

    #[test]
    fn combine_absorbs_infinity() {
        assert_eq!(combine(0, 0), 0);
        assert_eq!(combine(INF, 0), INF);
        assert_eq!(combine(0, INF), INF);
        assert_eq!(combine(INF - 1, INF - 1), INF - 1);
    }

    #[test]
    fn parse_edge() {
        assert_eq!(
            "1 2 10".parse::<TopologyEdge>(),
            Ok(TopologyEdge {
                a: 1,
                b: 2,
                weight: 10
            })
        );
        assert!("1 2".parse::<TopologyEdge>().is_err());
        assert_eq!(
            "1 x 10".parse::<TopologyEdge>(),
            Err(WireError::InvalidField {
                field: "b",
                token: "x".to_string()
            })
        );
        assert!("1 2 70000".parse::<TopologyEdge>().is_err());
    }

    #[test]
    fn parse_route() {
        let r: RouteEntry = "3 2 1 20 1".parse().unwrap();
        assert_eq!(
            r,
            RouteEntry {
                destination: 3,
                next_hop: 2,
                sequence: 1,
                metric: 20,
                feasibility_distance: Some(1),
                self_flag: false,
            }
        );
        assert_eq!(r.to_string(), "3 2 1 20 1");

        let r: RouteEntry = "3 4 1 65535 65535".parse().unwrap();
        assert!(r.is_infeasible());
        assert_eq!(r.feasibility_distance, None);

        let r: RouteEntry = "5 5 7 0 0 self".parse().unwrap();
        assert!(r.self_flag);
        assert_eq!(r.to_string(), "5 5 7 0 0 self");

        let r: RouteEntry = "5 - 7 self".parse().unwrap();
        assert_eq!(r, RouteEntry::new_self(5, 7));
    }

    #[test]
    fn parse_route_malformed() {
        assert_eq!(
            "3 2 1 20".parse::<RouteEntry>(),
            Err(WireError::TokenCount {
                expected: "4, 5 or 6",
                found: 4
            })
        );
        assert_eq!(
            "3 2 1 20 1 other".parse::<RouteEntry>(),
            Err(WireError::UnexpectedToken("other".to_string()))
        );
        assert!("3 2 1 NaN 1".parse::<RouteEntry>().is_err());
        assert!("3 - 1 20 1".parse::<RouteEntry>().is_err());
    }
}
