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

//! Scenario tests, operating on complete snapshots.

use crate::snapshot::Snapshot;

mod test_render;

/// Load a snapshot and make sure that nothing was skipped.
fn load(yaml: &str) -> Snapshot {
    let (snapshot, report) = Snapshot::from_yaml_str(yaml).unwrap();
    assert!(report.is_clean(), "{report:?}");
    snapshot
}

/// Three nodes in a line: `1 -- 2 -- 3`, all routes consistent.
const LINE: &str = r"
nodes:
  1: {packets: []}
  2: {packets: []}
  3: {packets: []}
neighbours:
  - 1 2 10
  - 2 3 10
routes:
  1:
    - 1 - 0 self
    - 2 2 1 10 10
    - 3 2 1 20 1
  2:
    - 2 - 0 self
    - 1 1 1 10 10
    - 3 3 1 10 10
  3:
    - 3 - 0 self
    - 2 2 1 10 10
    - 1 2 1 20 20
config:
  broadcast_routes: false
  update_routes: true
";

/// Node 1 forwards towards 3 over node 4, but there is no link between 1 and 4, and the route
/// is retracted.
const FABRICATED: &str = r"
nodes:
  1: {packets: []}
  2: {packets: []}
  3: {packets: []}
  4: {packets: []}
neighbours:
  - 1 2 10
  - 2 3 10
  - 3 4 10
routes:
  1:
    - 1 - 0 self
    - 2 2 1 10 10
    - 3 4 1 65535 0
    - 4 2 1 30 30
  2:
    - 2 - 0 self
    - 1 1 1 10 10
    - 3 3 1 10 10
    - 4 3 1 20 20
  3:
    - 3 - 0 self
    - 4 4 1 10 10
  4:
    - 4 - 0 self
    - 3 3 1 10 10
";

/// Nodes 1 and 2 point at each other for destination 4.
const LOOP: &str = r"
neighbours:
  - 1 2 1
  - 2 3 1
  - 3 4 1
routes:
  1:
    - 4 2 3 2 2
    - 2 2 3 1 1
    - 3 2 3 2 2
  2:
    - 4 1 3 3 3
    - 3 3 3 1 1
  3:
    - 4 4 3 1 1
";
