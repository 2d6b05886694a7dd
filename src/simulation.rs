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

//! Interface to the external route simulator (the `/sim_route` endpoint). The simulator takes
//! the scenario text and returns the scenario after one simulation tick. Failures never abort
//! the session: they are written into the scenario text as comment lines instead.

use thiserror::Error;

/// Prefix of the comment lines that carry a simulation failure.
pub const ERROR_COMMENT: &str = "# error: ";

/// Something that can run one simulation step on a scenario.
pub trait Simulator {
    /// Send the scenario, and get the updated scenario back.
    fn simulate(&mut self, scenario: &str) -> Result<String, SimulationError>;
}

/// Error returned by the simulator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The simulator rejected the scenario (`400 Bad Request`).
    #[error("{0}")]
    Rejected(String),
    /// The simulator could not be reached.
    #[error("Request failed: {0}")]
    Transport(String),
}

/// Run one simulation step. On success, the updated scenario is returned. On failure, the
/// error message is merged into the original scenario as comment lines at the top.
pub fn run_simulation<S: Simulator + ?Sized>(simulator: &mut S, scenario: &str) -> String {
    match simulator.simulate(scenario) {
        Ok(updated) => updated,
        Err(e) => {
            log::warn!("Simulation failed: {e}");
            annotate_failure(scenario, &e.to_string())
        }
    }
}

/// Prepend the error message to the scenario as comment lines. Error comments of a previous
/// failure are replaced, so they do not pile up.
pub fn annotate_failure(scenario: &str, message: &str) -> String {
    let body = scenario
        .lines()
        .skip_while(|l| l.starts_with(ERROR_COMMENT))
        .collect::<Vec<_>>()
        .join("\n");
    let mut result: String = message
        .lines()
        .map(|l| format!("{ERROR_COMMENT}{l}\n"))
        .collect();
    if result.is_empty() {
        result = format!("{ERROR_COMMENT}unknown\n");
    }
    result.push_str(&body);
    if scenario.ends_with('\n') {
        result.push('\n');
    }
    result
}
