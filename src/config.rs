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

//! This module contains the code for reading the configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options of the classifier. Read from a TOML file, where every key is optional:
///
/// ```toml
/// max_hops = 64
/// premark_infeasible = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of hops of a single path walk. `None` means that walks are only bounded
    /// by the number of nodes.
    pub max_hops: Option<usize>,
    /// Mark all destinations as inconsistent for which the focal node itself reports an
    /// infinite metric.
    pub premark_infeasible: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_hops: None,
            premark_infeasible: true,
        }
    }
}

impl Config {
    /// Parse the configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read the configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Reading configuration from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

/// Error while reading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file cannot be read.
    #[error("Cannot read the configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The file is no valid configuration.
    #[error("Cannot parse the configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
