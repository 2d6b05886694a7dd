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

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use routevis::prelude::*;

/// Classify the forwarding paths of a simulation snapshot from the perspective of one node.
#[derive(Debug, Parser)]
struct Cli {
    /// Snapshot of the simulation state (YAML).
    snapshot: PathBuf,
    /// The focal node. All paths start at this node.
    #[clap(long = "focal", short = 'f')]
    focal: NodeId,
    /// Only print the path towards this destination.
    #[clap(long = "to", short = 't')]
    to: Option<NodeId>,
    /// Configuration file (TOML).
    #[clap(long = "config", short = 'c')]
    config: Option<PathBuf>,
    /// Maximum number of hops of a single path. Overrides the configuration file.
    #[clap(long = "max-hops")]
    max_hops: Option<usize>,
    /// Output format
    #[clap(long = "format", value_enum, default_value = "text")]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable summary
    Text,
    /// The classification as JSON
    Json,
    /// All render elements and their classes as JSON
    Scene,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if args.max_hops.is_some() {
        config.max_hops = args.max_hops;
    }

    let (snapshot, report) = Snapshot::from_file(&args.snapshot)?;
    if !report.is_clean() {
        log::warn!("{}", report.fmt(&snapshot));
    }
    if !snapshot.contains_node(args.focal) {
        log::warn!("Node {} does not appear in the snapshot", args.focal);
    }

    if let Some(to) = args.to {
        let path = PathResolver::new(snapshot.tables())
            .with_max_hops(config.max_hops)
            .resolve(args.focal, to);
        match args.format {
            Format::Text => println!("{}", path.fmt(&snapshot)),
            Format::Json | Format::Scene => println!("{}", serde_json::to_string_pretty(&path)?),
        }
        return Ok(());
    }

    let classification = classify_snapshot(&snapshot, args.focal, &config);

    match args.format {
        Format::Text => println!("{}", classification.fmt(&snapshot)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&classification)?),
        Format::Scene => {
            let mut scene = Scene::new(&snapshot);
            RenderPlan::new(&classification).apply(&mut scene);
            println!("{}", serde_json::to_string_pretty(&scene)?);
        }
    }

    Ok(())
}
