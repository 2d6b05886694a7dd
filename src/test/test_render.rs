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

//! Rendering classifications into a scene

use maplit::btreeset;
use pretty_assertions::assert_eq;
use test_log::test;

use super::{load, FABRICATED, LINE};
use crate::{
    classifier::classify_snapshot,
    config::Config,
    render::{
        ElementClass::{self, Backward, Fake, Forward, Infeasible},
        ElementId, ElementKind, RenderPlan, Scene,
    },
    types::EdgeId,
};

fn edge(a: u32, b: u32) -> ElementId {
    ElementId::Edge(EdgeId::new(a, b))
}

#[test]
fn scene_of_topology() {
    let snapshot = load(LINE);
    let scene = Scene::new(&snapshot);
    assert_eq!(scene.len(), 5);
    assert_eq!(
        scene.get(edge(2, 3)).map(|e| &e.kind),
        Some(&ElementKind::Edge { weight: Some(10) })
    );
    assert_eq!(
        scene.get(ElementId::Node(1)).map(|e| &e.kind),
        Some(&ElementKind::Node {
            label: "1".to_string()
        })
    );
    assert!(scene.elements().all(|(_, e)| e.classes.is_empty()));
}

#[test]
fn apply_and_revert_fabricated() {
    let snapshot = load(FABRICATED);
    let mut scene = Scene::new(&snapshot);
    let before = scene.clone();

    let c = classify_snapshot(&snapshot, 1, &Config::default());
    let plan = RenderPlan::new(&c);
    assert_eq!(plan.synthetic_edges, vec![EdgeId::new(1, 4)]);

    plan.apply(&mut scene);
    assert_eq!(scene.len(), before.len() + 1);
    assert_eq!(
        scene.get(edge(1, 4)).map(|e| &e.kind),
        Some(&ElementKind::Edge { weight: None })
    );
    assert_eq!(scene.classes(edge(1, 4)), btreeset! {Fake, Forward});
    assert_eq!(scene.classes(edge(3, 4)), btreeset! {ElementClass::Ok, Backward});
    assert_eq!(scene.classes(edge(1, 2)), btreeset! {ElementClass::Ok, Forward});
    assert_eq!(scene.classes(edge(2, 3)), btreeset! {ElementClass::Ok, Forward});
    assert_eq!(scene.classes(ElementId::Node(1)), btreeset! {Infeasible});
    assert_eq!(scene.classes(ElementId::Node(2)), btreeset! {ElementClass::Ok});
    assert_eq!(scene.classes(ElementId::Node(3)), btreeset! {Infeasible});
    assert_eq!(scene.classes(ElementId::Node(4)), btreeset! {Infeasible});

    plan.revert(&mut scene);
    assert_eq!(scene, before);
}

#[test]
fn retracted_route_is_infeasible() {
    let snapshot = load(
        r"
neighbours: [1 2 10, 2 3 10]
routes:
  1: [3 2 1 65535 65535]
  2: [3 3 1 10 10]
",
    );
    let mut scene = Scene::new(&snapshot);
    let plan = RenderPlan::new(&classify_snapshot(&snapshot, 1, &Config::default()));
    assert!(plan.synthetic_edges.is_empty());
    plan.apply(&mut scene);
    assert_eq!(scene.classes(edge(1, 2)), btreeset! {Infeasible, Forward});
    assert_eq!(scene.classes(edge(2, 3)), btreeset! {Infeasible, Forward});
    assert_eq!(scene.classes(ElementId::Node(1)), btreeset! {ElementClass::Ok});
    assert_eq!(scene.classes(ElementId::Node(3)), btreeset! {Infeasible});
}

#[test]
fn change_focal_node() {
    let snapshot = load(FABRICATED);
    let mut scene = Scene::new(&snapshot);
    let before = scene.clone();

    let from_1 = RenderPlan::new(&classify_snapshot(&snapshot, 1, &Config::default()));
    from_1.apply(&mut scene);
    from_1.revert(&mut scene);

    let from_2 = RenderPlan::new(&classify_snapshot(&snapshot, 2, &Config::default()));
    assert!(from_2.synthetic_edges.is_empty());
    from_2.apply(&mut scene);
    assert_eq!(scene.len(), before.len());
    assert_eq!(scene.get(edge(1, 4)), None);
    assert_eq!(scene.classes(edge(1, 2)), btreeset! {ElementClass::Ok, Backward});
    assert_eq!(scene.classes(edge(3, 4)), btreeset! {ElementClass::Ok, Forward});
}

#[test]
fn scene_to_json() {
    let snapshot = load(FABRICATED);
    let mut scene = Scene::new(&snapshot);
    RenderPlan::new(&classify_snapshot(&snapshot, 1, &Config::default())).apply(&mut scene);
    let json = serde_json::to_value(&scene).unwrap();
    assert_eq!(
        json["elements"]["e1-4"],
        serde_json::json!({"kind": "edge", "weight": null, "classes": ["fake", "forward"]})
    );
    assert_eq!(
        json["elements"]["n2"],
        serde_json::json!({"kind": "node", "label": "2", "classes": ["ok"]})
    );
}
