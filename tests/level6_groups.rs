//! Level 6: Groups and Zoom Tests
//!
//! Containment, resize limits, group commands and the zoom controls.

mod common;

use common::harness::EditorHarness;
use common::position;
use pretty_assertions::assert_eq;
use slint::Model;
use topology_editor::containment::Interior;
use topology_editor::{EditorConfig, Graph, Node, Point, Rect};

/// Node `a` at the origin and an empty group at (100, 100, 300, 200).
fn group_beside_node() -> (Graph, String) {
    let mut graph = Graph::new();
    graph.nodes.push(Node::new("a", "A", "db", 0.0, 0.0));
    let group = graph.create_group("Cluster", Rect::new(100.0, 100.0, 300.0, 200.0));
    (graph, group)
}

#[test]
fn test_joining_group_moves_node_to_entry_point() {
    let (graph, group) = group_beside_node();
    let harness = EditorHarness::new(graph);
    assert!(harness.with_editor(|e| e.add_to_group("a", &group)));

    let graph = harness.graph();
    assert_eq!(position(&graph, "a"), Point::new(120.0, 170.0));
    assert_eq!(graph.node("a").unwrap().group_id.as_deref(), Some(group.as_str()));
    assert_eq!(harness.group_item(&group).unwrap().member_count, 1);
}

#[test]
fn test_node_already_inside_keeps_position() {
    let (mut graph, group) = group_beside_node();
    graph.nodes[0].set_position(Point::new(200.0, 200.0));
    let harness = EditorHarness::new(graph);
    harness.with_editor(|e| e.add_to_group("a", &group));
    assert_eq!(position(&harness.graph(), "a"), Point::new(200.0, 200.0));
}

#[test]
fn test_resize_never_goes_below_minimum() {
    let (graph, group) = group_beside_node();
    let harness = EditorHarness::new(graph);
    harness.click(150.0, 120.0);
    assert!(harness.group_item(&group).unwrap().selected);

    harness.press(400.0, 300.0);
    for step in 1..=10 {
        let t = step as f32 * 40.0;
        harness.move_to(400.0 - t, 300.0 - t);
        let frame = harness.graph().group(&group).unwrap().rect();
        assert!(frame.width >= 200.0, "width {} after step {step}", frame.width);
        assert!(frame.height >= 150.0, "height {} after step {step}", frame.height);
        assert_eq!((frame.x, frame.y), (100.0, 100.0));
    }
    harness.release(0.0, 0.0);
    assert_eq!(harness.graph().group(&group).unwrap().rect(), Rect::new(100.0, 100.0, 200.0, 150.0));
}

#[test]
fn test_west_resize_stops_at_minimum() {
    let (graph, group) = group_beside_node();
    let harness = EditorHarness::new(graph);
    harness.click(150.0, 120.0);
    harness.drag((100.0, 200.0), (600.0, 200.0));
    assert_eq!(harness.graph().group(&group).unwrap().rect(), Rect::new(200.0, 100.0, 200.0, 200.0));
}

#[test]
fn test_shrinking_pulls_members_inside() {
    let (mut graph, group) = group_beside_node();
    graph.nodes[0].group_id = Some(group.clone());
    graph.nodes[0].set_position(Point::new(230.0, 210.0));
    let harness = EditorHarness::new(graph);

    harness.click(150.0, 120.0);
    harness.drag((400.0, 300.0), (300.0, 250.0));
    assert_eq!(position(&harness.graph(), "a"), Point::new(130.0, 160.0));
}

#[test]
fn test_create_group_in_view_center() {
    let harness = EditorHarness::empty();
    let metrics = harness.ctrl.metrics();
    let group = harness.with_editor(|e| e.create_group("Web tier", &metrics));
    let item = harness.group_item(&group).unwrap();
    assert_eq!((item.x, item.y, item.width, item.height), (460.0, 300.0, 300.0, 200.0));
    assert_eq!(item.name.as_str(), "Web tier");
    assert_eq!(item.member_count, 0);
}

#[test]
fn test_group_from_selection() {
    let harness = EditorHarness::new(common::two_nodes());
    harness.drag((-20.0, -20.0), (500.0, 200.0));
    let group = harness.with_editor(|e| e.create_group_from_selection("Pair")).unwrap();

    let graph = harness.graph();
    assert!(graph.nodes.iter().all(|n| n.group_id.as_deref() == Some(group.as_str())));
    let frame = graph.group(&group).unwrap().rect();
    assert_eq!(frame, Rect::new(-40.0, -60.0, 540.0, 180.0));
    let interior = Interior::of(frame, &EditorConfig::default());
    for node in &graph.nodes {
        assert!(interior.contains(node.position()), "{} outside its group", node.id);
    }
    assert!(harness.group_item(&group).unwrap().selected);
}

#[test]
fn test_delete_group_releases_members() {
    let (graph, group) = group_beside_node();
    let harness = EditorHarness::new(graph);
    harness.with_editor(|e| e.add_to_group("a", &group));
    assert!(harness.with_editor(|e| e.delete_group(&group)));

    let graph = harness.graph();
    assert!(graph.groups.is_empty());
    let a = graph.node("a").unwrap();
    assert_eq!(a.group_id, None);
    assert_eq!(a.position(), Point::new(120.0, 170.0));
    assert_eq!(harness.groups.row_count(), 0);
}

#[test]
fn test_duplicate_group_starts_empty() {
    let (graph, group) = group_beside_node();
    let harness = EditorHarness::new(graph);
    harness.with_editor(|e| e.add_to_group("a", &group));
    let copy = harness.with_editor(|e| e.duplicate_group(&group)).unwrap();

    let item = harness.group_item(&copy).unwrap();
    assert_eq!(item.name.as_str(), "Cluster (Copy)");
    assert_eq!((item.x, item.y), (150.0, 150.0));
    assert_eq!(item.member_count, 0);
}

#[test]
fn test_change_group_moves_between_frames() {
    let (mut graph, first) = group_beside_node();
    let second = graph.create_group("Other", Rect::new(600.0, 100.0, 300.0, 200.0));
    let harness = EditorHarness::new(graph);
    harness.with_editor(|e| e.add_to_group("a", &first));
    assert!(harness.with_editor(|e| e.change_group("a", Some(second.as_str()))));
    assert_eq!(position(&harness.graph(), "a"), Point::new(620.0, 170.0));

    assert!(harness.with_editor(|e| e.change_group("a", None)));
    assert_eq!(harness.graph().node("a").unwrap().group_id, None);
}

#[test]
fn test_zoom_buttons() {
    let harness = EditorHarness::new(common::two_nodes());
    let zoom_in = harness.ctrl.zoom_callback();
    for _ in 0..5 {
        zoom_in(1);
    }
    assert_eq!(harness.ctrl.zoom_percent(), 150);
    zoom_in(1);
    assert_eq!(harness.ctrl.zoom_percent(), 160);
    for _ in 0..20 {
        zoom_in(1);
        assert!(harness.ctrl.zoom_percent() <= 200);
    }
    assert_eq!(harness.ctrl.zoom_percent(), 200);

    for _ in 0..30 {
        zoom_in(-1);
    }
    assert_eq!(harness.ctrl.zoom_percent(), 25);
    zoom_in(0);
    assert_eq!(harness.ctrl.zoom_percent(), 100);
}

#[test]
fn test_wheel_keeps_point_under_cursor() {
    let harness = EditorHarness::new(common::two_nodes());
    let before = harness.node_item("b").unwrap();
    // cursor on b's top-left corner
    harness.ctrl.scroll_callback()(before.x, before.y, -120.0);
    let after = harness.node_item("b").unwrap();
    assert_eq!(harness.ctrl.zoom_percent(), 110);
    assert!((after.x - before.x).abs() < 0.01);
    assert!((after.y - before.y).abs() < 0.01);
    assert!((after.width - 176.0).abs() < 0.01);
}
