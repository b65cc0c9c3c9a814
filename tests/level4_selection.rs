//! Level 4: Selection Tests
//!
//! Clicks, ctrl-toggles and area selection, and how node, edge and group
//! selections exclude each other.

mod common;

use common::harness::{EditorHarness, LEFT};
use pretty_assertions::assert_eq;
use topology_editor::{Graph, Node, Rect};

/// `a` and `b` overlap the box (0,0)-(500,200); `c` and `d` do not.
fn scattered() -> Graph {
    let mut graph = Graph::new();
    graph.nodes.push(Node::new("a", "A", "db", 40.0, 40.0));
    graph.nodes.push(Node::new("b", "B", "api", 400.0, 150.0));
    graph.nodes.push(Node::new("c", "C", "cache", 520.0, 40.0));
    graph.nodes.push(Node::new("d", "D", "queue", 100.0, 220.0));
    graph
}

#[test]
fn test_area_selection_picks_overlapping_nodes() {
    let harness = EditorHarness::new(scattered());
    harness.press(0.0, 0.0);
    harness.move_to(500.0, 200.0);
    assert_eq!(harness.ctrl.selection_box(), Some((0.0, 0.0, 500.0, 200.0)));
    harness.release(500.0, 200.0);

    assert_eq!(harness.selected_node_ids(), vec!["a", "b"]);
    assert_eq!(harness.ctrl.selection_box(), None);
    assert!(harness.node_item("a").unwrap().selected);
    assert!(!harness.node_item("c").unwrap().selected);
}

#[test]
fn test_area_selection_dragged_backwards() {
    let harness = EditorHarness::new(scattered());
    harness.drag((500.0, 200.0), (0.0, 0.0));
    // the press lands on `b`, so this is a node drag, not a box
    assert_eq!(harness.selected_node_ids(), vec!["b"]);

    let harness = EditorHarness::new(scattered());
    harness.drag((510.0, 10.0), (10.0, 190.0));
    assert_eq!(harness.selected_node_ids(), vec!["a", "b"]);
}

#[test]
fn test_ctrl_area_selection_adds() {
    let harness = EditorHarness::new(scattered());
    harness.click(600.0, 80.0);
    assert_eq!(harness.selected_node_ids(), vec!["c"]);

    harness.press_with(0.0, 0.0, LEFT, false, true);
    harness.move_to(500.0, 200.0);
    harness.ctrl.pointer_released_callback()(500.0, 200.0, LEFT, false, true);
    assert_eq!(harness.selected_node_ids(), vec!["c", "a", "b"]);
}

#[test]
fn test_plain_area_selection_replaces() {
    let harness = EditorHarness::new(scattered());
    harness.click(600.0, 80.0);
    harness.drag((0.0, 0.0), (500.0, 200.0));
    assert_eq!(harness.selected_node_ids(), vec!["a", "b"]);
}

#[test]
fn test_click_on_canvas_clears() {
    let harness = EditorHarness::new(scattered());
    harness.click(100.0, 80.0);
    assert_eq!(harness.selected_node_ids(), vec!["a"]);
    harness.click(900.0, 700.0);
    assert!(harness.selected_node_ids().is_empty());
}

#[test]
fn test_ctrl_click_toggles() {
    let harness = EditorHarness::new(scattered());
    harness.click(100.0, 80.0);
    harness.ctrl_click(600.0, 80.0);
    assert_eq!(harness.selected_node_ids(), vec!["a", "c"]);
    harness.ctrl_click(100.0, 80.0);
    assert_eq!(harness.selected_node_ids(), vec!["c"]);
}

#[test]
fn test_plain_click_replaces() {
    let harness = EditorHarness::new(scattered());
    harness.click(100.0, 80.0);
    harness.click(600.0, 80.0);
    assert_eq!(harness.selected_node_ids(), vec!["c"]);
}

#[test]
fn test_group_selection_excludes_nodes() {
    let mut graph = scattered();
    let group = graph.create_group("Rack", Rect::new(800.0, 400.0, 300.0, 200.0));
    let harness = EditorHarness::new(graph);

    harness.click(100.0, 80.0);
    harness.click(1000.0, 580.0);
    assert!(harness.selected_node_ids().is_empty());
    assert!(harness.group_item(&group).unwrap().selected);
    assert_eq!(harness.with_editor(|e| e.resize_handles().len()), 8);

    harness.click(100.0, 80.0);
    assert!(!harness.group_item(&group).unwrap().selected);
    assert!(harness.with_editor(|e| e.resize_handles().is_empty()));
}

#[test]
fn test_focus_node_selects_and_centers() {
    let harness = EditorHarness::new(scattered());
    let metrics = harness.ctrl.metrics();
    assert!(harness.with_editor(|e| e.focus_node("d", &metrics)));
    assert_eq!(harness.selected_node_ids(), vec!["d"]);

    let d = harness.node_item("d").unwrap();
    assert_eq!((d.x + d.width / 2.0, d.y + d.height / 2.0), (600.0, 400.0));
}
