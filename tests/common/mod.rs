//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use topology_editor::{Graph, Node, Point, Rect};

/// Install a subscriber once so `RUST_LOG=topology_editor=debug` shows
/// gesture logs while a test runs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Node `a` at the origin and node `b` 300 units to its right.
pub fn two_nodes() -> Graph {
    let mut graph = Graph::new();
    graph.nodes.push(Node::new("a", "A", "db", 0.0, 0.0));
    graph.nodes.push(Node::new("b", "B", "api", 300.0, 0.0));
    graph
}

/// `two_nodes` plus a 300x200 group at (100, 300).
pub fn nodes_and_group() -> (Graph, String) {
    let mut graph = two_nodes();
    let group = graph.create_group("Cluster", Rect::new(100.0, 300.0, 300.0, 200.0));
    (graph, group)
}

pub fn position(graph: &Graph, id: &str) -> Point {
    graph.node(id).map(|n| n.position()).unwrap_or_else(|| panic!("no node {id}"))
}
