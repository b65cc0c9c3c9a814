//! Headless harness around [`EditorController`].
//!
//! Binds node, edge and group models the way an application would and
//! drives the controller through the same callbacks the canvas uses.

#![allow(dead_code)]

use slint::{Model, ModelRc, SharedString, VecModel};
use std::rc::Rc;
use topology_editor::{EdgeItem, Editor, EditorConfig, EditorController, Graph, GroupItem, NodeItem};

pub const LEFT: i32 = 0;
pub const MIDDLE: i32 = 1;
pub const RIGHT: i32 = 2;

pub struct EditorHarness {
    pub ctrl: EditorController,
    pub nodes: Rc<VecModel<NodeItem>>,
    pub edges: Rc<VecModel<EdgeItem>>,
    pub groups: Rc<VecModel<GroupItem>>,
    pub selected_nodes: ModelRc<SharedString>,
    pub selected_edges: ModelRc<SharedString>,
}

impl EditorHarness {
    pub fn new(graph: Graph) -> Self {
        super::init_tracing();
        let ctrl = EditorController::from_editor(Editor::with_graph(graph, EditorConfig::default()));
        ctrl.set_canvas_size(1200.0, 800.0);

        let nodes = Rc::new(VecModel::default());
        ctrl.bind_node_model(nodes.clone(), NodeItem::clone);
        let edges = Rc::new(VecModel::default());
        ctrl.bind_edge_model(edges.clone(), EdgeItem::clone);
        let groups = Rc::new(VecModel::default());
        ctrl.bind_group_model(groups.clone(), GroupItem::clone);

        let selected_nodes = ctrl.selected_nodes_model();
        let selected_edges = ctrl.selected_edges_model();
        ctrl.refresh();

        Self { ctrl, nodes, edges, groups, selected_nodes, selected_edges }
    }

    pub fn empty() -> Self {
        Self::new(Graph::new())
    }

    /// Run `f` against the editor.
    pub fn with_editor<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        let editor = self.ctrl.editor();
        let result = f(&mut editor.borrow_mut());
        self.ctrl.refresh();
        result
    }

    pub fn graph(&self) -> Graph {
        self.ctrl.editor().borrow().graph().clone()
    }

    // === Input ===

    pub fn press(&self, x: f32, y: f32) {
        self.ctrl.pointer_pressed_callback()(x, y, LEFT, false, false);
    }

    pub fn press_with(&self, x: f32, y: f32, button: i32, shift: bool, ctrl: bool) {
        self.ctrl.pointer_pressed_callback()(x, y, button, shift, ctrl);
    }

    pub fn move_to(&self, x: f32, y: f32) {
        self.ctrl.pointer_moved_callback()(x, y);
    }

    pub fn release(&self, x: f32, y: f32) {
        self.ctrl.pointer_released_callback()(x, y, LEFT, false, false);
    }

    pub fn click(&self, x: f32, y: f32) {
        self.press(x, y);
        self.release(x, y);
    }

    pub fn ctrl_click(&self, x: f32, y: f32) {
        self.press_with(x, y, LEFT, false, true);
        self.ctrl.pointer_released_callback()(x, y, LEFT, false, true);
    }

    /// Press, move in a few steps, release.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.press(from.0, from.1);
        for step in 1..=4 {
            let t = step as f32 / 4.0;
            self.move_to(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
        }
        self.release(to.0, to.1);
    }

    pub fn key(&self, name: &str) -> bool {
        self.ctrl.key_pressed_callback()(name.into(), false)
    }

    // === Model queries ===

    pub fn node_item(&self, id: &str) -> Option<NodeItem> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn group_item(&self, id: &str) -> Option<GroupItem> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn selected_node_ids(&self) -> Vec<String> {
        self.selected_nodes.iter().map(|s| s.to_string()).collect()
    }

    pub fn selected_edge_ids(&self) -> Vec<String> {
        self.selected_edges.iter().map(|s| s.to_string()).collect()
    }
}
