use indexmap::IndexSet;
use slint::{Model, SharedString, VecModel};

/// What the user has selected.
///
/// Nodes and edges are kept in click order. Node, edge and group selections
/// exclude each other: picking from one kind clears the others, except that
/// ctrl/cmd-toggling nodes leaves a selected group alone.
#[derive(Debug, Default, Clone)]
pub struct SelectionManager {
    nodes: IndexSet<String>,
    edges: IndexSet<String>,
    group: Option<String>,
}

fn toggle(set: &mut IndexSet<String>, id: &str) {
    if !set.shift_remove(id) {
        set.insert(id.to_string());
    }
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on a node
    ///
    /// With `toggle` (ctrl/cmd) the node flips in or out of the selection.
    /// A plain click on an unselected node selects just that node; a plain
    /// click on an already selected node keeps the whole selection so it can
    /// be dragged together.
    pub fn click_node(&mut self, id: &str, toggle_held: bool) {
        if toggle_held {
            toggle(&mut self.nodes, id);
        } else if !self.nodes.contains(id) {
            self.nodes.clear();
            self.nodes.insert(id.to_string());
            self.group = None;
        }
        self.edges.clear();
    }

    /// Handle a click on an edge; same toggle rules as nodes.
    pub fn click_edge(&mut self, id: &str, toggle_held: bool) {
        if toggle_held {
            toggle(&mut self.edges, id);
        } else {
            self.edges.clear();
            self.edges.insert(id.to_string());
            self.nodes.clear();
            self.group = None;
        }
    }

    pub fn select_group(&mut self, id: &str) {
        self.nodes.clear();
        self.edges.clear();
        self.group = Some(id.to_string());
    }

    /// Replace the node selection, e.g. after an area selection
    pub fn replace_nodes<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.nodes.clear();
        self.extend_nodes(ids);
    }

    /// Add nodes to the current selection
    pub fn extend_nodes<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.nodes.extend(ids);
        self.edges.clear();
        self.group = None;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.group = None;
    }

    /// Drop ids that no longer exist
    pub fn forget<S: AsRef<str>>(&mut self, ids: &[S]) {
        for id in ids {
            let id = id.as_ref();
            self.nodes.shift_remove(id);
            self.edges.shift_remove(id);
            if self.group.as_deref() == Some(id) {
                self.group = None;
            }
        }
    }

    /// Keep only ids the predicates accept
    pub fn retain(&mut self, node_exists: impl Fn(&str) -> bool, edge_exists: impl Fn(&str) -> bool) {
        self.nodes.retain(|id| node_exists(id));
        self.edges.retain(|id| edge_exists(id));
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn edges(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn edge_ids(&self) -> Vec<String> {
        self.edges.iter().cloned().collect()
    }

    /// The node, when exactly one is selected
    pub fn selected_node(&self) -> Option<&str> {
        match self.nodes.len() {
            1 => self.nodes.first().map(String::as_str),
            _ => None,
        }
    }

    /// The edge, when exactly one is selected
    pub fn selected_edge(&self) -> Option<&str> {
        match self.edges.len() {
            1 => self.edges.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.group.is_none()
    }

    /// Sync the selected node ids to a Slint VecModel
    pub fn sync_to_model(&self, model: &VecModel<SharedString>) {
        sync_ids(self.nodes.iter(), model);
    }

    /// Sync the selected edge ids to a Slint VecModel
    pub fn sync_edges_to_model(&self, model: &VecModel<SharedString>) {
        sync_ids(self.edges.iter(), model);
    }

    /// Read a node selection back from any Slint model
    pub fn sync_from_model(&mut self, model: &dyn Model<Data = SharedString>) {
        let ids = (0..model.row_count())
            .filter_map(|i| model.row_data(i))
            .map(|s| s.to_string());
        self.replace_nodes(ids);
    }
}

fn sync_ids<'a>(ids: impl Iterator<Item = &'a String>, model: &VecModel<SharedString>) {
    model.set_vec(ids.map(SharedString::from).collect::<Vec<_>>());
}
