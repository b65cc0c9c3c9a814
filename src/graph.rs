//! The topology graph: nodes, edges, groups and the node-type catalog.
//!
//! Membership is stored on the node ([`Node::group_id`]); a group never
//! lists its members. Edge endpoints are strings: a node id, or a group id
//! behind the [`GROUP_PREFIX`] marker (see [`EndpointRef`]).

use crate::catalog::{self, IconType, NodeType};
use crate::config::{EditorConfig, MIN_GROUP_HEIGHT, MIN_GROUP_WIDTH, NODE_HEIGHT, NODE_WIDTH};
use crate::containment;
use crate::hit_test::{AnchorHandle, LinkGeometry, NodeGeometry, Rect};
use crate::path::{anchor_position, group_anchor_position, Anchor, CubicBezier, Point};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Marker in front of a group id when a group is an edge endpoint.
pub const GROUP_PREFIX: &str = "group-";
/// Arrow style given to new edges and to edges loaded without one.
pub const DEFAULT_ARROW: &str = "standard";
/// Color of newly created groups.
pub const DEFAULT_GROUP_COLOR: &str = "#3b82f6";
/// Size of a newly created empty group.
pub const DEFAULT_GROUP_SIZE: (f32, f32) = (300.0, 200.0);
/// Space left around the members of a group built from a selection.
const GROUP_PADDING: f32 = 40.0;
/// Space above the topmost member; matches the default group header.
const GROUP_TITLE_SPACE: f32 = 60.0;

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Optional text field: `null` and values that are not strings read as `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_arrow<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_text(deserializer)?
        .filter(|arrow| !arrow.is_empty())
        .unwrap_or_else(|| DEFAULT_ARROW.to_string()))
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(deserialize_with = "lenient_label")]
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub group_id: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type: node_type.into(),
            x,
            y,
            group_id: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Render footprint in world units.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, NODE_WIDTH, NODE_HEIGHT)
    }

    pub fn is_in(&self, group_id: &str) -> bool {
        self.group_id.as_deref() == Some(group_id)
    }
}

impl NodeGeometry for &Node {
    fn id(&self) -> &str {
        &self.id
    }
    fn rect(&self) -> Rect {
        Node::rect(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub from_anchor: Anchor,
    pub to: String,
    pub to_anchor: Anchor,
    #[serde(deserialize_with = "lenient_arrow")]
    pub arrow_type: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub label: Option<String>,
}

impl Default for Edge {
    fn default() -> Self {
        Self {
            id: String::new(),
            from: String::new(),
            from_anchor: Anchor::Bottom,
            to: String::new(),
            to_anchor: Anchor::Top,
            arrow_type: DEFAULT_ARROW.to_string(),
            label: None,
        }
    }
}

impl Edge {
    pub fn source(&self) -> EndpointRef {
        EndpointRef::parse(&self.from)
    }

    pub fn target(&self) -> EndpointRef {
        EndpointRef::parse(&self.to)
    }

    pub fn touches(&self, endpoint: &EndpointRef) -> bool {
        let key = endpoint.key();
        self.from == key || self.to == key
    }
}

/// What an edge endpoint string refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointRef {
    Node(String),
    Group(String),
}

impl EndpointRef {
    pub fn parse(key: &str) -> Self {
        match key.strip_prefix(GROUP_PREFIX) {
            Some(group_id) => EndpointRef::Group(group_id.to_string()),
            None => EndpointRef::Node(key.to_string()),
        }
    }

    /// The string stored in [`Edge::from`] / [`Edge::to`].
    pub fn key(&self) -> String {
        match self {
            EndpointRef::Node(id) => id.clone(),
            EndpointRef::Group(id) => format!("{GROUP_PREFIX}{id}"),
        }
    }
}

impl fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    #[default]
    Vm,
    Cluster,
    Zone,
}

impl GroupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKind::Vm => "vm",
            GroupKind::Cluster => "cluster",
            GroupKind::Zone => "zone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKind::Vm => "Virtual Machine",
            GroupKind::Cluster => "Cluster",
            GroupKind::Zone => "Zone/Region",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            GroupKind::Vm => "🖥️",
            GroupKind::Cluster => "🔷",
            GroupKind::Zone => "🌐",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSpecs {
    pub cpu: String,
    pub ram: String,
    pub disk: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeRole {
    pub id: String,
    pub name: String,
    pub count: u32,
    pub cpu: String,
    pub ram: String,
    pub disk: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram: Option<String>,
}

impl Default for NodeRole {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            count: 1,
            cpu: "2 vCPU".to_string(),
            ram: "4 GB".to_string(),
            disk: "50 GB".to_string(),
            gpu: None,
            vram: None,
        }
    }
}

impl NodeRole {
    /// A role with a fresh id and the stock sizing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id("role"),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<IconType>,
    pub specs: GroupSpecs,
    pub node_roles: Vec<NodeRole>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: GroupKind::Vm,
            x: 0.0,
            y: 0.0,
            width: DEFAULT_GROUP_SIZE.0,
            height: DEFAULT_GROUP_SIZE.1,
            color: DEFAULT_GROUP_COLOR.to_string(),
            icon: None,
            icon_type: None,
            specs: GroupSpecs::default(),
            node_roles: Vec::new(),
        }
    }
}

impl Group {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, r: Rect) {
        self.x = r.x;
        self.y = r.y;
        self.width = r.width;
        self.height = r.height;
    }

    /// Machines across all roles.
    pub fn total_nodes(&self) -> u32 {
        self.node_roles.iter().map(|r| r.count).sum()
    }

    /// Custom icon if set, else the icon of the group kind.
    pub fn display_icon(&self) -> &str {
        match self.icon.as_deref() {
            Some(icon) if !icon.is_empty() => icon,
            _ => self.kind.icon(),
        }
    }

    pub fn endpoint(&self) -> EndpointRef {
        EndpointRef::Group(self.id.clone())
    }
}

// ============================================================================
// Link Validation
// ============================================================================

/// Reasons a connection is refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Endpoint does not resolve to a node or group
    EndpointNotFound(String),
    /// Source and target are the same node or group
    SameEndpoint,
    /// An edge with the same direction already exists
    DuplicateLink,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndpointNotFound(key) => write!(f, "Endpoint {} not found", key),
            Self::SameEndpoint => write!(f, "Cannot link an element to itself"),
            Self::DuplicateLink => write!(f, "Link already exists"),
        }
    }
}

// ============================================================================
// Edge routing
// ============================================================================

/// An edge with both endpoints resolved to world positions.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute<'a> {
    pub edge: &'a Edge,
    pub start: Point,
    pub end: Point,
    pub curve: CubicBezier,
}

impl LinkGeometry for &EdgeRoute<'_> {
    fn id(&self) -> &str {
        &self.edge.id
    }
    fn curve(&self) -> CubicBezier {
        self.curve
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Everything a dashboard draws.
///
/// `vms` and `domains` belong to other views of a dashboard and are carried
/// through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub groups: Vec<Group>,
    pub node_types: Vec<NodeType>,
    pub vms: Vec<serde_json::Value>,
    pub domains: Vec<serde_json::Value>,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            groups: Vec::new(),
            node_types: catalog::default_node_types(),
            vms: Vec::new(),
            domains: Vec::new(),
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn nodes_in_group<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.is_in(group_id))
    }

    pub fn ungrouped_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.group_id.is_none())
    }

    pub fn member_count(&self, group_id: &str) -> usize {
        self.nodes_in_group(group_id).count()
    }

    /// Nodes whose label or type contains `query`, ignoring case.
    pub fn search_nodes(&self, query: &str) -> Vec<&Node> {
        let q = query.to_lowercase();
        self.nodes
            .iter()
            .filter(|n| q.is_empty() || n.label.to_lowercase().contains(&q) || n.node_type.to_lowercase().contains(&q))
            .collect()
    }

    /// Groups whose name or kind contains `query`, ignoring case.
    pub fn search_groups(&self, query: &str) -> Vec<&Group> {
        let q = query.to_lowercase();
        self.groups
            .iter()
            .filter(|g| q.is_empty() || g.name.to_lowercase().contains(&q) || g.kind.as_str().contains(&q))
            .collect()
    }

    pub fn endpoint_exists(&self, endpoint: &EndpointRef) -> bool {
        match endpoint {
            EndpointRef::Node(id) => self.node(id).is_some(),
            EndpointRef::Group(id) => self.group(id).is_some(),
        }
    }

    /// World position of `anchor` on a node or group, if it exists.
    pub fn anchor_point(&self, endpoint: &EndpointRef, anchor: Anchor) -> Option<Point> {
        match endpoint {
            EndpointRef::Node(id) => self.node(id).map(|n| anchor_position(n.rect(), anchor)),
            EndpointRef::Group(id) => self.group(id).map(|g| group_anchor_position(g.rect(), anchor)),
        }
    }

    /// Every grabbable anchor, nodes before groups.
    pub fn anchor_handles(&self) -> Vec<AnchorHandle> {
        let node_handles = self.nodes.iter().flat_map(|n| {
            Anchor::HANDLES.into_iter().map(move |anchor| AnchorHandle {
                endpoint: EndpointRef::Node(n.id.clone()),
                anchor,
                position: anchor_position(n.rect(), anchor),
            })
        });
        let group_handles = self.groups.iter().flat_map(|g| {
            Anchor::HANDLES.into_iter().map(move |anchor| AnchorHandle {
                endpoint: g.endpoint(),
                anchor,
                position: group_anchor_position(g.rect(), anchor),
            })
        });
        node_handles.chain(group_handles).collect()
    }

    /// Bounding box of all node footprints.
    pub fn node_bounds(&self) -> Option<Rect> {
        self.nodes.iter().map(Node::rect).reduce(|acc, r| acc.union(&r))
    }

    pub fn edge_exists(&self, from: &EndpointRef, to: &EndpointRef) -> bool {
        let (from, to) = (from.key(), to.key());
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// Resolve an edge to world geometry. `None` while either end dangles.
    pub fn route<'a>(&self, edge: &'a Edge, bezier_offset: f32) -> Option<EdgeRoute<'a>> {
        let start = self.anchor_point(&edge.source(), edge.from_anchor)?;
        let end = self.anchor_point(&edge.target(), edge.to_anchor)?;
        Some(EdgeRoute {
            edge,
            start,
            end,
            curve: CubicBezier::from_anchors(start, end, edge.from_anchor, edge.to_anchor, bezier_offset),
        })
    }

    /// Routes for every edge whose endpoints exist.
    pub fn routes(&self, bezier_offset: f32) -> Vec<EdgeRoute<'_>> {
        self.edges.iter().filter_map(|e| self.route(e, bezier_offset)).collect()
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Add a node of `node_type` with its top-left at `at`.
    ///
    /// The position is stored as given; callers snap it to their grid. The
    /// label comes from the catalog entry, or from the service entry for an
    /// unknown type. An empty type means the stock service type.
    pub fn add_node(&mut self, node_type: &str, at: Point) -> String {
        let node_type = if node_type.is_empty() { catalog::DEFAULT_NODE_TYPE } else { node_type };
        let label = catalog::default_label(&self.node_types, node_type);
        let id = new_id("node");
        self.nodes.push(Node::new(id.clone(), label, node_type, at.x, at.y));
        tracing::debug!(node = %id, node_type, "node added");
        id
    }

    /// Copy a node 40 units down and right, outside any group.
    pub fn duplicate_node(&mut self, id: &str) -> Option<String> {
        let source = self.node(id)?;
        let copy = Node::new(
            new_id("node"),
            format!("{} (copy)", source.label),
            source.node_type.clone(),
            source.x + 40.0,
            source.y + 40.0,
        );
        let copy_id = copy.id.clone();
        self.nodes.push(copy);
        Some(copy_id)
    }

    pub fn set_node_label(&mut self, id: &str, label: impl Into<String>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.label = label.into();
                true
            }
            None => false,
        }
    }

    pub fn set_node_type(&mut self, id: &str, node_type: impl Into<String>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.node_type = node_type.into();
                true
            }
            None => false,
        }
    }

    /// Delete nodes and every edge touching them. Returns how many nodes went.
    pub fn delete_nodes<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let doomed = |id: &str| ids.iter().any(|d| d.as_ref() == id);
        let before = self.nodes.len();
        self.nodes.retain(|n| !doomed(&n.id));
        self.edges.retain(|e| !doomed(&e.from) && !doomed(&e.to));
        let removed = before - self.nodes.len();
        tracing::debug!(removed, "nodes deleted");
        removed
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Validate a connection between two endpoints
    pub fn validate_link(&self, from: &EndpointRef, to: &EndpointRef) -> Result<(), ValidationError> {
        if from == to {
            return Err(ValidationError::SameEndpoint);
        }
        for endpoint in [from, to] {
            if !self.endpoint_exists(endpoint) {
                return Err(ValidationError::EndpointNotFound(endpoint.key()));
            }
        }
        if self.edge_exists(from, to) {
            return Err(ValidationError::DuplicateLink);
        }
        Ok(())
    }

    /// Create a `standard` edge with an empty label. Returns the new edge id.
    pub fn connect(
        &mut self,
        from: &EndpointRef,
        from_anchor: Anchor,
        to: &EndpointRef,
        to_anchor: Anchor,
    ) -> Result<String, ValidationError> {
        self.validate_link(from, to)?;
        let id = new_id("edge");
        self.edges.push(Edge {
            id: id.clone(),
            from: from.key(),
            from_anchor,
            to: to.key(),
            to_anchor,
            arrow_type: DEFAULT_ARROW.to_string(),
            label: Some(String::new()),
        });
        tracing::debug!(edge = %id, %from, %to, "edge created");
        Ok(id)
    }

    pub fn delete_edges<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| !ids.iter().any(|d| d.as_ref() == e.id));
        before - self.edges.len()
    }

    pub fn set_edge_label(&mut self, id: &str, label: impl Into<String>) -> bool {
        match self.edges.iter_mut().find(|e| e.id == id) {
            Some(edge) => {
                edge.label = Some(label.into());
                true
            }
            None => false,
        }
    }

    pub fn set_edge_arrow(&mut self, id: &str, arrow_type: impl Into<String>) -> bool {
        match self.edges.iter_mut().find(|e| e.id == id) {
            Some(edge) => {
                edge.arrow_type = arrow_type.into();
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Add an empty group with the given frame, floored to the minimum
    /// size. Returns the new group id.
    pub fn create_group(&mut self, name: impl Into<String>, frame: Rect) -> String {
        let id = new_id("group");
        self.groups.push(Group {
            id: id.clone(),
            name: name.into(),
            x: frame.x,
            y: frame.y,
            width: frame.width.max(MIN_GROUP_WIDTH),
            height: frame.height.max(MIN_GROUP_HEIGHT),
            ..Group::default()
        });
        tracing::debug!(group = %id, "group created");
        id
    }

    /// Wrap existing nodes in a new group sized around them.
    ///
    /// The frame covers every member's full footprint plus padding, with
    /// room for the title bar above the topmost node, so each member starts
    /// inside the group's interior. Unknown ids are ignored; `None` if none
    /// of them exist.
    pub fn create_group_around<S: AsRef<str>>(&mut self, name: impl Into<String>, node_ids: &[S]) -> Option<String> {
        let members: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| node_ids.iter().any(|id| id.as_ref() == n.id))
            .collect();
        let min_x = members.iter().map(|n| n.x).reduce(f32::min)? - GROUP_PADDING;
        let min_y = members.iter().map(|n| n.y).reduce(f32::min)? - GROUP_TITLE_SPACE;
        let max_x = members.iter().map(|n| n.x).reduce(f32::max)? + NODE_WIDTH + GROUP_PADDING;
        let max_y = members.iter().map(|n| n.y).reduce(f32::max)? + NODE_HEIGHT + GROUP_PADDING;

        let id = new_id("group");
        self.groups.push(Group {
            id: id.clone(),
            name: name.into(),
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(MIN_GROUP_WIDTH),
            height: (max_y - min_y).max(MIN_GROUP_HEIGHT),
            specs: GroupSpecs {
                cpu: "4 vCPU".to_string(),
                ram: "16 GB".to_string(),
                disk: "100 GB".to_string(),
            },
            ..Group::default()
        });
        for node in self.nodes.iter_mut() {
            if node_ids.iter().any(|id| id.as_ref() == node.id) {
                node.group_id = Some(id.clone());
            }
        }
        Some(id)
    }

    /// Edit a group's properties in place.
    ///
    /// The id cannot change and the minimum size is enforced afterwards.
    pub fn update_group(&mut self, id: &str, edit: impl FnOnce(&mut Group)) -> bool {
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        edit(group);
        group.id = id.to_string();
        group.width = group.width.max(MIN_GROUP_WIDTH);
        group.height = group.height.max(MIN_GROUP_HEIGHT);
        true
    }

    /// Copy a group 50 units down and right. The copy starts empty and its
    /// roles get fresh ids.
    pub fn duplicate_group(&mut self, id: &str) -> Option<String> {
        let source = self.group(id)?;
        let copy = Group {
            id: new_id("group"),
            name: format!("{} (Copy)", source.name),
            x: source.x + 50.0,
            y: source.y + 50.0,
            node_roles: source
                .node_roles
                .iter()
                .map(|r| NodeRole { id: new_id("role"), ..r.clone() })
                .collect(),
            ..source.clone()
        };
        let copy_id = copy.id.clone();
        self.groups.push(copy);
        Some(copy_id)
    }

    /// Remove a group. Its members stay, ungrouped; edges to the group go.
    pub fn delete_group(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        if self.groups.len() == before {
            return false;
        }
        for node in self.nodes.iter_mut().filter(|n| n.is_in(id)) {
            node.group_id = None;
        }
        let endpoint = EndpointRef::Group(id.to_string());
        self.edges.retain(|e| !e.touches(&endpoint));
        tracing::debug!(group = %id, "group deleted");
        true
    }

    /// Put a node into a group, moving it inside if it sits outside.
    pub fn add_to_group(&mut self, node_id: &str, group_id: &str, config: &EditorConfig) -> bool {
        let Some(frame) = self.group(group_id).map(Group::rect) else {
            return false;
        };
        let Some(node) = self.node_mut(node_id) else {
            return false;
        };
        node.group_id = Some(group_id.to_string());
        let placed = containment::place_inside(frame, node.position(), config);
        node.set_position(placed);
        true
    }

    /// Take a node out of its group. Its position is unchanged.
    pub fn remove_from_group(&mut self, node_id: &str) -> bool {
        match self.node_mut(node_id) {
            Some(node) => node.group_id.take().is_some(),
            None => false,
        }
    }

    /// Move a node to another group, or out of any group with `None`.
    pub fn change_group(&mut self, node_id: &str, group_id: Option<&str>, config: &EditorConfig) -> bool {
        match group_id.filter(|g| !g.is_empty()) {
            Some(group_id) => self.add_to_group(node_id, group_id, config),
            None => self.node_mut(node_id).map(|n| n.group_id = None).is_some(),
        }
    }

    /// Translate a group and all of its members.
    pub fn translate_group(&mut self, id: &str, delta: Point) -> bool {
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        group.x += delta.x;
        group.y += delta.y;
        for node in self.nodes.iter_mut().filter(|n| n.is_in(id)) {
            node.x += delta.x;
            node.y += delta.y;
        }
        true
    }

    /// Give a group a new frame and pull its members back inside.
    pub fn set_group_frame(&mut self, id: &str, frame: Rect, config: &EditorConfig) -> bool {
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        group.set_rect(frame);
        for node in self.nodes.iter_mut().filter(|n| n.is_in(id)) {
            let clamped = containment::clamp_into(frame, node.position(), config);
            node.set_position(clamped);
        }
        true
    }

    // ------------------------------------------------------------------
    // Node types
    // ------------------------------------------------------------------

    /// Append a catalog entry. Incomplete entries are refused.
    pub fn add_node_type(&mut self, node_type: NodeType) -> bool {
        if !node_type.is_complete() {
            return false;
        }
        self.node_types.push(node_type);
        true
    }

    pub fn update_node_type(&mut self, index: usize, node_type: NodeType) -> bool {
        match self.node_types.get_mut(index) {
            Some(slot) => {
                *slot = node_type;
                true
            }
            None => false,
        }
    }

    pub fn remove_node_type(&mut self, index: usize) -> Option<NodeType> {
        (index < self.node_types.len()).then(|| self.node_types.remove(index))
    }
}

// ============================================================================
// Tests
// ============================================================================
