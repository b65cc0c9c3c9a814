//! The editing session: graph, viewport, selection and the gesture state
//! machine, driven by pointer and keyboard events.
//!
//! Events arrive in canvas-relative screen pixels. The editor converts them
//! to world units, picks what lies under the pointer (unless the caller
//! already knows, see [`Editor::pointer_down_on`]) and advances the
//! [`Gesture`]. Every committed mutation is recorded as a [`Change`] that the
//! owner drains with [`Editor::take_change`] to drive autosave.

use crate::autosave::Change;
use crate::catalog::{self, NodeType, NodeVisual};
use crate::config::EditorConfig;
use crate::containment::{self, ResizeHandle};
use crate::graph::{EndpointRef, Graph, Group, GroupKind, GroupSpecs, DEFAULT_GROUP_SIZE};
use crate::grid::{generate_grid_commands, snap_to_spacing, GridStyle};
use crate::hit_test::{self, Rect};
use crate::interaction::{ContextMenu, EditorKey, Gesture, HitTarget, PointerButton, PointerEvent};
use crate::path::{Anchor, CubicBezier, Point};
use crate::selection::SelectionManager;
use crate::viewport::{Viewport, ViewportMetrics};
use std::mem;
use tracing::debug;

// ============================================================================
// Views
// ============================================================================

/// A node ready to draw, in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub node_type: String,
    pub rect: Rect,
    pub group_id: Option<String>,
    pub visual: NodeVisual,
    pub selected: bool,
}

/// A routed edge ready to draw, in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub id: String,
    pub curve: CubicBezier,
    pub midpoint: Point,
    pub label: String,
    pub arrow_type: String,
    pub selected: bool,
}

impl EdgeView {
    pub fn path(&self) -> String {
        self.curve.to_svg()
    }
}

/// A group frame ready to draw, in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub kind: GroupKind,
    pub rect: Rect,
    pub color: String,
    pub icon: String,
    pub icon_is_image: bool,
    pub specs: GroupSpecs,
    pub member_count: usize,
    pub total_nodes: u32,
    pub selected: bool,
}

// ============================================================================
// Editor
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Editor {
    graph: Graph,
    viewport: Viewport,
    selection: SelectionManager,
    gesture: Gesture,
    context_menu: Option<ContextMenu>,
    config: EditorConfig,
    change: Option<Change>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn with_graph(graph: Graph, config: EditorConfig) -> Self {
        Self { graph, config, ..Self::default() }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Set the distance of edge control points from their anchors.
    pub fn set_bezier_offset(&mut self, offset: f32) {
        self.config.bezier_offset = offset;
    }

    /// Set the spacing used for drag snapping and the background grid.
    pub fn set_grid_spacing(&mut self, spacing: f32) {
        self.config.grid_size = spacing;
    }

    /// Swap in another dashboard's graph. Everything tied to the old one
    /// (gesture, selection, menu, unsaved change) is dropped.
    pub fn replace_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.gesture = Gesture::Idle;
        self.selection.clear();
        self.context_menu = None;
        self.change = None;
    }

    /// The strongest change recorded since the last call.
    pub fn take_change(&mut self) -> Option<Change> {
        self.change.take()
    }

    fn mark(&mut self, change: Change) {
        self.change = self.change.max(Some(change));
    }

    fn snap(&self, p: Point) -> Point {
        Point::new(
            snap_to_spacing(p.x, self.config.grid_size),
            snap_to_spacing(p.y, self.config.grid_size),
        )
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// What lies under a world point.
    ///
    /// Priority: resize handle of the selected group, anchor handle, node,
    /// edge, group body, canvas. Handles sit on the same points as the
    /// group's side anchors, so the selected group's handles come first.
    /// Pick radii are screen pixels and shrink in world units as the view
    /// zooms in.
    pub fn hit_target(&self, world: Point) -> HitTarget {
        let scale = self.viewport.scale;

        if let Some(group) = self.selection.selected_group().and_then(|id| self.graph.group(id)) {
            if let Some(handle) =
                hit_test::find_resize_handle_at(world, group.rect(), self.config.handle_hit_radius / scale)
            {
                return HitTarget::ResizeHandle { group_id: group.id.clone(), handle };
            }
        }

        if let Some(handle) =
            hit_test::find_anchor_at(world, self.graph.anchor_handles(), self.config.anchor_hit_radius / scale)
        {
            return HitTarget::Anchor { endpoint: handle.endpoint, anchor: handle.anchor };
        }

        if let Some(id) = hit_test::find_node_at(world, self.graph.nodes.iter()) {
            return HitTarget::Node(id);
        }

        let routes = self.graph.routes(self.config.bezier_offset);
        if let Some(id) = hit_test::find_edge_at(
            world,
            routes.iter(),
            self.config.edge_hover_distance / scale,
            self.config.edge_hit_samples,
        ) {
            return HitTarget::Edge(id);
        }

        match self.graph.groups.iter().rev().find(|g| g.rect().contains(world)) {
            Some(group) => HitTarget::Group(group.id.clone()),
            None => HitTarget::Canvas,
        }
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, event: PointerEvent) {
        let target = self.hit_target(self.viewport.screen_to_world(event.position));
        self.pointer_down_on(event, target);
    }

    /// Press with a target the caller already resolved.
    pub fn pointer_down_on(&mut self, event: PointerEvent, target: HitTarget) {
        let world = self.viewport.screen_to_world(event.position);

        if event.button == PointerButton::Right {
            self.context_menu = Some(ContextMenu { screen: event.position, world });
            return;
        }
        if event.button == PointerButton::Left {
            self.context_menu = None;
        }

        let pan = event.button == PointerButton::Middle
            || (event.modifiers.shift && target == HitTarget::Canvas);
        self.gesture = if pan {
            Gesture::Panning { anchor: self.viewport.begin_pan(event.position) }
        } else {
            self.press(world, target, event.modifiers.toggle())
        };

        if !self.gesture.is_idle() {
            debug!(gesture = self.gesture.name(), "gesture started");
        }
    }

    fn press(&mut self, world: Point, target: HitTarget, toggle: bool) -> Gesture {
        match target {
            HitTarget::Anchor { endpoint, anchor } => match self.graph.anchor_point(&endpoint, anchor) {
                Some(end) => Gesture::Connecting { source: endpoint, anchor, end },
                None => {
                    debug!(%endpoint, "press on anchor of unknown endpoint");
                    Gesture::Idle
                }
            },
            HitTarget::ResizeHandle { group_id, handle } => match self.graph.group(&group_id).map(Group::rect) {
                Some(start) => {
                    self.selection.select_group(&group_id);
                    Gesture::ResizingGroup { group_id, handle, start, pointer: world }
                }
                None => {
                    debug!(group = %group_id, "resize of unknown group ignored");
                    Gesture::Idle
                }
            },
            HitTarget::Node(id) => {
                if self.graph.node(&id).is_none() {
                    debug!(node = %id, "press on unknown node ignored");
                    return Gesture::Idle;
                }
                self.selection.click_node(&id, toggle);
                if !self.selection.contains_node(&id) {
                    return Gesture::Idle;
                }
                let offsets = self
                    .selection
                    .nodes()
                    .filter_map(|sel| self.graph.node(sel))
                    .map(|n| (n.id.clone(), world - n.position()))
                    .collect();
                Gesture::DraggingNodes { offsets }
            }
            HitTarget::Edge(id) => {
                if self.graph.edge(&id).is_some() {
                    self.selection.click_edge(&id, toggle);
                } else {
                    debug!(edge = %id, "press on unknown edge ignored");
                }
                Gesture::Idle
            }
            HitTarget::Group(id) => match self.graph.group(&id) {
                Some(group) => {
                    let offset = world - Point::new(group.x, group.y);
                    self.selection.select_group(&id);
                    Gesture::DraggingGroup { group_id: id, offset }
                }
                None => {
                    debug!(group = %id, "press on unknown group ignored");
                    Gesture::Idle
                }
            },
            HitTarget::Canvas => Gesture::SelectingArea { start: world, current: world, additive: toggle },
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        let world = self.viewport.screen_to_world(event.position);
        let config = self.config;

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { anchor } => self.viewport.pan_to(event.position, *anchor),
            Gesture::DraggingNodes { offsets } => {
                for (id, offset) in offsets.iter() {
                    let candidate = Point::new(
                        snap_to_spacing(world.x - offset.x, config.grid_size),
                        snap_to_spacing(world.y - offset.y, config.grid_size),
                    );
                    let frame = self
                        .graph
                        .node(id)
                        .and_then(|n| n.group_id.as_deref())
                        .and_then(|g| self.graph.group(g))
                        .map(Group::rect);
                    let target = match frame {
                        Some(frame) => containment::clamp_into(frame, candidate, &config),
                        None => candidate,
                    };
                    if let Some(node) = self.graph.node_mut(id) {
                        node.set_position(target);
                    }
                }
            }
            Gesture::DraggingGroup { group_id, offset } => {
                let Some(origin) = self.graph.group(group_id).map(|g| Point::new(g.x, g.y)) else {
                    return;
                };
                let snapped = Point::new(
                    snap_to_spacing(world.x - offset.x, config.grid_size),
                    snap_to_spacing(world.y - offset.y, config.grid_size),
                );
                let delta = snapped - origin;
                if delta != Point::default() {
                    self.graph.translate_group(group_id, delta);
                }
            }
            Gesture::ResizingGroup { group_id, handle, start, pointer } => {
                let frame = containment::resize_rect(*start, *handle, world - *pointer, &config);
                self.graph.set_group_frame(group_id, frame, &config);
            }
            Gesture::SelectingArea { current, .. } => *current = world,
            Gesture::Connecting { end, .. } => *end = world,
        }
    }

    pub fn pointer_up(&mut self, event: PointerEvent) {
        let target = self.hit_target(self.viewport.screen_to_world(event.position));
        self.pointer_up_on(event, target);
    }

    /// Release with a target the caller already resolved. Always ends idle.
    pub fn pointer_up_on(&mut self, event: PointerEvent, target: HitTarget) {
        let world = self.viewport.screen_to_world(event.position);
        let gesture = mem::take(&mut self.gesture);

        match &gesture {
            Gesture::Idle | Gesture::Panning { .. } => {}
            Gesture::DraggingNodes { .. } | Gesture::DraggingGroup { .. } | Gesture::ResizingGroup { .. } => {
                self.mark(Change::Immediate);
            }
            Gesture::SelectingArea { start, additive, .. } => {
                self.finish_area_selection(Rect::from_corners(*start, world), *additive);
            }
            Gesture::Connecting { source, anchor, .. } => {
                if let HitTarget::Anchor { endpoint, anchor: to_anchor } = target {
                    if endpoint != *source {
                        match self.graph.connect(source, *anchor, &endpoint, to_anchor) {
                            Ok(_) => self.mark(Change::Immediate),
                            Err(e) => debug!(error = %e, "connection refused"),
                        }
                    }
                }
            }
        }

        if !gesture.is_idle() {
            debug!(gesture = gesture.name(), "gesture finished");
        }
    }

    fn finish_area_selection(&mut self, area: Rect, additive: bool) {
        let threshold = self.config.click_threshold;
        if area.width < threshold && area.height < threshold {
            self.selection.clear();
            return;
        }
        let hits = hit_test::nodes_in_selection_box(area, self.graph.nodes.iter());
        if additive {
            self.selection.extend_nodes(hits);
        } else {
            self.selection.replace_nodes(hits);
        }
    }

    /// Zoom one notch at the pointer.
    pub fn wheel(&mut self, cursor: Point, delta_y: f32) {
        self.viewport.wheel(cursor, delta_y, &self.config);
    }

    /// Abandon the gesture in progress without committing it.
    pub fn cancel_gesture(&mut self) {
        if !self.gesture.is_idle() {
            debug!(gesture = self.gesture.name(), "gesture cancelled");
        }
        self.gesture = Gesture::Idle;
    }

    /// Returns true when the key was consumed.
    pub fn key_down(&mut self, key: EditorKey, text_input_focused: bool) -> bool {
        match key {
            EditorKey::Delete | EditorKey::Backspace => !text_input_focused && self.delete_selection(),
            EditorKey::Escape => {
                let connecting = matches!(self.gesture, Gesture::Connecting { .. });
                if connecting {
                    self.cancel_gesture();
                }
                connecting | self.context_menu.take().is_some()
            }
            EditorKey::Other => false,
        }
    }

    // ------------------------------------------------------------------
    // Node and edge commands
    // ------------------------------------------------------------------

    /// Add a node where the context menu was opened and close the menu.
    pub fn add_node_from_menu(&mut self, node_type: &str) -> Option<String> {
        let menu = self.context_menu.take()?;
        Some(self.add_node_at(node_type, menu.world))
    }

    pub fn add_node_at(&mut self, node_type: &str, world: Point) -> String {
        let id = self.graph.add_node(node_type, self.snap(world));
        self.mark(Change::Immediate);
        id
    }

    pub fn duplicate_node(&mut self, id: &str) -> Option<String> {
        let copy = self.graph.duplicate_node(id)?;
        self.mark(Change::Immediate);
        Some(copy)
    }

    /// Delete the selected edges, or the selected nodes if no edge is
    /// selected. Returns false when nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        let edges = self.selection.edge_ids();
        if !edges.is_empty() {
            self.graph.delete_edges(&edges);
            self.selection.forget(&edges);
        } else {
            let nodes = self.selection.node_ids();
            if nodes.is_empty() {
                return false;
            }
            self.graph.delete_nodes(&nodes);
            self.selection.forget(&nodes);
        }
        self.mark(Change::Immediate);
        true
    }

    pub fn set_node_label(&mut self, id: &str, label: &str) -> bool {
        self.debounced(|g| g.set_node_label(id, label))
    }

    pub fn set_node_type(&mut self, id: &str, node_type: &str) -> bool {
        self.debounced(|g| g.set_node_type(id, node_type))
    }

    pub fn set_edge_label(&mut self, id: &str, label: &str) -> bool {
        self.debounced(|g| g.set_edge_label(id, label))
    }

    pub fn set_edge_arrow(&mut self, id: &str, arrow_type: &str) -> bool {
        self.debounced(|g| g.set_edge_arrow(id, arrow_type))
    }

    fn debounced(&mut self, edit: impl FnOnce(&mut Graph) -> bool) -> bool {
        let changed = edit(&mut self.graph);
        if changed {
            self.mark(Change::Debounced);
        }
        changed
    }

    fn immediate(&mut self, edit: impl FnOnce(&mut Graph, &EditorConfig) -> bool) -> bool {
        let config = self.config;
        let changed = edit(&mut self.graph, &config);
        if changed {
            self.mark(Change::Immediate);
        }
        changed
    }

    // ------------------------------------------------------------------
    // Group commands
    // ------------------------------------------------------------------

    /// Add an empty group in the middle of the visible canvas, snapped to
    /// the current grid.
    pub fn create_group(&mut self, name: &str, metrics: &dyn ViewportMetrics) -> String {
        let center = self.viewport.visible_center(metrics);
        let (width, height) = DEFAULT_GROUP_SIZE;
        let origin = self.snap(Point::new(center.x - width / 2.0, center.y - height / 2.0));
        let size = self.snap(Point::new(width, height));
        let frame = Rect::new(origin.x, origin.y, size.x, size.y);
        let id = self.graph.create_group(name, frame);
        self.mark(Change::Immediate);
        id
    }

    /// Wrap the selected nodes in a new group.
    pub fn create_group_from_selection(&mut self, name: &str) -> Option<String> {
        let ids = self.selection.node_ids();
        let id = self.graph.create_group_around(name, &ids)?;
        self.selection.select_group(&id);
        self.mark(Change::Immediate);
        Some(id)
    }

    /// Edit a group's properties. A changed frame pulls members back inside.
    pub fn update_group(&mut self, id: &str, edit: impl FnOnce(&mut Group)) -> bool {
        let config = self.config;
        if !self.graph.update_group(id, edit) {
            return false;
        }
        if let Some(frame) = self.graph.group(id).map(Group::rect) {
            self.graph.set_group_frame(id, frame, &config);
        }
        self.mark(Change::Debounced);
        true
    }

    pub fn duplicate_group(&mut self, id: &str) -> Option<String> {
        let copy = self.graph.duplicate_group(id)?;
        self.mark(Change::Immediate);
        Some(copy)
    }

    pub fn delete_group(&mut self, id: &str) -> bool {
        if !self.graph.delete_group(id) {
            return false;
        }
        self.selection.forget(&[id]);
        let graph = &self.graph;
        self.selection.retain(|n| graph.node(n).is_some(), |e| graph.edge(e).is_some());
        self.mark(Change::Immediate);
        true
    }

    pub fn add_to_group(&mut self, node_id: &str, group_id: &str) -> bool {
        self.immediate(|g, config| g.add_to_group(node_id, group_id, config))
    }

    pub fn remove_from_group(&mut self, node_id: &str) -> bool {
        self.immediate(|g, _| g.remove_from_group(node_id))
    }

    pub fn change_group(&mut self, node_id: &str, group_id: Option<&str>) -> bool {
        self.immediate(|g, config| g.change_group(node_id, group_id, config))
    }

    // ------------------------------------------------------------------
    // Node-type catalog
    // ------------------------------------------------------------------

    pub fn add_node_type(&mut self, node_type: NodeType) -> bool {
        self.debounced(|g| g.add_node_type(node_type))
    }

    pub fn update_node_type(&mut self, index: usize, node_type: NodeType) -> bool {
        self.debounced(|g| g.update_node_type(index, node_type))
    }

    pub fn remove_node_type(&mut self, index: usize) -> Option<NodeType> {
        let removed = self.graph.remove_node_type(index)?;
        self.mark(Change::Debounced);
        Some(removed)
    }

    // ------------------------------------------------------------------
    // View commands
    // ------------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in(&self.config);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out(&self.config);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset_zoom();
    }

    pub fn fit_to_screen(&mut self, metrics: &dyn ViewportMetrics) {
        self.viewport.fit_to_screen(self.graph.nodes.iter(), metrics, &self.config);
    }

    /// Select a node and center it at 100%.
    pub fn focus_node(&mut self, id: &str, metrics: &dyn ViewportMetrics) -> bool {
        let Some(position) = self.graph.node(id).map(|n| n.position()) else {
            return false;
        };
        self.selection.replace_nodes([id.to_string()]);
        self.viewport.focus_node(position, metrics);
        true
    }

    /// Select a group and center it at the current zoom.
    pub fn focus_group(&mut self, id: &str, metrics: &dyn ViewportMetrics) -> bool {
        let Some(frame) = self.graph.group(id).map(Group::rect) else {
            return false;
        };
        self.selection.select_group(id);
        self.viewport.focus_group(frame, metrics);
        true
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn node_views(&self) -> Vec<NodeView> {
        self.graph
            .nodes
            .iter()
            .map(|n| NodeView {
                id: n.id.clone(),
                label: n.label.clone(),
                node_type: n.node_type.clone(),
                rect: n.rect(),
                group_id: n.group_id.clone(),
                visual: catalog::resolve_visual(&self.graph.node_types, &n.node_type),
                selected: self.selection.contains_node(&n.id),
            })
            .collect()
    }

    /// Edges with a dangling endpoint are left out.
    pub fn edge_views(&self) -> Vec<EdgeView> {
        self.graph
            .routes(self.config.bezier_offset)
            .into_iter()
            .map(|r| EdgeView {
                id: r.edge.id.clone(),
                curve: r.curve,
                midpoint: r.curve.eval(0.5),
                label: r.edge.label.clone().unwrap_or_default(),
                arrow_type: r.edge.arrow_type.clone(),
                selected: self.selection.contains_edge(&r.edge.id),
            })
            .collect()
    }

    pub fn group_views(&self) -> Vec<GroupView> {
        let selected = self.selection.selected_group();
        self.graph
            .groups
            .iter()
            .map(|g| GroupView {
                id: g.id.clone(),
                name: g.name.clone(),
                kind: g.kind,
                rect: g.rect(),
                color: g.color.clone(),
                icon: g.display_icon().to_string(),
                icon_is_image: catalog::is_image_icon(g.display_icon(), g.icon_type),
                specs: g.specs.clone(),
                member_count: self.graph.member_count(&g.id),
                total_nodes: g.total_nodes(),
                selected: selected == Some(g.id.as_str()),
            })
            .collect()
    }

    /// The rubber band line while connecting.
    pub fn connection_preview(&self) -> Option<CubicBezier> {
        let Gesture::Connecting { source, anchor, end } = &self.gesture else {
            return None;
        };
        let start = self.graph.anchor_point(source, *anchor)?;
        Some(CubicBezier::from_anchors(start, *end, *anchor, Anchor::Center, self.config.bezier_offset))
    }

    /// The area selection rectangle, in world units.
    pub fn selection_rect(&self) -> Option<Rect> {
        self.gesture.selection_rect()
    }

    /// Background grid path for a canvas of the given size.
    pub fn grid_commands(&self, width: f32, height: f32, style: GridStyle) -> String {
        generate_grid_commands(width, height, &self.viewport, self.config.grid_size, style)
    }

    /// The single selected group's resize handles, for drawing.
    pub fn resize_handles(&self) -> Vec<(ResizeHandle, Point)> {
        let Some(frame) = self.selection.selected_group().and_then(|id| self.graph.group(id)).map(Group::rect)
        else {
            return Vec::new();
        };
        ResizeHandle::ALL.into_iter().map(|h| (h, h.position(frame))).collect()
    }

    /// Whether `endpoint` is the source of the connection being drawn.
    pub fn is_connect_source(&self, endpoint: &EndpointRef) -> bool {
        matches!(&self.gesture, Gesture::Connecting { source, .. } if source == endpoint)
    }
}
