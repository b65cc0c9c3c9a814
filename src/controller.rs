//! Slint bridge for the topology editor.
//!
//! The [`EditorController`] owns the [`Editor`] behind `Rc<RefCell<_>>`,
//! hands out callbacks for the canvas, and keeps bound `VecModel`s in sync
//! with the graph in screen coordinates.
//!
//! # Example
//!
//! ```ignore
//! use topology_editor::{EditorConfig, EditorController};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::new(EditorConfig::default());
//!
//!     let nodes = std::rc::Rc::new(slint::VecModel::default());
//!     ctrl.bind_node_model(nodes.clone(), |n| NodeData {
//!         id: n.id.clone(),
//!         label: n.label.clone(),
//!         x: n.x,
//!         y: n.y,
//!         color: n.color,
//!         selected: n.selected,
//!         ..Default::default()
//!     });
//!     window.set_nodes(nodes.into());
//!
//!     window.on_pointer_pressed(ctrl.pointer_pressed_callback());
//!     window.on_pointer_moved(ctrl.pointer_moved_callback());
//!     window.on_pointer_released(ctrl.pointer_released_callback());
//!     window.on_scrolled(ctrl.scroll_callback());
//!     window.on_key_pressed(ctrl.key_pressed_callback());
//!
//!     window.on_canvas_resized({
//!         let ctrl = ctrl.clone();
//!         move |w, h| ctrl.set_canvas_size(w, h)
//!     });
//!
//!     ctrl.refresh();
//!     window.run().unwrap();
//! }
//! ```

use crate::catalog::FALLBACK_COLOR;
use crate::config::EditorConfig;
use crate::editor::{EdgeView, Editor, GroupView, NodeView};
use crate::grid::GridStyle;
use crate::interaction::{EditorKey, Modifiers, PointerButton, PointerEvent};
use crate::path::Point;
use crate::viewport::{FixedMetrics, Viewport};
use slint::{Color, Model, ModelRc, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

// ============================================================================
// Screen-space items
// ============================================================================

/// A node as the canvas draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeItem {
    pub id: SharedString,
    pub label: SharedString,
    pub node_type: SharedString,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub icon: SharedString,
    pub icon_is_image: bool,
    pub selected: bool,
}

/// An edge as the canvas draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeItem {
    pub id: SharedString,
    pub path: SharedString,
    pub label: SharedString,
    pub label_x: f32,
    pub label_y: f32,
    pub arrow_type: SharedString,
    pub selected: bool,
}

/// A group frame as the canvas draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupItem {
    pub id: SharedString,
    pub name: SharedString,
    pub kind: SharedString,
    pub icon: SharedString,
    pub icon_is_image: bool,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub member_count: i32,
    pub total_nodes: i32,
    pub selected: bool,
}

impl NodeItem {
    fn from_view(view: &NodeView, viewport: &Viewport) -> Self {
        let rect = viewport.rect_to_screen(view.rect);
        Self {
            id: view.id.as_str().into(),
            label: view.label.as_str().into(),
            node_type: view.node_type.as_str().into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color: color_or_fallback(&view.visual.color),
            icon: view.visual.icon.as_str().into(),
            icon_is_image: view.visual.is_image(),
            selected: view.selected,
        }
    }
}

impl EdgeItem {
    fn from_view(view: &EdgeView, viewport: &Viewport) -> Self {
        let label_at = viewport.world_to_screen(view.midpoint);
        Self {
            id: view.id.as_str().into(),
            path: viewport.curve_to_screen(&view.curve).to_svg().into(),
            label: view.label.as_str().into(),
            label_x: label_at.x,
            label_y: label_at.y,
            arrow_type: view.arrow_type.as_str().into(),
            selected: view.selected,
        }
    }
}

impl GroupItem {
    fn from_view(view: &GroupView, viewport: &Viewport) -> Self {
        let rect = viewport.rect_to_screen(view.rect);
        Self {
            id: view.id.as_str().into(),
            name: view.name.as_str().into(),
            kind: view.kind.label().into(),
            icon: view.icon.as_str().into(),
            icon_is_image: view.icon_is_image,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color: color_or_fallback(&view.color),
            member_count: view.member_count as i32,
            total_nodes: view.total_nodes as i32,
            selected: view.selected,
        }
    }
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = digits.next()??;
            let g = digits.next()??;
            let b = digits.next()??;
            Some(Color::from_rgb_u8(r, g, b))
        }
        6 => Some(Color::from_rgb_u8(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

fn color_or_fallback(text: &str) -> Color {
    parse_hex_color(text)
        .or_else(|| parse_hex_color(FALLBACK_COLOR))
        .unwrap_or_default()
}

// ============================================================================
// Model syncing
// ============================================================================

trait ModelSyncer<T> {
    fn sync(&self, items: &[T]);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<T, P, F> ModelSyncer<T> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&T) -> P,
{
    fn sync(&self, items: &[T]) {
        // Update existing rows or add new ones
        for (i, item) in items.iter().enumerate() {
            let row = (self.constructor)(item);
            if i < self.model.row_count() {
                self.model.set_row_data(i, row);
            } else {
                self.model.push(row);
            }
        }
        // Remove excess rows
        while self.model.row_count() > items.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

type Syncer<T> = Rc<RefCell<Option<Box<dyn ModelSyncer<T>>>>>;

// ============================================================================
// Controller
// ============================================================================

/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct EditorController {
    editor: Rc<RefCell<Editor>>,
    metrics: Rc<RefCell<FixedMetrics>>,
    nodes: Syncer<NodeItem>,
    edges: Syncer<EdgeItem>,
    groups: Syncer<GroupItem>,
    selected_nodes: Rc<VecModel<SharedString>>,
    selected_edges: Rc<VecModel<SharedString>>,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorController {
    pub fn new(config: EditorConfig) -> Self {
        Self::from_editor(Editor::new(config))
    }

    pub fn from_editor(editor: Editor) -> Self {
        Self {
            editor: Rc::new(RefCell::new(editor)),
            metrics: Rc::new(RefCell::new(FixedMetrics::new(800.0, 600.0))),
            nodes: Rc::new(RefCell::new(None)),
            edges: Rc::new(RefCell::new(None)),
            groups: Rc::new(RefCell::new(None)),
            selected_nodes: Rc::new(VecModel::default()),
            selected_edges: Rc::new(VecModel::default()),
        }
    }

    /// Shared handle to the editor, e.g. for a [`Workspace`](crate::Workspace)
    /// host that swaps graphs.
    pub fn editor(&self) -> Rc<RefCell<Editor>> {
        self.editor.clone()
    }

    /// Set the bezier curve offset for edge paths (default: 80.0).
    pub fn set_bezier_offset(&self, offset: f32) {
        self.editor.borrow_mut().set_bezier_offset(offset);
        self.refresh();
    }

    /// Set the grid spacing (default: 20.0).
    pub fn set_grid_spacing(&self, spacing: f32) {
        self.editor.borrow_mut().set_grid_spacing(spacing);
    }

    /// Report the canvas size in logical pixels.
    pub fn set_canvas_size(&self, width: f32, height: f32) {
        let mut metrics = self.metrics.borrow_mut();
        metrics.width = width;
        metrics.height = height;
    }

    pub fn metrics(&self) -> FixedMetrics {
        *self.metrics.borrow()
    }

    pub fn zoom_percent(&self) -> i32 {
        self.editor.borrow().viewport().zoom_percent()
    }

    // === Model binding ===

    /// Keep `model` in sync with the nodes, building rows with `constructor`.
    pub fn bind_node_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&NodeItem) -> P + 'static,
    {
        *self.nodes.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    pub fn bind_edge_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&EdgeItem) -> P + 'static,
    {
        *self.edges.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    pub fn bind_group_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&GroupItem) -> P + 'static,
    {
        *self.groups.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    pub fn selected_nodes_model(&self) -> ModelRc<SharedString> {
        ModelRc::from(self.selected_nodes.clone())
    }

    pub fn selected_edges_model(&self) -> ModelRc<SharedString> {
        ModelRc::from(self.selected_edges.clone())
    }

    /// Push the current graph and selection into every bound model.
    pub fn refresh(&self) {
        let editor = self.editor.borrow();
        let viewport = *editor.viewport();

        if let Some(syncer) = self.nodes.borrow().as_ref() {
            let items: Vec<NodeItem> = editor.node_views().iter().map(|v| NodeItem::from_view(v, &viewport)).collect();
            syncer.sync(&items);
        }
        if let Some(syncer) = self.edges.borrow().as_ref() {
            let items: Vec<EdgeItem> = editor.edge_views().iter().map(|v| EdgeItem::from_view(v, &viewport)).collect();
            syncer.sync(&items);
        }
        if let Some(syncer) = self.groups.borrow().as_ref() {
            let items: Vec<GroupItem> =
                editor.group_views().iter().map(|v| GroupItem::from_view(v, &viewport)).collect();
            syncer.sync(&items);
        }
        editor.selection().sync_to_model(&self.selected_nodes);
        editor.selection().sync_edges_to_model(&self.selected_edges);
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-pressed(x, y, button, shift, ctrl)`.
    ///
    /// `button` uses DOM numbering: 0 primary, 1 middle, 2 secondary.
    pub fn pointer_pressed_callback(&self) -> impl Fn(f32, f32, i32, bool, bool) {
        let ctrl = self.clone();
        move |x, y, button, shift, toggle| {
            ctrl.editor.borrow_mut().pointer_down(pointer_event(x, y, button, shift, toggle));
            ctrl.refresh();
        }
    }

    /// Returns a callback for `pointer-moved(x, y)`.
    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            let idle = {
                let mut editor = ctrl.editor.borrow_mut();
                editor.pointer_move(PointerEvent::left(x, y));
                editor.gesture().is_idle()
            };
            if !idle {
                ctrl.refresh();
            }
        }
    }

    /// Returns a callback for `pointer-released(x, y, button, shift, ctrl)`.
    pub fn pointer_released_callback(&self) -> impl Fn(f32, f32, i32, bool, bool) {
        let ctrl = self.clone();
        move |x, y, button, shift, toggle| {
            ctrl.editor.borrow_mut().pointer_up(pointer_event(x, y, button, shift, toggle));
            ctrl.refresh();
        }
    }

    /// Returns a callback for `scrolled(x, y, delta-y)`.
    pub fn scroll_callback(&self) -> impl Fn(f32, f32, f32) {
        let ctrl = self.clone();
        move |x, y, delta_y| {
            ctrl.editor.borrow_mut().wheel(Point::new(x, y), delta_y);
            ctrl.refresh();
        }
    }

    /// Returns a callback for `key-pressed(key, text-input-focused) -> bool`.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString, bool) -> bool {
        let ctrl = self.clone();
        move |key, text_input_focused| {
            let handled = ctrl
                .editor
                .borrow_mut()
                .key_down(EditorKey::from_name(key.as_str()), text_input_focused);
            if handled {
                ctrl.refresh();
            }
            handled
        }
    }

    /// Returns a callback for `add-node(type)` from the context menu.
    pub fn add_node_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |node_type| {
            ctrl.editor.borrow_mut().add_node_from_menu(node_type.as_str());
            ctrl.refresh();
        }
    }

    /// Returns a callback for `fit-to-screen()`.
    pub fn fit_to_screen_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            let metrics = ctrl.metrics();
            ctrl.editor.borrow_mut().fit_to_screen(&metrics);
            ctrl.refresh();
        }
    }

    /// Returns a callback for the zoom buttons: positive steps in, negative
    /// steps out, zero resets.
    pub fn zoom_callback(&self) -> impl Fn(i32) {
        let ctrl = self.clone();
        move |direction| {
            {
                let mut editor = ctrl.editor.borrow_mut();
                match direction.signum() {
                    1 => editor.zoom_in(),
                    -1 => editor.zoom_out(),
                    _ => editor.reset_zoom(),
                }
            }
            ctrl.refresh();
        }
    }

    // === Render helpers ===

    /// Background grid for the current viewport.
    pub fn generate_grid(&self, style: GridStyle) -> SharedString {
        let metrics = self.metrics();
        self.editor.borrow().grid_commands(metrics.width, metrics.height, style).into()
    }

    /// Screen-space path of the connection being drawn; empty when idle.
    pub fn connection_preview_path(&self) -> SharedString {
        let editor = self.editor.borrow();
        editor
            .connection_preview()
            .map(|curve| editor.viewport().curve_to_screen(&curve).to_svg())
            .unwrap_or_default()
            .into()
    }

    /// Screen-space area selection as `(x, y, width, height)`.
    pub fn selection_box(&self) -> Option<(f32, f32, f32, f32)> {
        let editor = self.editor.borrow();
        let rect = editor.viewport().rect_to_screen(editor.selection_rect()?);
        Some((rect.x, rect.y, rect.width, rect.height))
    }

    /// Where to draw the context menu, if open.
    pub fn context_menu_position(&self) -> Option<(f32, f32)> {
        self.editor.borrow().context_menu().map(|m| (m.screen.x, m.screen.y))
    }
}

fn pointer_event(x: f32, y: f32, button: i32, shift: bool, toggle: bool) -> PointerEvent {
    PointerEvent {
        position: Point::new(x, y),
        button: PointerButton::from_code(button),
        modifiers: Modifiers { shift, ctrl: toggle, meta: false },
    }
}
