//! Pointer and keyboard input, and the gesture the pointer is performing.
//!
//! [`Gesture`] is one value, so two gestures can never be active together.
//! The [`Editor`](crate::Editor) owns it and drives the transitions.

use crate::containment::ResizeHandle;
use crate::graph::EndpointRef;
use crate::hit_test::Rect;
use crate::path::{Anchor, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl PointerButton {
    /// Map a DOM-style button number: 1 is middle, 2 is right, anything
    /// else is treated as the primary button.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => PointerButton::Middle,
            2 => PointerButton::Right,
            _ => PointerButton::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, cmd on macOS.
    pub fn toggle(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer press, move or release in canvas-relative screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn left(x: f32, y: f32) -> Self {
        Self { position: Point::new(x, y), ..Self::default() }
    }

    pub fn middle(x: f32, y: f32) -> Self {
        Self { button: PointerButton::Middle, ..Self::left(x, y) }
    }

    pub fn right(x: f32, y: f32) -> Self {
        Self { button: PointerButton::Right, ..Self::left(x, y) }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }
}

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Anchor { endpoint: EndpointRef, anchor: Anchor },
    ResizeHandle { group_id: String, handle: ResizeHandle },
    Node(String),
    Edge(String),
    Group(String),
    Canvas,
}

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        /// Pointer minus pan offset at press time.
        anchor: Point,
    },
    DraggingNodes {
        /// Pointer-to-origin offset of every dragged node, in world units.
        offsets: Vec<(String, Point)>,
    },
    DraggingGroup {
        group_id: String,
        offset: Point,
    },
    ResizingGroup {
        group_id: String,
        handle: ResizeHandle,
        start: Rect,
        /// World pointer position at press time.
        pointer: Point,
    },
    SelectingArea {
        start: Point,
        current: Point,
        additive: bool,
    },
    Connecting {
        source: EndpointRef,
        anchor: Anchor,
        /// Loose end of the preview line, in world units.
        end: Point,
    },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Panning { .. } => "panning",
            Gesture::DraggingNodes { .. } => "dragging-nodes",
            Gesture::DraggingGroup { .. } => "dragging-group",
            Gesture::ResizingGroup { .. } => "resizing-group",
            Gesture::SelectingArea { .. } => "selecting-area",
            Gesture::Connecting { .. } => "connecting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The rubber band rectangle while area-selecting.
    pub fn selection_rect(&self) -> Option<Rect> {
        match self {
            Gesture::SelectingArea { start, current, .. } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Backspace,
    Escape,
    Other,
}

impl EditorKey {
    /// Map a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => EditorKey::Delete,
            "Backspace" => EditorKey::Backspace,
            "Escape" => EditorKey::Escape,
            _ => EditorKey::Other,
        }
    }
}

/// The right-click "add node" menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    /// Where to draw the menu, in screen pixels.
    pub screen: Point,
    /// Where a node added from the menu goes, in world units.
    pub world: Point,
}
