//! # Topology Editor
//!
//! A headless editor core for infrastructure topology diagrams: typed nodes,
//! bezier-routed edges between side anchors, and resizable groups that
//! contain their member nodes, all on a pannable, zoomable canvas.
//!
//! ## Features
//!
//! - **World coordinates** - Geometry lives in world units; the [`Viewport`]
//!   maps to and from screen pixels
//! - **Gesture state machine** - [`Editor`] turns pointer, wheel and key
//!   input into drags, resizes, connections and area selection
//! - **Containment** - Grouped nodes are clamped inside their group frame
//! - **Debounced autosave** - [`Workspace`] writes to any [`DashboardStore`]
//! - **Slint bindings** - [`EditorController`] keeps `VecModel`s in sync
//!
//! ## Quick Start
//!
//! ```
//! use topology_editor::{EditorConfig, MemoryStore, Point, Workspace};
//!
//! let mut workspace = Workspace::new(MemoryStore::new(), EditorConfig::default());
//! workspace.initialize(None).unwrap();
//!
//! let editor = workspace.editor_mut();
//! let db = editor.add_node_at("db", Point::new(0.0, 0.0));
//! let api = editor.add_node_at("api", Point::new(300.0, 0.0));
//! assert_ne!(db, api);
//!
//! workspace.tick(std::time::Instant::now());
//! ```
//!
//! ## Modules
//!
//! - [`graph`] - Nodes, edges, groups and the node-type catalog
//! - [`editor`] - Input handling and editing commands
//! - [`store`] - Dashboard documents, import and export
//! - [`workspace`] - The open dashboard and autosave
//! - [`controller`] - Slint callbacks and model sync

pub mod autosave;
pub mod catalog;
pub mod config;
pub mod containment;
pub mod controller;
pub mod editor;
pub mod error;
pub mod graph;
pub mod grid;
pub mod interaction;
pub mod path;
pub mod selection;
pub mod store;
pub mod viewport;
pub mod workspace;

pub use autosave::{Change, SaveScheduler};
pub use catalog::{default_label, default_node_types, resolve_visual, IconType, NodeType, NodeVisual};
pub use config::EditorConfig;
pub use containment::ResizeHandle;
pub use controller::{parse_hex_color, EdgeItem, EditorController, GroupItem, NodeItem};
pub use editor::{EdgeView, Editor, GroupView, NodeView};
pub use error::{Error, Result};
pub use graph::{Edge, EndpointRef, Graph, Group, GroupKind, GroupSpecs, Node, NodeRole, ValidationError};
pub use grid::{generate_grid_commands, GridStyle};
pub use hit_test::{NodeGeometry, Rect};
pub use interaction::{ContextMenu, EditorKey, Gesture, HitTarget, Modifiers, PointerButton, PointerEvent};
pub use path::{Anchor, CubicBezier, Point};
pub use selection::SelectionManager;
pub use store::{Dashboard, DashboardPayload, DashboardStore, DashboardSummary, MemoryStore};
pub use viewport::{FixedMetrics, Viewport, ViewportMetrics};
pub use workspace::{ExportedFile, SaveStatus, Workspace, DEFAULT_DASHBOARD_NAME};
