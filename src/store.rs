//! Dashboard documents and the store that keeps them.
//!
//! A dashboard wraps one graph as a camelCase JSON payload. The live
//! [`Graph`] never lists group members; [`DashboardPayload::from_graph`]
//! derives each group's `nodeIds` from `Node::group_id` when saving.

use crate::catalog::{self, NodeType};
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, Group, Node, DEFAULT_ARROW};
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// Name given to imported documents that carry none.
pub const IMPORTED_NAME: &str = "Imported Dashboard";

/// Current time as an RFC 3339 string with millisecond precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Payload
// ============================================================================

/// A group as persisted: the live fields plus the derived member list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGroup {
    #[serde(flatten)]
    pub group: Group,
    #[serde(default)]
    pub node_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardPayload {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub node_types: Vec<NodeType>,
    pub groups: Vec<StoredGroup>,
    pub vms: Vec<Value>,
    pub domains: Vec<Value>,
}

impl DashboardPayload {
    pub fn from_graph(graph: &Graph) -> Self {
        let groups = graph
            .groups
            .iter()
            .map(|g| StoredGroup {
                group: g.clone(),
                node_ids: graph.nodes_in_group(&g.id).map(|n| n.id.clone()).collect(),
            })
            .collect();
        Self {
            nodes: graph.nodes.clone(),
            edges: graph.edges.clone(),
            node_types: graph.node_types.clone(),
            groups,
            vms: graph.vms.clone(),
            domains: graph.domains.clone(),
        }
    }

    /// Build the live graph.
    ///
    /// An empty catalog keeps the built-in one, arrow type `none` (or
    /// nothing) becomes `standard`, and a legacy `nodeIds` entry only
    /// assigns nodes that have no group yet. Membership in a group that
    /// does not exist is dropped.
    pub fn into_graph(self) -> Graph {
        let mut nodes = self.nodes;
        let groups: Vec<Group> = self.groups.iter().map(|g| g.group.clone()).collect();

        for stored in &self.groups {
            for node in nodes.iter_mut().filter(|n| n.group_id.is_none()) {
                if stored.node_ids.contains(&node.id) {
                    node.group_id = Some(stored.group.id.clone());
                }
            }
        }
        for node in nodes.iter_mut() {
            let dangling = matches!(&node.group_id, Some(id) if !groups.iter().any(|g| &g.id == id));
            if dangling {
                tracing::debug!(node = %node.id, "membership in unknown group dropped");
                node.group_id = None;
            }
        }

        let mut edges = self.edges;
        for edge in edges.iter_mut() {
            if edge.arrow_type.is_empty() || edge.arrow_type == "none" {
                edge.arrow_type = DEFAULT_ARROW.to_string();
            }
        }

        let node_types = if self.node_types.is_empty() {
            catalog::default_node_types()
        } else {
            self.node_types
        };

        Graph {
            nodes,
            edges,
            groups,
            node_types,
            vms: self.vms,
            domains: self.domains,
        }
    }

    /// Read a payload from arbitrary JSON without failing.
    ///
    /// Each array defaults to empty when missing or not an array, and
    /// elements that do not parse are skipped.
    pub fn from_value(value: &Value) -> Self {
        Self {
            nodes: lenient_array(value, "nodes"),
            edges: lenient_array(value, "edges"),
            node_types: lenient_array(value, "nodeTypes"),
            groups: lenient_array(value, "groups"),
            vms: lenient_array(value, "vms"),
            domains: lenient_array(value, "domains"),
        }
    }
}

fn lenient_array<T: DeserializeOwned>(value: &Value, field: &str) -> Vec<T> {
    let Some(items) = value.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(field, index, error = %e, "skipping malformed element");
                None
            }
        })
        .collect()
}

// ============================================================================
// Dashboards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    pub data: DashboardPayload,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Dashboard {
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Parse an exported document. Never fails: anything unreadable degrades
/// to defaults.
pub fn import_document(text: &str) -> Dashboard {
    let raw: Value = serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(error = %e, "import is not valid JSON");
        Value::Null
    });
    let string = |field: &str| raw.get(field).and_then(Value::as_str).map(str::to_string);

    Dashboard {
        id: string("id").unwrap_or_default(),
        name: string("name").unwrap_or_else(|| IMPORTED_NAME.to_string()),
        data: raw.get("data").map(DashboardPayload::from_value).unwrap_or_default(),
        created_at: string("createdAt").unwrap_or_else(now_rfc3339),
        updated_at: string("updatedAt"),
    }
}

/// Pretty JSON for a download, stamped with the current time.
pub fn export_document(dashboard: &Dashboard) -> Result<String> {
    let stamped = Dashboard { updated_at: Some(now_rfc3339()), ..dashboard.clone() };
    Ok(serde_json::to_string_pretty(&stamped)?)
}

/// `<name>_<date>.json`, with everything but ASCII letters and digits in
/// the name replaced by `_`.
pub fn export_file_name(name: &str, date: NaiveDate) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{safe}_{}.json", date.format("%Y-%m-%d"))
}

// ============================================================================
// Store
// ============================================================================

/// Where dashboards live.
pub trait DashboardStore {
    /// Every dashboard, newest first.
    fn list(&self) -> Result<Vec<DashboardSummary>>;

    fn get(&self, id: &str) -> Result<Dashboard>;

    /// Create a dashboard; no payload means an empty one.
    fn create(&mut self, name: &str, payload: Option<DashboardPayload>) -> Result<Dashboard>;

    /// Replace the name and/or payload and stamp `updatedAt`.
    fn update(&mut self, id: &str, name: Option<&str>, payload: Option<DashboardPayload>) -> Result<Dashboard>;

    fn delete(&mut self, id: &str) -> Result<()>;

    /// Store a copy of `document` under a fresh id.
    fn import(&mut self, document: Dashboard) -> Result<Dashboard>;
}

/// In-process store.
///
/// [`set_available`](Self::set_available) simulates an outage: while off,
/// every call fails with [`Error::StoreUnavailable`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
    dashboards: Vec<Dashboard>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { dashboards: Vec::new(), available: true }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::StoreUnavailable { message: "memory store switched off".to_string() })
        }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Dashboard> {
        self.dashboards
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::DashboardNotFound { id: id.to_string() })
    }

    fn insert(&mut self, name: String, data: DashboardPayload) -> Dashboard {
        let now = now_rfc3339();
        let dashboard = Dashboard {
            id: format!("dash-{}", Uuid::new_v4()),
            name,
            data,
            created_at: now.clone(),
            updated_at: Some(now),
        };
        self.dashboards.push(dashboard.clone());
        dashboard
    }
}

impl DashboardStore for MemoryStore {
    fn list(&self) -> Result<Vec<DashboardSummary>> {
        self.check()?;
        // later inserts first so same-millisecond ties still list newest first
        let mut list: Vec<DashboardSummary> = self.dashboards.iter().rev().map(Dashboard::summary).collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    fn get(&self, id: &str) -> Result<Dashboard> {
        self.check()?;
        self.dashboards
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Error::DashboardNotFound { id: id.to_string() })
    }

    fn create(&mut self, name: &str, payload: Option<DashboardPayload>) -> Result<Dashboard> {
        self.check()?;
        Ok(self.insert(name.to_string(), payload.unwrap_or_default()))
    }

    fn update(&mut self, id: &str, name: Option<&str>, payload: Option<DashboardPayload>) -> Result<Dashboard> {
        self.check()?;
        let dashboard = self.find_mut(id)?;
        if let Some(name) = name {
            dashboard.name = name.to_string();
        }
        if let Some(payload) = payload {
            dashboard.data = payload;
        }
        dashboard.updated_at = Some(now_rfc3339());
        Ok(dashboard.clone())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.check()?;
        let before = self.dashboards.len();
        self.dashboards.retain(|d| d.id != id);
        if self.dashboards.len() == before {
            return Err(Error::DashboardNotFound { id: id.to_string() });
        }
        Ok(())
    }

    fn import(&mut self, document: Dashboard) -> Result<Dashboard> {
        self.check()?;
        let name = match document.name.trim() {
            "" => IMPORTED_NAME,
            _ => document.name.as_str(),
        };
        let name = format!("{name} (imported)");
        Ok(self.insert(name, document.data))
    }
}
