//! Node-type catalog.
//!
//! A [`NodeType`] is joined to nodes by its `value`. Dashboards carry their
//! own catalog; an empty one falls back to [`default_node_types`].

use serde::{Deserialize, Serialize};

/// Color used for nodes whose type is not in the catalog.
pub const FALLBACK_COLOR: &str = "#3b82f6";
/// Icon used for nodes whose type is not in the catalog.
pub const FALLBACK_ICON: &str = "⚙️";
/// Catalog entry new nodes use when no type is given.
pub const DEFAULT_NODE_TYPE: &str = "service";

const DEVICON: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon@latest/icons";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    #[default]
    Emoji,
    Url,
    Base64,
}

impl IconType {
    pub fn as_str(self) -> &'static str {
        match self {
            IconType::Emoji => "emoji",
            IconType::Url => "url",
            IconType::Base64 => "base64",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeType {
    pub value: String,
    pub label: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<IconType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NodeType {
    /// A catalog entry needs a join key, a label and an icon.
    pub fn is_complete(&self) -> bool {
        !self.value.is_empty() && !self.label.is_empty() && !self.icon.is_empty()
    }
}

/// Resolved look of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub label: String,
    pub color: String,
    pub icon: String,
    pub icon_type: IconType,
}

impl NodeVisual {
    pub fn is_image(&self) -> bool {
        is_image_icon(&self.icon, Some(self.icon_type))
    }
}

/// Look up the visual for `type_value`, falling back per field.
pub fn resolve_visual(types: &[NodeType], type_value: &str) -> NodeVisual {
    let entry = types.iter().find(|t| t.value == type_value);
    NodeVisual {
        label: entry.map(|t| t.label.clone()).unwrap_or_else(|| type_value.to_string()),
        color: entry
            .and_then(|t| t.color.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
        icon: entry
            .map(|t| t.icon.clone())
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| FALLBACK_ICON.to_string()),
        icon_type: entry.and_then(|t| t.icon_type).unwrap_or_default(),
    }
}

/// Label for a new node of `type_value`.
///
/// Unknown types borrow the label of the [`DEFAULT_NODE_TYPE`] entry; the raw
/// type string is used only when that entry is missing too.
pub fn default_label(types: &[NodeType], type_value: &str) -> String {
    types
        .iter()
        .find(|t| t.value == type_value)
        .or_else(|| types.iter().find(|t| t.value == DEFAULT_NODE_TYPE))
        .map(|t| t.label.clone())
        .unwrap_or_else(|| type_value.to_string())
}

/// Whether an icon should be drawn as an image rather than as text.
pub fn is_image_icon(icon: &str, icon_type: Option<IconType>) -> bool {
    if matches!(icon_type, Some(IconType::Url | IconType::Base64)) {
        return true;
    }
    icon.starts_with("http") || icon.starts_with("data:image")
}

fn devicon(value: &str, label: &str, slug: &str, color: &str) -> NodeType {
    NodeType {
        value: value.to_string(),
        label: label.to_string(),
        icon: format!("{DEVICON}/{slug}.svg"),
        icon_type: Some(IconType::Url),
        color: Some(color.to_string()),
    }
}

/// Built-in catalog of common infrastructure components.
pub fn default_node_types() -> Vec<NodeType> {
    vec![
        devicon("lb", "Load Balancer", "nginx/nginx-original", "#10b981"),
        devicon("gateway", "API Gateway", "kong/kong-original", "#8b5cf6"),
        devicon("service", "Service", "nodejs/nodejs-original", "#3b82f6"),
        devicon("db", "PostgreSQL", "postgresql/postgresql-original", "#336791"),
        devicon("cache", "Redis", "redis/redis-original", "#dc382d"),
        devicon(
            "storage",
            "AWS S3",
            "amazonwebservices/amazonwebservices-original-wordmark",
            "#ff9900",
        ),
        devicon("queue", "Kafka", "apachekafka/apachekafka-original", "#231f20"),
        devicon("docker", "Docker", "docker/docker-original", "#2496ed"),
        devicon("k8s", "Kubernetes", "kubernetes/kubernetes-original", "#326ce5"),
        devicon("mongodb", "MongoDB", "mongodb/mongodb-original", "#47a248"),
        devicon("mysql", "MySQL", "mysql/mysql-original", "#4479a1"),
        devicon(
            "elasticsearch",
            "Elasticsearch",
            "elasticsearch/elasticsearch-original",
            "#005571",
        ),
    ]
}
