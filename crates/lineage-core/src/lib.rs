use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod category;
pub mod direction;
pub mod error;
pub mod geometry;

pub use category::Category;
pub use direction::{HandlePosition, LayoutDirection, LayoutStrategy};
pub use error::LineageError;
pub use geometry::{Rect, Size, Vec2};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Key under which a node's `data` map carries its own expand flag.
pub const DATA_EXPANDED: &str = "expanded";
/// Key under which the descendant count is published on output nodes.
pub const DATA_DESCENDANT_COUNT: &str = "descendantCount";

/// A node of the lineage graph as the rendering layer sees it.
///
/// Fields the engine does not understand are kept in `extra` so a node can be
/// read, positioned and written back without losing rendering hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageNode {
    pub id: NodeId,
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
    /// Size reported by the renderer after the node was last drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_position: Option<HandlePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<HandlePosition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineageNode {
    pub fn new(id: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            data: Map::new(),
            position: None,
            measured: None,
            width: None,
            height: None,
            source_position: None,
            target_position: None,
            extra: Map::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn category(&self) -> Category {
        Category::classify(&self.kind)
    }

    /// Display label used for ordering siblings: `data.label`, then `data.title`.
    pub fn label(&self) -> &str {
        self.data
            .get("label")
            .and_then(Value::as_str)
            .or_else(|| self.data.get("title").and_then(Value::as_str))
            .unwrap_or("")
    }

    /// Expand flag stored on the node itself, if any.
    pub fn data_expanded(&self) -> Option<bool> {
        self.data.get(DATA_EXPANDED).and_then(Value::as_bool)
    }
}

/// Directed parent → child relation ("parent reveals child").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineageEdge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: Map::new(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
