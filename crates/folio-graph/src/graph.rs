//! The serialized shape of a relationship graph.

use serde::{Deserialize, Serialize};

/// A node of the graph. Field names follow the force-graph JSON the page
/// script consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// 1-based id, referenced by links.
    pub id: usize,
    /// Display diameter.
    #[serde(rename = "val")]
    pub diameter: f64,
    /// Qualified path of the object.
    pub label: String,
    /// Top-level package segment, used for colouring.
    #[serde(rename = "mod")]
    pub module: String,
    /// Page URL of the newest known version, if any.
    pub url: Option<String>,
}

/// A directed link between two node ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
    /// Position of the edge among all edges collected before pruning.
    pub id: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl VisualizationGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node carrying `label`, if present.
    pub fn node(&self, label: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
