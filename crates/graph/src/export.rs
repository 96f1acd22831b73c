use crate::types::{EdgeKind, NodeKind, SchemaGraph};
use serde::{Deserialize, Serialize};

/// Whole-graph dump for visualization clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub links: Vec<ExportLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Owning table, columns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl SchemaGraph {
    pub fn export(&self) -> GraphExport {
        let nodes = self
            .nodes()
            .map(|(_, node)| ExportNode {
                id: node.id.clone(),
                kind: node.node.kind(),
                table: node.node.owning_table().map(str::to_string),
            })
            .collect();

        let links = self
            .edges()
            .filter_map(|edge| {
                let source = self.get_node(edge.source)?;
                let target = self.get_node(edge.target)?;
                Some(ExportLink {
                    source: source.id.clone(),
                    target: target.id.clone(),
                    kind: edge.kind,
                })
            })
            .collect();

        GraphExport { nodes, links }
    }
}
