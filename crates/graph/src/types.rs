use crate::schema::column_id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position of a node inside a [`SchemaGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

/// Schema element a node stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaNode {
    Table { name: String },
    Column { name: String, table: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Table,
    Column,
}

/// Type of relationship between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Column -> its owning table
    #[serde(rename = "contains")]
    Contains,

    /// Referencing column -> referenced column
    #[serde(rename = "fk")]
    ForeignKey,

    /// Referenced column -> referencing column
    #[serde(rename = "fk_reverse")]
    ForeignKeyReverse,
}

/// Node in schema graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Table name, or `table.column`
    pub id: String,
    pub node: SchemaNode,
}

/// Directed edge in schema graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub kind: EdgeKind,
}

/// Directed graph of tables and columns.
///
/// Built once by [`crate::GraphBuilder`]; the public API is read-only.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    nodes: Vec<GraphNode>,

    /// Node id -> NodeIndex mapping for fast lookup
    index: HashMap<String, NodeIndex>,

    /// Per-node outgoing and incoming edges, indexed by NodeIndex
    outgoing: Vec<Vec<GraphEdge>>,
    incoming: Vec<Vec<GraphEdge>>,

    edge_count: usize,
}

impl SchemaNode {
    pub fn table(name: impl Into<String>) -> Self {
        SchemaNode::Table { name: name.into() }
    }

    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Self {
        SchemaNode::Column {
            name: name.into(),
            table: table.into(),
        }
    }

    pub fn id(&self) -> String {
        match self {
            SchemaNode::Table { name } => name.clone(),
            SchemaNode::Column { name, table } => column_id(table, name),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            SchemaNode::Table { .. } => NodeKind::Table,
            SchemaNode::Column { .. } => NodeKind::Column,
        }
    }

    /// Owning table for columns, `None` for tables
    pub fn owning_table(&self) -> Option<&str> {
        match self {
            SchemaNode::Table { .. } => None,
            SchemaNode::Column { table, .. } => Some(table),
        }
    }
}

impl SchemaGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add node to graph; an already known id keeps its original index
    pub(crate) fn add_node(&mut self, node: SchemaNode) -> NodeIndex {
        let id = node.id();
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }

        let idx = NodeIndex(self.nodes.len());
        self.index.insert(id.clone(), idx);
        self.nodes.push(GraphNode { id, node });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    /// Add edge between nodes. Returns false if the identical edge already exists.
    pub(crate) fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, kind: EdgeKind) -> bool {
        let edge = GraphEdge {
            source,
            target,
            kind,
        };
        if self.outgoing[source.0].contains(&edge) {
            return false;
        }

        self.outgoing[source.0].push(edge);
        self.incoming[target.0].push(edge);
        self.edge_count += 1;
        true
    }

    /// Find node by id
    pub fn find_node(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.nodes.get(idx.0)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// Get all edges, grouped by source node
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.outgoing.iter().flatten()
    }

    pub fn outgoing(&self, idx: NodeIndex) -> &[GraphEdge] {
        self.outgoing.get(idx.0).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn incoming(&self, idx: NodeIndex) -> &[GraphEdge] {
        self.incoming.get(idx.0).map(Vec::as_slice).unwrap_or_default()
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
