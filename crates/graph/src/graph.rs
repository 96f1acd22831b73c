use crate::types::{EdgeKind, NodeIndex, SchemaGraph};
use std::collections::BTreeSet;

impl SchemaGraph {
    /// Nodes one edge away from `node`, in either direction and through any
    /// edge kind. Each neighbor is reported once.
    pub fn neighbors(&self, node: NodeIndex) -> BTreeSet<NodeIndex> {
        let outgoing = self.outgoing(node).iter().map(|e| e.target);
        let incoming = self.incoming(node).iter().map(|e| e.source);
        outgoing.chain(incoming).filter(|&n| n != node).collect()
    }

    /// Whether an edge `source -> target` of `kind` exists, by node id
    pub fn has_edge(&self, source: &str, target: &str, kind: EdgeKind) -> bool {
        match (self.find_node(source), self.find_node(target)) {
            (Some(s), Some(t)) => self
                .outgoing(s)
                .iter()
                .any(|e| e.target == t && e.kind == kind),
            _ => false,
        }
    }
}
