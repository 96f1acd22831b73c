use crate::error::Result;
use crate::schema::SchemaModel;
use crate::types::*;

/// Build schema graph from a schema description
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build graph from schema.
    ///
    /// Foreign keys whose endpoints are not both known columns are skipped
    /// without error.
    pub fn build(&self, schema: &SchemaModel) -> Result<SchemaGraph> {
        schema.validate()?;

        let mut graph = SchemaGraph::new();

        // Phase 1: tables, their columns and containment edges
        for (table_name, table) in &schema.tables {
            let table_idx = graph.add_node(SchemaNode::table(table_name));
            for column_name in table.columns.keys() {
                let column_idx = graph.add_node(SchemaNode::column(table_name, column_name));
                graph.add_edge(column_idx, table_idx, EdgeKind::Contains);
            }
        }

        // Phase 2: foreign keys, always as a forward/reverse pair
        let mut skipped = 0usize;
        for fk in &schema.relationships {
            let from = graph.find_node(&fk.source_id());
            let to = graph.find_node(&fk.target_id());
            match (from, to) {
                (Some(from), Some(to)) => {
                    graph.add_edge(from, to, EdgeKind::ForeignKey);
                    graph.add_edge(to, from, EdgeKind::ForeignKeyReverse);
                }
                _ => {
                    log::debug!("Skipping relationship with unknown endpoint: {fk}");
                    skipped += 1;
                }
            }
        }

        log::info!(
            "Built schema graph: {} nodes, {} edges ({} relationships skipped)",
            graph.node_count(),
            graph.edge_count(),
            skipped
        );

        Ok(graph)
    }
}
