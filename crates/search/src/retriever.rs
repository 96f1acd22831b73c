use crate::keywords::KeywordExtractor;
use crate::matcher::{ids, NeighborExpander, NodeMatcher};
use metagraph_graph::{
    ContextSerializer, GraphBuilder, GraphExport, Result, SchemaGraph, SchemaModel, StructuredContext,
};
use serde::Serialize;
use std::collections::BTreeSet;

/// Schema retrieval service.
///
/// Owns the schema and the graph built from it. Construct it once at startup
/// and share it by reference; `retrieve` only reads, so concurrent callers need
/// no synchronization.
#[derive(Debug, Clone)]
pub struct SchemaRetriever {
    schema: SchemaModel,
    graph: SchemaGraph,
    extractor: KeywordExtractor,
    matcher: NodeMatcher,
    expander: NeighborExpander,
    serializer: ContextSerializer,
}

/// Everything one query produced, from keywords to rendered context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Retrieval {
    pub query: String,
    pub keywords: Vec<String>,
    /// Nodes whose id contained a keyword
    pub matches: BTreeSet<String>,
    /// Matches plus their one-hop neighbors
    #[serde(rename = "relevant_nodes")]
    pub relevant: BTreeSet<String>,
    pub context: StructuredContext,
}

impl SchemaRetriever {
    pub fn new(schema: SchemaModel) -> Result<Self> {
        let graph = GraphBuilder::new().build(&schema)?;
        Ok(Self {
            schema,
            graph,
            extractor: KeywordExtractor::new(),
            matcher: NodeMatcher::new(),
            expander: NeighborExpander::new(),
            serializer: ContextSerializer::new(),
        })
    }

    pub fn schema(&self) -> &SchemaModel {
        &self.schema
    }

    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    pub fn retrieve(&self, query: &str) -> Retrieval {
        let keywords = self.extractor.extract(query);
        log::debug!("Extracted keywords: {keywords:?}");

        let matched = self.matcher.find_matches(&self.graph, &keywords);
        let relevant = self.expander.expand(&self.graph, &matched);
        log::debug!(
            "Matched {} nodes, {} relevant after expansion",
            matched.len(),
            relevant.len()
        );

        let relevant = ids(&self.graph, &relevant);
        let context = self.serializer.serialize(&self.schema, &relevant);

        Retrieval {
            query: query.to_string(),
            keywords,
            matches: ids(&self.graph, &matched),
            relevant,
            context,
        }
    }

    /// Relevant-node context for an already known node set
    pub fn context_for(&self, relevant: &BTreeSet<String>) -> StructuredContext {
        self.serializer.serialize(&self.schema, relevant)
    }

    /// Full graph for visualization
    pub fn export(&self) -> GraphExport {
        self.graph.export()
    }
}
