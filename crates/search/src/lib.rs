//! Keyword retrieval over a schema graph.
//!
//! A query is split into keywords, every node whose id contains a keyword is
//! a direct match, and each match pulls in its one-hop neighbors. The
//! resulting node set is rendered into a [`metagraph_graph::StructuredContext`]
//! for the generation step.

mod generation;
mod keywords;
mod matcher;
mod retriever;

pub use generation::GenerationRequest;
pub use keywords::{is_stop_word, KeywordExtractor, STOP_WORDS};
pub use matcher::{retrieve, NeighborExpander, NodeMatcher};
pub use retriever::{Retrieval, SchemaRetriever};
