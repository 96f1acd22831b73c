//! # Metagraph Graph
//!
//! Relational schema as a knowledge graph: tables and columns as nodes,
//! containment and foreign keys as edges.
//!
//! ## Architecture
//!
//! ```text
//! SchemaModel (validated at the boundary)
//!     │
//!     ├──> Graph Builder
//!     │      ├─ Table nodes
//!     │      ├─ Column nodes + contains edges (column -> table)
//!     │      └─ fk / fk_reverse pairs (dangling references skipped)
//!     │
//!     ├──> Schema Graph (immutable adjacency lists)
//!     │      ├─ one-hop neighbor lookup
//!     │      └─ full node/link export for visualization
//!     │
//!     └──> Context Serializer
//!            ├─ describe tables/columns named by relevant node ids
//!            └─ append every relationship
//! ```

mod builder;
mod error;
mod export;
mod graph;
mod schema;
mod serializer;
mod types;

pub use builder::GraphBuilder;
pub use error::{Result, SchemaError};
pub use export::{ExportLink, ExportNode, GraphExport};
pub use schema::{column_id, ColumnInfo, ForeignKey, SchemaModel, TableInfo};
pub use serializer::{ColumnContext, ContextSerializer, StructuredContext, TableContext};
pub use types::{EdgeKind, GraphEdge, GraphNode, NodeIndex, NodeKind, SchemaGraph, SchemaNode};
