use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Structural problems with a schema description. Any of these makes the
/// schema unusable: no graph is built and no retrieval can be served.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema has no `tables` entry")]
    MissingTables,

    #[error("Schema `tables` must be a mapping of table name to table info, got {0}")]
    MalformedTables(String),

    #[error("Malformed schema: {0}")]
    Malformed(String),

    #[error("Table name must not be empty")]
    EmptyTableName,

    #[error("Column name must not be empty (table `{table}`)")]
    EmptyColumnName { table: String },

    #[error("Node id `{0}` is produced by more than one table or column")]
    DuplicateNodeId(String),

    #[error("Schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read schema: {0}")]
    Io(#[from] std::io::Error),
}
