use crate::error::{Result, SchemaError};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// Relational schema as delivered by an introspection step.
///
/// Tables and columns are kept in name order, so every traversal of a schema
/// (graph construction, context rendering) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaModel {
    /// Table name -> table info
    pub tables: BTreeMap<String, TableInfo>,

    /// Foreign keys in declaration order
    #[serde(default)]
    pub relationships: Vec<ForeignKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Column name -> column info. A plain list of column names is accepted too.
    #[serde(deserialize_with = "deserialize_columns")]
    #[schemars(with = "BTreeMap<String, ColumnInfo>")]
    pub columns: BTreeMap<String, ColumnInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnInfo {
    /// Declared SQL type; empty when the introspection did not report one
    #[serde(rename = "type", default)]
    pub data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `from_table.from_col` references `to_table.to_col`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    pub from_table: String,
    pub from_col: String,
    pub to_table: String,
    pub to_col: String,
}

/// Node identifier of a column: `"<table>.<column>"`.
pub fn column_id(table: &str, column: &str) -> String {
    format!("{table}.{column}")
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and validate a schema from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value.get("tables") {
            None | Some(Value::Null) => return Err(SchemaError::MissingTables),
            Some(Value::Object(_)) => {}
            Some(other) => return Err(SchemaError::MalformedTables(json_kind(other).to_string())),
        }

        let schema: SchemaModel =
            serde_json::from_value(value).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check the naming rules the graph relies on for unique node ids.
    ///
    /// Dotted table names such as `main.Orders` are fine as long as no two
    /// elements end up with the same id (table `A.b` next to column `A.b`).
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (table_name, table) in &self.tables {
            if table_name.is_empty() {
                return Err(SchemaError::EmptyTableName);
            }
            if table.columns.keys().any(|c| c.is_empty()) {
                return Err(SchemaError::EmptyColumnName {
                    table: table_name.clone(),
                });
            }
            if !seen.insert(table_name.clone()) {
                return Err(SchemaError::DuplicateNodeId(table_name.clone()));
            }
            for column_name in table.columns.keys() {
                let id = column_id(table_name, column_name);
                if !seen.insert(id.clone()) {
                    return Err(SchemaError::DuplicateNodeId(id));
                }
            }
        }
        Ok(())
    }

    /// Add (or replace) a table
    pub fn with_table(mut self, name: impl Into<String>, table: TableInfo) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// Append a foreign key
    pub fn with_relationship(mut self, fk: ForeignKey) -> Self {
        self.relationships.push(fk);
        self
    }

    /// Drop every table for which `keep` returns false, together with the
    /// relationships that touch it. Returns the number of tables removed.
    pub fn retain_tables<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.tables.len();
        self.tables.retain(|name, _| keep(name));
        let tables = &self.tables;
        self.relationships
            .retain(|fk| tables.contains_key(&fk.from_table) && tables.contains_key(&fk.to_table));
        before - self.tables.len()
    }

    /// Total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.tables.values().map(|t| t.columns.len()).sum()
    }

    /// JSON Schema of the input format accepted by [`SchemaModel::from_value`]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(SchemaModel)
    }
}

impl TableInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.insert(name.into(), ColumnInfo::new(data_type));
        self
    }

    pub fn described_column(
        mut self,
        name: impl Into<String>,
        data_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.columns
            .insert(name.into(), ColumnInfo::new(data_type).description(description));
        self
    }
}

impl ColumnInfo {
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl ForeignKey {
    pub fn new(
        from_table: impl Into<String>,
        from_col: impl Into<String>,
        to_table: impl Into<String>,
        to_col: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_col: from_col.into(),
            to_table: to_table.into(),
            to_col: to_col.into(),
        }
    }

    /// Id of the referencing column node
    pub fn source_id(&self) -> String {
        column_id(&self.from_table, &self.from_col)
    }

    /// Id of the referenced column node
    pub fn target_id(&self) -> String {
        column_id(&self.to_table, &self.to_col)
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} connects to {}.{}",
            self.from_table, self.from_col, self.to_table, self.to_col
        )
    }
}

fn deserialize_columns<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, ColumnInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawColumns {
        Described(BTreeMap<String, ColumnInfo>),
        Names(Vec<String>),
    }

    Ok(match RawColumns::deserialize(deserializer)? {
        RawColumns::Described(columns) => columns,
        RawColumns::Names(names) => names
            .into_iter()
            .map(|name| (name, ColumnInfo::default()))
            .collect(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_full_shape() {
        let schema = SchemaModel::from_value(json!({
            "tables": {
                "Orders": {
                    "description": "Customer orders",
                    "columns": {
                        "OrderID": {"type": "INTEGER", "description": "Primary key"},
                        "CustomerID": {"type": "TEXT"}
                    }
                }
            },
            "relationships": [
                {"from_table": "Orders", "from_col": "CustomerID", "to_table": "Customers", "to_col": "CustomerID"}
            ]
        }))
        .unwrap();

        let orders = &schema.tables["Orders"];
        assert_eq!(orders.description.as_deref(), Some("Customer orders"));
        assert_eq!(orders.columns["OrderID"].data_type, "INTEGER");
        assert_eq!(orders.columns["OrderID"].description.as_deref(), Some("Primary key"));
        assert_eq!(orders.columns["CustomerID"].description, None);
        assert_eq!(
            schema.relationships,
            vec![ForeignKey::new("Orders", "CustomerID", "Customers", "CustomerID")]
        );
    }

    #[test]
    fn test_column_name_list_is_accepted() {
        let schema = SchemaModel::from_json_str(
            r#"{"tables": {"Shippers": {"columns": ["ShipperID", "CompanyName"]}}}"#,
        )
        .unwrap();

        let columns: Vec<_> = schema.tables["Shippers"].columns.keys().cloned().collect();
        assert_eq!(columns, vec!["CompanyName", "ShipperID"]);
        assert_eq!(schema.tables["Shippers"].columns["ShipperID"], ColumnInfo::default());
        assert!(schema.relationships.is_empty());
    }

    #[test]
    fn test_missing_tables_is_rejected() {
        let err = SchemaModel::from_value(json!({"relationships": []})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingTables));

        let err = SchemaModel::from_value(json!({"tables": null})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingTables));
    }

    #[test]
    fn test_non_mapping_tables_is_rejected() {
        let err = SchemaModel::from_value(json!({"tables": ["Orders"]})).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedTables(ref kind) if kind == "an array"));
    }

    #[test]
    fn test_malformed_table_info_is_rejected() {
        let err = SchemaModel::from_value(json!({"tables": {"Orders": {"columns": 3}}})).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));

        let err = SchemaModel::from_value(json!({"tables": {"Orders": {}}})).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_not_json_is_rejected() {
        let err = SchemaModel::from_json_str("tables: {}").unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn test_naming_rules() {
        let empty_table = SchemaModel::new().with_table("", TableInfo::new().column("id", "INTEGER"));
        assert!(matches!(empty_table.validate(), Err(SchemaError::EmptyTableName)));

        let dotted = SchemaModel::new().with_table("main.Orders", TableInfo::new().column("OrderID", "INTEGER"));
        assert!(dotted.validate().is_ok());

        let empty_column = SchemaModel::new().with_table("Orders", TableInfo::new().column("", "TEXT"));
        assert!(matches!(
            empty_column.validate(),
            Err(SchemaError::EmptyColumnName { ref table }) if table == "Orders"
        ));
    }

    #[test]
    fn test_dotted_table_name_is_accepted() {
        let schema = SchemaModel::from_json_str(
            r#"{"tables": {"main.Orders": {"columns": {"OrderID": {"type": "INTEGER"}}}}}"#,
        )
        .unwrap();
        assert_eq!(schema.tables.keys().collect::<Vec<_>>(), vec!["main.Orders"]);
    }

    #[test]
    fn test_colliding_node_ids_are_rejected() {
        // table `A.b` and column `b` of table `A` share the id `A.b`
        let schema = SchemaModel::new()
            .with_table("A", TableInfo::new().column("b", "TEXT"))
            .with_table("A.b", TableInfo::new().column("c", "TEXT"));
        assert!(matches!(schema.validate(), Err(SchemaError::DuplicateNodeId(ref id)) if id == "A.b"));

        // column `b.c` of `A` and column `c` of `A.b` share `A.b.c`
        let schema = SchemaModel::new()
            .with_table("A", TableInfo::new().column("b.c", "TEXT"))
            .with_table("A.b", TableInfo::new().column("c", "TEXT"));
        assert!(matches!(schema.validate(), Err(SchemaError::DuplicateNodeId(ref id)) if id == "A.b.c"));
    }

    #[test]
    fn test_retain_tables_drops_touching_relationships() {
        let mut schema = SchemaModel::new()
            .with_table("Orders", TableInfo::new().column("OrderID", "INTEGER"))
            .with_table("sqlite_sequence", TableInfo::new().column("name", ""))
            .with_relationship(ForeignKey::new("Orders", "OrderID", "sqlite_sequence", "name"))
            .with_relationship(ForeignKey::new("Orders", "OrderID", "Orders", "OrderID"));

        let removed = schema.retain_tables(|name| !name.starts_with("sqlite_"));

        assert_eq!(removed, 1);
        assert_eq!(schema.tables.keys().collect::<Vec<_>>(), vec!["Orders"]);
        assert_eq!(
            schema.relationships,
            vec![ForeignKey::new("Orders", "OrderID", "Orders", "OrderID")]
        );
    }

    #[test]
    fn test_foreign_key_display() {
        let fk = ForeignKey::new("Orders", "CustomerID", "Customers", "CustomerID");
        assert_eq!(fk.to_string(), "Orders.CustomerID connects to Customers.CustomerID");
        assert_eq!(fk.source_id(), "Orders.CustomerID");
        assert_eq!(fk.target_id(), "Customers.CustomerID");
    }

    #[test]
    fn test_json_schema_names_input_fields() {
        let schema = serde_json::to_value(SchemaModel::json_schema()).unwrap();
        let text = schema.to_string();
        assert!(text.contains("tables"));
        assert!(text.contains("relationships"));
        assert!(text.contains("from_table"));
    }
}
