use crate::schema::{column_id, ForeignKey, SchemaModel};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Renders the relevant part of a schema for the generation step.
///
/// Output is fully determined by its inputs: tables and columns come out in
/// name order, relationships in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSerializer;

/// Table-grouped summary of relevant schema elements plus every relationship
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredContext {
    pub tables: Vec<TableContext>,

    /// All relationships of the schema, unfiltered
    pub relationships: Vec<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableContext {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<ColumnContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnContext {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ContextSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn serialize(&self, schema: &SchemaModel, relevant: &BTreeSet<String>) -> StructuredContext {
        let tables = schema
            .tables
            .iter()
            .filter_map(|(name, info)| {
                // A table-level hit describes every column
                let whole_table = relevant.contains(name);
                let columns: Vec<ColumnContext> = info
                    .columns
                    .iter()
                    .filter(|(col, _)| whole_table || relevant.contains(&column_id(name, col)))
                    .map(|(col, col_info)| ColumnContext {
                        name: col.clone(),
                        data_type: col_info.data_type.clone(),
                        description: col_info.description.clone(),
                    })
                    .collect();
                if !whole_table && columns.is_empty() {
                    return None;
                }
                Some(TableContext {
                    name: name.clone(),
                    description: info.description.clone(),
                    columns,
                })
            })
            .collect();

        StructuredContext {
            tables,
            relationships: schema.relationships.clone(),
        }
    }
}

impl StructuredContext {
    /// No tables and no relationships; renders as an empty string
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.relationships.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&TableContext> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl TableContext {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl fmt::Display for StructuredContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "Table: {}", table.name)?;
            if let Some(description) = &table.description {
                writeln!(f, "Description: {description}")?;
            }
            writeln!(f, "Columns:")?;
            for column in &table.columns {
                write!(f, "  - {}", column.name)?;
                if !column.data_type.is_empty() {
                    write!(f, " ({})", column.data_type)?;
                }
                if let Some(description) = &column.description {
                    write!(f, ": {description}")?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }

        if !self.relationships.is_empty() {
            writeln!(f, "Relationships:")?;
            for fk in &self.relationships {
                writeln!(f, "  - {fk}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
