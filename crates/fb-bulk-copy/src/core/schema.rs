//! Destination table metadata.
//!
//! A [`Schema`] is resolved once per destination table and never mutated
//! afterwards; its column order is the catalog field-position order and
//! fixes both the column list and the value order of every generated
//! statement.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic category of a destination column.
///
/// Governs how a cell is rendered as literal text; no precision or
/// length distinctions are modelled beyond this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// A signed integer.
    Integer,
    /// A floating point value.
    Real,
    /// A text string.
    Text,
    /// A blob of data.
    Blob,
    /// A date or timestamp.
    Date,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "Integer",
            ColumnKind::Real => "Real",
            ColumnKind::Text => "Text",
            ColumnKind::Blob => "Blob",
            ColumnKind::Date => "Date",
        };
        f.write_str(name)
    }
}

/// One row of the destination catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Field name, trimmed of catalog padding.
    pub name: String,

    /// Engine type code (`RDB$FIELD_TYPE`), `None` if the join found no domain.
    pub type_code: Option<i32>,

    /// Declared field length in bytes.
    pub field_length: Option<i32>,

    /// Character set name for character columns.
    pub charset: Option<String>,
}

/// A destination column with its resolved kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Literal-encoding category.
    pub kind: ColumnKind,
}

/// Resolved destination schema for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    table: String,
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema, keeping the first occurrence of any repeated column name.
    pub fn new(table: impl Into<String>, columns: impl IntoIterator<Item = Column>) -> Self {
        let mut unique: Vec<Column> = Vec::new();
        for col in columns {
            if !unique.iter().any(|c| c.name == col.name) {
                unique.push(col);
            }
        }
        Self {
            table: table.into(),
            columns: unique,
        }
    }

    /// Destination table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in catalog field-position order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Kind of the named column.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    /// Column names in statement order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, kind: ColumnKind) -> Column {
        Column {
            name: name.to_string(),
            kind,
        }
    }

    #[test]
    fn test_schema_preserves_order() {
        let schema = Schema::new(
            "D",
            vec![
                col("A", ColumnKind::Integer),
                col("B", ColumnKind::Text),
                col("C", ColumnKind::Blob),
            ],
        );
        assert_eq!(schema.column_names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(schema.kind_of("C"), Some(ColumnKind::Blob));
        assert_eq!(schema.kind_of("Z"), None);
        assert_eq!(schema.table(), "D");
    }

    #[test]
    fn test_schema_drops_duplicate_names() {
        let schema = Schema::new(
            "T",
            vec![col("X", ColumnKind::Integer), col("X", ColumnKind::Text)],
        );
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.kind_of("X"), Some(ColumnKind::Integer));
    }
}
