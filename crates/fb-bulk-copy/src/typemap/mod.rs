//! Destination column type resolution.
//!
//! Reads the destination table's field list from the engine catalog and
//! classifies every field into a [`ColumnKind`]. Classification goes through
//! an intermediate type name: catalog type code → type name → kind.

use tracing::{debug, info, instrument, warn};

use crate::config::UnmappedColumnPolicy;
use crate::core::schema::{CatalogColumn, Column, ColumnKind, Schema};
use crate::core::traits::{Connection, Dialect};
use crate::core::value::SqlValue;
use crate::error::{BulkCopyError, Result};

/// Map a Firebird `RDB$FIELD_TYPE` code to its type name.
pub fn type_name_for_code(code: Option<i32>) -> &'static str {
    match code {
        Some(7) => "SMALLINT",
        Some(8) => "INTEGER",
        Some(10) => "FLOAT",
        Some(12) => "DATE",
        Some(13) => "TIME",
        Some(14) => "CHAR",
        Some(16) => "INT64",
        Some(27) => "DOUBLE",
        Some(35) => "TIMESTAMP",
        Some(37) => "VARCHAR",
        Some(261) => "BLOB",
        _ => "UNKNOWN",
    }
}

/// Map a type name to the kind that governs its literal encoding.
///
/// Returns `None` for types with no encoding (TIME, UNKNOWN, ...).
pub fn kind_for_type_name(type_name: &str) -> Option<ColumnKind> {
    let name = type_name.trim().to_uppercase();
    match name.as_str() {
        "INTEGER" | "SMALLINT" | "BIGINT" | "INT64" => Some(ColumnKind::Integer),
        "DOUBLE" | "FLOAT" => Some(ColumnKind::Real),
        "CLOB" => Some(ColumnKind::Text),
        "BLOB" => Some(ColumnKind::Blob),
        "DATE" | "TIMESTAMP" => Some(ColumnKind::Date),
        other
            if other.starts_with("CHAR")
                || other.starts_with("VARCHAR")
                || other.starts_with("NCHAR") =>
        {
            Some(ColumnKind::Text)
        }
        _ => None,
    }
}

/// Resolves a destination table's schema from the engine catalog.
pub struct ColumnTypeResolver<'d> {
    dialect: &'d dyn Dialect,
    unmapped: UnmappedColumnPolicy,
}

impl<'d> ColumnTypeResolver<'d> {
    pub fn new(dialect: &'d dyn Dialect, unmapped: UnmappedColumnPolicy) -> Self {
        Self { dialect, unmapped }
    }

    /// Read the catalog for `table` and build its schema.
    ///
    /// Fails with `TableNotFound` when no usable column remains, which is
    /// also what a caller without catalog visibility sees.
    #[instrument(skip(self, conn))]
    pub async fn resolve<C>(&self, conn: &mut C, table: &str) -> Result<Schema>
    where
        C: Connection + ?Sized,
    {
        let sql = self.dialect.catalog_query(table);
        let rows = conn.query(&sql).await?;

        let catalog = rows
            .iter()
            .map(|row| parse_catalog_row(row))
            .collect::<Result<Vec<_>>>()?;

        let schema = self.classify(table, catalog)?;
        info!(
            "Resolved {} columns for table {}",
            schema.len(),
            schema.table()
        );
        Ok(schema)
    }

    /// Classify catalog rows into a schema.
    pub fn classify(&self, table: &str, catalog: Vec<CatalogColumn>) -> Result<Schema> {
        let mut columns = Vec::with_capacity(catalog.len());

        for field in catalog {
            let type_name = type_name_for_code(field.type_code);
            match kind_for_type_name(type_name) {
                Some(kind) => {
                    debug!("Column {}: {} -> {}", field.name, type_name, kind);
                    columns.push(Column {
                        name: field.name,
                        kind,
                    });
                }
                None => match self.unmapped {
                    UnmappedColumnPolicy::Skip => {
                        warn!(
                            "Column {} in table {} has type {} with no literal encoding; \
                             it will not be loaded",
                            field.name, table, type_name
                        );
                    }
                    UnmappedColumnPolicy::Fail => {
                        return Err(BulkCopyError::UnsupportedColumnType {
                            table: table.to_string(),
                            column: field.name,
                            type_name: type_name.to_string(),
                        });
                    }
                },
            }
        }

        let schema = Schema::new(table, columns);
        if schema.is_empty() {
            return Err(BulkCopyError::TableNotFound(table.to_string()));
        }
        Ok(schema)
    }
}

/// Decode one (name, type code, field length, charset) catalog row.
fn parse_catalog_row(row: &[SqlValue<'_>]) -> Result<CatalogColumn> {
    let name = match row.first().and_then(catalog_text) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(BulkCopyError::engine(
                "catalog row without a field name",
                "reading destination columns",
            ))
        }
    };

    Ok(CatalogColumn {
        name,
        type_code: row.get(1).and_then(catalog_int),
        field_length: row.get(2).and_then(catalog_int),
        charset: row.get(3).and_then(catalog_text),
    })
}

/// Catalog CHAR columns come back blank-padded.
fn catalog_text(value: &SqlValue<'_>) -> Option<String> {
    match value {
        SqlValue::Null => None,
        other => other.to_text().map(|s| s.trim().to_string()),
    }
}

fn catalog_int(value: &SqlValue<'_>) -> Option<i32> {
    match value {
        SqlValue::I16(n) => Some(i32::from(*n)),
        SqlValue::I32(n) => Some(*n),
        SqlValue::I64(n) => i32::try_from(*n).ok(),
        SqlValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}
