//! Core traits at the edges of the bulk copy engine.
//!
//! - [`Connection`]: an engine connection that can read the catalog and run statements
//! - [`Connector`]: opens connections from a connection string
//! - [`RowSource`]: a forward-only cursor over source rows
//! - [`Dialect`]: engine-specific literal and statement syntax
//!
//! Drivers implement the first three; the engine itself only talks to them
//! through these traits, which keeps it testable with in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

use super::value::{SourceRow, SqlValue};

/// A connection to the destination engine.
///
/// Drivers map their own failures into [`BulkCopyError`](crate::BulkCopyError):
/// statement failures as `Engine`, open/close failures as `Connection`.
#[async_trait]
pub trait Connection: Send {
    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;

    /// Open the connection.
    async fn open(&mut self) -> Result<()>;

    /// Close the connection. Closing a closed connection is a no-op.
    async fn close(&mut self) -> Result<()>;

    /// Run a query and return every row.
    async fn query(&mut self, sql: &str) -> Result<Vec<Vec<SqlValue<'static>>>>;

    /// Run a statement, returning the affected row count.
    ///
    /// `timeout` is the configured per-batch timeout; drivers with a native
    /// command timeout should apply it. The caller enforces it as well.
    async fn execute(&mut self, sql: &str, timeout: Duration) -> Result<u64>;
}

/// Opens connections for sessions that own their connection.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Connection;

    /// Create and open a connection.
    async fn connect(&self, connection_string: &str) -> Result<Self::Connection>;
}

/// A forward-only cursor over source rows.
#[async_trait]
pub trait RowSource: Send {
    /// Column names of the current result set, in row order.
    fn columns(&self) -> &[String];

    /// Fetch the next row, `None` once the cursor is exhausted.
    async fn next_row(&mut self) -> Result<Option<SourceRow>>;

    /// Close the cursor and release its resources.
    async fn close(&mut self) -> Result<()>;
}

/// SQL syntax strategy for the destination engine.
///
/// Everything engine-specific about the generated statements lives here:
/// the single-row pseudo-table, literal forms, the atomic block wrapper and
/// the catalog query.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "firebird").
    fn name(&self) -> &str;

    /// Quote an identifier.
    fn quote_ident(&self, name: &str) -> String;

    /// Always-present relation with exactly one row.
    fn single_row_source(&self) -> &str;

    /// Text placed between row fragments.
    fn row_separator(&self) -> &str {
        " UNION ALL "
    }

    /// NULL token.
    fn null_literal(&self) -> &str {
        "NULL"
    }

    /// Append a quoted string literal, escaping embedded quotes.
    fn write_string_literal(&self, out: &mut String, value: &str) {
        out.reserve(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            if c == '\'' {
                out.push('\'');
            }
            out.push(c);
        }
        out.push('\'');
    }

    /// Append a binary literal for an already-validated uppercase hex string.
    fn write_binary_literal(&self, out: &mut String, hex: &str);

    /// chrono format string for timestamp literals.
    fn timestamp_format(&self) -> &str {
        "%Y-%m-%d %H:%M:%S"
    }

    /// Wrap an insert statement in an all-or-nothing execution block.
    fn wrap_atomic_block(&self, statement: &str) -> String;

    /// Query returning (name, type code, field length, charset) for each
    /// column of `table`, ordered by field position.
    fn catalog_query(&self, table: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlainDialect;

    impl Dialect for PlainDialect {
        fn name(&self) -> &str {
            "plain"
        }

        fn quote_ident(&self, name: &str) -> String {
            name.to_string()
        }

        fn single_row_source(&self) -> &str {
            "DUAL"
        }

        fn write_binary_literal(&self, out: &mut String, hex: &str) {
            out.push_str(hex);
        }

        fn wrap_atomic_block(&self, statement: &str) -> String {
            statement.to_string()
        }

        fn catalog_query(&self, table: &str) -> String {
            table.to_string()
        }
    }

    #[test]
    fn test_default_string_literal_doubles_quotes() {
        let mut out = String::new();
        PlainDialect.write_string_literal(&mut out, "it's a 'test'");
        assert_eq!(out, "'it''s a ''test'''");
    }

    #[test]
    fn test_default_tokens() {
        assert_eq!(PlainDialect.null_literal(), "NULL");
        assert_eq!(PlainDialect.row_separator(), " UNION ALL ");
        assert_eq!(PlainDialect.timestamp_format(), "%Y-%m-%d %H:%M:%S");
    }
}
