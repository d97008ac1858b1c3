//! Batched multi-row insert statement assembly.
//!
//! Rows accumulate as `SELECT <literals> FROM <single-row source>` fragments
//! joined by `UNION ALL` behind one `INSERT INTO <table>(<columns>)` clause.
//! The builder reports a full batch as soon as the row limit is reached or
//! the statement grows past the byte ceiling, and starts over empty.
//!
//! The size check runs after a fragment is appended, so a flushed statement
//! may exceed the ceiling by at most one row; the default ceiling leaves
//! room for that below the engine's statement limit.

use tracing::warn;

use crate::core::schema::Schema;
use crate::core::traits::Dialect;

/// A complete insert statement ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStatement {
    /// `INSERT INTO ... SELECT ... UNION ALL SELECT ...`, without block wrapper.
    pub sql: String,

    /// Number of row fragments in `sql`.
    pub rows: usize,
}

/// Accumulates rows into one pending statement.
pub struct BatchBuilder<'d> {
    dialect: &'d dyn Dialect,
    insert_clause: String,
    /// Fragments, each followed by the row separator.
    body: String,
    rows: usize,
    batch_size: usize,
    max_bytes: usize,
}

impl<'d> BatchBuilder<'d> {
    /// Create a builder for `schema`, building the insert clause once.
    pub fn new(
        dialect: &'d dyn Dialect,
        schema: &Schema,
        quote_identifiers: bool,
        batch_size: usize,
        max_bytes: usize,
    ) -> Self {
        let ident = |name: &str| {
            if quote_identifiers {
                dialect.quote_ident(name)
            } else {
                name.to_string()
            }
        };

        let columns = schema
            .column_names()
            .map(ident)
            .collect::<Vec<_>>()
            .join(",");
        let insert_clause = format!("INSERT INTO {}({}) ", ident(schema.table()), columns);

        Self {
            dialect,
            insert_clause,
            body: String::new(),
            rows: 0,
            batch_size: batch_size.max(1),
            max_bytes,
        }
    }

    /// Fixed `INSERT INTO <table>(<columns>) ` prefix.
    pub fn insert_clause(&self) -> &str {
        &self.insert_clause
    }

    /// Rows waiting in the current batch.
    pub fn pending_rows(&self) -> usize {
        self.rows
    }

    /// Bytes counted against the ceiling: insert clause, fragments and separators.
    pub fn byte_len(&self) -> usize {
        self.insert_clause.len() + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Append one row of already-serialized literals.
    ///
    /// Returns the finished statement when this row filled the batch, either
    /// by reaching the row limit or by pushing the byte length past the
    /// ceiling. The builder is empty again afterwards.
    pub fn add_row<I, S>(&mut self, literals: I) -> Option<BatchStatement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = self.body.len();

        self.body.push_str("SELECT ");
        for (i, literal) in literals.into_iter().enumerate() {
            if i > 0 {
                self.body.push(',');
            }
            self.body.push_str(literal.as_ref());
        }
        self.body.push_str(" FROM ");
        self.body.push_str(self.dialect.single_row_source());
        self.body.push_str(self.dialect.row_separator());
        self.rows += 1;

        let fragment_len = self.body.len() - start;
        if self.insert_clause.len() + fragment_len > self.max_bytes {
            warn!(
                "Single row of {} bytes exceeds the {} byte statement ceiling",
                fragment_len, self.max_bytes
            );
        }

        if self.byte_len() > self.max_bytes || self.rows >= self.batch_size {
            return self.take();
        }
        None
    }

    /// Statement for any rows still pending; call once after the source is exhausted.
    pub fn finish(&mut self) -> Option<BatchStatement> {
        self.take()
    }

    fn take(&mut self) -> Option<BatchStatement> {
        if self.rows == 0 {
            return None;
        }

        let separator_len = self.dialect.row_separator().len();
        let body_len = self.body.len() - separator_len;

        let mut sql = String::with_capacity(self.insert_clause.len() + body_len);
        sql.push_str(&self.insert_clause);
        sql.push_str(&self.body[..body_len]);

        let statement = BatchStatement {
            sql,
            rows: self.rows,
        };

        self.body.clear();
        self.rows = 0;
        Some(statement)
    }
}
