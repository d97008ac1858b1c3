//! Bulk copy session - drives a source cursor into a destination table.
//!
//! A [`BulkCopy`] owns or borrows one destination connection. Each
//! assignment of the destination table resolves its schema; each [`BulkCopy::write_to_server`]
//! call then streams the cursor through serialization and batching, and runs
//! every full batch before reading on. Nothing runs concurrently: one row is
//! in flight at a time and a batch completes before the next row is read.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::batch::BatchBuilder;
use crate::config::BulkCopyConfig;
use crate::core::schema::{Column, Schema};
use crate::core::traits::{Connection, Connector, Dialect, RowSource};
use crate::dialect::FirebirdDialect;
use crate::error::{BulkCopyError, Result};
use crate::executor::Executor;
use crate::serialize::{CellRef, ValueSerializer};
use crate::typemap::ColumnTypeResolver;

/// Lifecycle of a bulk copy session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyState {
    /// No destination schema resolved.
    Idle,
    /// Destination schema cached, ready to stream.
    SchemaResolved,
    /// Reading rows and filling the pending batch.
    Streaming,
    /// Executing a full batch.
    Flushing,
    /// Source exhausted, executing the final partial batch.
    Draining,
    /// Last copy completed.
    Done,
}

/// Result of one `write_to_server` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyStats {
    /// Rows read from the source and inserted.
    pub rows: u64,

    /// Batch statements executed.
    pub batches: u64,

    /// Wall time of the copy.
    pub elapsed: Duration,
}

impl CopyStats {
    /// Average throughput (rows/second).
    pub fn rows_per_second(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.rows as f64 / secs) as u64
        } else {
            0
        }
    }
}

enum ConnectionHandle<'c, C> {
    Owned(C),
    Borrowed(&'c mut C),
}

impl<'c, C> ConnectionHandle<'c, C> {
    fn get(&mut self) -> &mut C {
        match self {
            ConnectionHandle::Owned(conn) => conn,
            ConnectionHandle::Borrowed(conn) => &mut **conn,
        }
    }
}

/// Bulk copy session against one destination connection.
pub struct BulkCopy<'c, C: Connection> {
    conn: ConnectionHandle<'c, C>,
    config: BulkCopyConfig,
    dialect: Box<dyn Dialect>,
    schema: Option<Schema>,
    state: CopyState,
}

impl<'c, C: Connection> BulkCopy<'c, C> {
    /// Create a session over a caller-owned connection.
    ///
    /// The connection is opened if it is not already. Dropping the session
    /// leaves it open; only [`BulkCopy::close`] closes it.
    pub async fn new(conn: &'c mut C, config: BulkCopyConfig) -> Result<Self> {
        config.validate()?;

        if !conn.is_open() {
            debug!("Opening borrowed destination connection");
            conn.open().await?;
        }

        Ok(Self::with_handle(ConnectionHandle::Borrowed(conn), config))
    }

    /// Create a session over a new connection the session owns.
    ///
    /// The connection is closed by [`BulkCopy::close`].
    pub async fn connect<K>(connector: &K, connection_string: &str, config: BulkCopyConfig) -> Result<Self>
    where
        K: Connector<Connection = C>,
    {
        if connection_string.trim().is_empty() {
            return Err(BulkCopyError::Argument(
                "connection string is empty".to_string(),
            ));
        }
        config.validate()?;

        let mut conn = connector.connect(connection_string).await?;
        if !conn.is_open() {
            conn.open().await?;
        }

        Ok(Self::with_handle(ConnectionHandle::Owned(conn), config))
    }

    fn with_handle(conn: ConnectionHandle<'c, C>, config: BulkCopyConfig) -> Self {
        Self {
            conn,
            config,
            dialect: Box::new(FirebirdDialect::new()),
            schema: None,
            state: CopyState::Idle,
        }
    }

    /// Use a different SQL dialect for generated statements.
    ///
    /// Clears any resolved schema, since the catalog query is dialect specific.
    pub fn with_dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Box::new(dialect);
        self.schema = None;
        self.state = CopyState::Idle;
        self
    }

    pub fn config(&self) -> &BulkCopyConfig {
        &self.config
    }

    pub fn state(&self) -> CopyState {
        self.state
    }

    /// Current destination table, if one is set.
    pub fn destination_table_name(&self) -> Option<&str> {
        self.schema.as_ref().map(|s| s.table())
    }

    /// Resolved destination columns in statement order; empty when no table is set.
    pub fn column_mappings(&self) -> &[Column] {
        self.schema.as_ref().map(|s| s.columns()).unwrap_or(&[])
    }

    /// Set the destination table and resolve its schema.
    ///
    /// Every assignment re-reads the catalog, so a table altered between
    /// copies is picked up. An empty name clears the destination.
    pub async fn set_destination_table(&mut self, table: &str) -> Result<()> {
        let table = table.trim();
        if table.is_empty() {
            self.schema = None;
            self.state = CopyState::Idle;
            return Ok(());
        }

        let resolver = ColumnTypeResolver::new(self.dialect.as_ref(), self.config.unmapped_columns);
        let conn = self.conn.get();
        if !conn.is_open() {
            conn.open().await?;
        }

        // A failed resolution leaves no destination behind
        self.schema = None;
        self.state = CopyState::Idle;
        let schema = resolver.resolve(conn, table).await?;

        self.schema = Some(schema);
        self.state = CopyState::SchemaResolved;
        Ok(())
    }

    /// Copy every remaining row of `source` into the destination table.
    ///
    /// Full batches are executed as soon as they fill. Once the cursor is
    /// exhausted it is closed (when `close_source` is set) and the final
    /// partial batch is executed. The first failure aborts the copy; batches
    /// already executed stay committed.
    ///
    /// After a failure the session is back in `SchemaResolved` and can copy again.
    #[instrument(skip_all)]
    pub async fn write_to_server<R>(&mut self, source: &mut R) -> Result<CopyStats>
    where
        R: RowSource + ?Sized,
    {
        let result = self.copy_rows(source).await;
        if result.is_err() && self.schema.is_some() {
            self.state = CopyState::SchemaResolved;
        }
        result
    }

    async fn copy_rows<R>(&mut self, source: &mut R) -> Result<CopyStats>
    where
        R: RowSource + ?Sized,
    {
        let schema = self.schema.as_ref().ok_or_else(|| {
            BulkCopyError::Argument("destination table name is not set".to_string())
        })?;
        let table = schema.table();

        let indices = map_source_columns(schema, source.columns())?;
        let serializer = ValueSerializer::new(self.dialect.as_ref());
        let executor = Executor::new(self.dialect.as_ref(), self.config.timeout());
        let mut builder = BatchBuilder::new(
            self.dialect.as_ref(),
            schema,
            self.config.quote_identifiers,
            self.config.batch_size,
            self.config.max_statement_bytes,
        );

        let conn = self.conn.get();
        if !conn.is_open() {
            conn.open().await?;
        }

        info!(
            "Starting bulk copy into {} ({} columns, batch size {})",
            table,
            schema.len(),
            self.config.batch_size
        );

        let start = Instant::now();
        let mut stats = CopyStats::default();
        let mut cells = vec![String::new(); schema.len()];
        self.state = CopyState::Streaming;

        while let Some(row) = source.next_row().await? {
            for ((column, &idx), cell) in schema.columns().iter().zip(&indices).zip(&mut cells) {
                let value = row.get(idx).ok_or_else(|| {
                    BulkCopyError::Source(format!(
                        "row {} has {} values, column [{}] is at position {}",
                        stats.rows + 1,
                        row.len(),
                        column.name,
                        idx
                    ))
                })?;

                cell.clear();
                serializer.write_literal(
                    cell,
                    value,
                    column.kind,
                    CellRef {
                        table,
                        column: &column.name,
                    },
                )?;
            }
            stats.rows += 1;

            if let Some(batch) = builder.add_row(&cells) {
                self.state = CopyState::Flushing;
                stats.batches += 1;
                executor.execute(&mut *conn, &batch, stats.batches).await?;
                self.state = CopyState::Streaming;
            }
        }

        self.state = CopyState::Draining;
        if self.config.close_source {
            source.close().await?;
        }

        if let Some(batch) = builder.finish() {
            stats.batches += 1;
            executor.execute(&mut *conn, &batch, stats.batches).await?;
        }

        stats.elapsed = start.elapsed();
        self.state = CopyState::Done;

        if stats.rows == 0 {
            warn!("Source produced no rows for {}", table);
        }
        info!(
            "Copied {} rows into {} in {} batches ({:.1}s, {} rows/sec)",
            stats.rows,
            table,
            stats.batches,
            stats.elapsed.as_secs_f64(),
            stats.rows_per_second()
        );

        Ok(stats)
    }

    /// End the session and close its connection, borrowed or owned.
    pub async fn close(mut self) -> Result<()> {
        let conn = self.conn.get();
        if conn.is_open() {
            debug!("Closing destination connection");
            conn.close().await?;
        }
        Ok(())
    }
}

/// Find the source position of each destination column.
///
/// Exact name matches win; otherwise names are compared ignoring ASCII case.
fn map_source_columns(schema: &Schema, source_columns: &[String]) -> Result<Vec<usize>> {
    schema
        .columns()
        .iter()
        .map(|col| {
            source_columns
                .iter()
                .position(|name| *name == col.name)
                .or_else(|| {
                    source_columns
                        .iter()
                        .position(|name| name.eq_ignore_ascii_case(&col.name))
                })
                .ok_or_else(|| BulkCopyError::SourceColumnMissing {
                    table: schema.table().to_string(),
                    column: col.name.clone(),
                })
        })
        .collect()
}
